//! Configuration structs

mod client_config;

pub use client_config::{
    ApiConfig, AppSettings, CatalogConfig, ClientConfig, ConfigError, Environment, SessionConfig,
};
