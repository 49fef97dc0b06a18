//! # storefront-common
//!
//! Shared utilities including configuration, error handling, token inspection, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{AccessClaims, TokenInspector};
pub use config::{
    ApiConfig, AppSettings, CatalogConfig, ClientConfig, ConfigError, Environment, SessionConfig,
};
pub use error::{AppError, AppResult, ErrorResponse};
pub use telemetry::{try_init_tracing, try_init_tracing_with_config, TracingConfig, TracingError};
