//! Integration test utilities for the storefront client
//!
//! This crate provides an in-process mock of the storefront REST API and
//! helpers for driving the real HTTP client against it.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
pub use mock_api::MockApi;
