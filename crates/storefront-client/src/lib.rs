//! # storefront-client
//!
//! Typed client for the storefront REST API.
//!
//! - [`HttpTransport`] sends requests with `reqwest`
//! - [`HttpTokenRenewer`] exchanges refresh tokens at the renewal endpoint
//! - [`StorefrontClient`] exposes the catalogue, favourites, orders, and auth
//!   endpoints, routing authenticated calls through the session guard

pub mod api;
pub mod http;

pub use api::StorefrontClient;
pub use http::{HttpTokenRenewer, HttpTransport};
