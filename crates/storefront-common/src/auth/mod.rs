//! Authentication utilities

mod jwt;

pub use jwt::{AccessClaims, TokenInspector};
