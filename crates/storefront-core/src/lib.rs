//! # storefront-core
//!
//! Domain layer containing catalogue entities, request DTOs, and the page-range
//! calculation used by pagination controls.
//! This crate has zero dependencies on infrastructure (HTTP client, storage, etc.).

pub mod dto;
pub mod entities;
pub mod error;
pub mod pagination;

// Re-export commonly used types at crate root
pub use dto::{
    AuthResponse, Checkout, CheckoutItem, LoginRequest, NewReview, RefreshRequest,
    RefreshResponse, RegisterRequest,
};
pub use entities::{
    Favorite, Order, OrderItem, OrderStatus, Paginated, Product, ProductQuery, ProductSort,
    Review, Role, UserInfo,
};
pub use error::DomainError;
pub use pagination::{page_range, total_pages, PageItem, PageRange, DEFAULT_SIBLING_COUNT};
