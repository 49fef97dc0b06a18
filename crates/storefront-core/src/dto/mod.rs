//! Data transfer objects exchanged with the storefront REST API

mod requests;
mod responses;

pub use requests::{
    validate, Checkout, CheckoutItem, LoginRequest, NewReview, RegisterRequest,
};
pub use responses::{AuthResponse, RefreshRequest, RefreshResponse};
