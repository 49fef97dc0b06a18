//! Request DTOs
//!
//! Every request DTO implements `Validate` so forms are checked before any
//! network call is made.

use serde::Serialize;
use validator::Validate;

use crate::error::DomainError;

// ============================================================================
// Auth Requests
// ============================================================================

/// Login form
#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Registration form
#[derive(Debug, Clone, Serialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 32, message = "Username must be 2-32 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, max = 72, message = "Password must be 8-72 characters"))]
    pub password: String,

    #[serde(skip_serializing)]
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub password_confirm: String,
}

// ============================================================================
// Catalogue Requests
// ============================================================================

/// Review form
#[derive(Debug, Clone, Serialize, Validate)]
pub struct NewReview {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: u8,

    #[validate(length(max = 2000, message = "Comment must be at most 2000 characters"))]
    pub comment: String,
}

// ============================================================================
// Checkout Requests
// ============================================================================

/// One cart line submitted at checkout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate)]
pub struct CheckoutItem {
    pub product_id: u64,

    #[validate(range(min = 1, max = 99, message = "Quantity must be between 1 and 99"))]
    pub quantity: u32,
}

/// Checkout form
#[derive(Debug, Clone, Serialize, Validate)]
pub struct Checkout {
    #[validate(length(min = 1, message = "Cart is empty"), nested)]
    pub items: Vec<CheckoutItem>,

    #[validate(length(min = 5, max = 255, message = "Shipping address must be 5-255 characters"))]
    pub shipping_address: String,

    #[validate(length(min = 7, max = 20, message = "Phone number must be 7-20 characters"))]
    pub phone: String,
}

/// Validate a request DTO, mapping failures into a domain error
pub fn validate<T: Validate>(request: &T) -> Result<(), DomainError> {
    request.validate().map_err(DomainError::from)
}
