//! Domain errors - error types for the domain layer

use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid rating: {0} (expected 1-5)")]
    InvalidRating(u8),

    #[error("Cart is empty")]
    EmptyCart,

    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Product not found: {0}")]
    ProductNotFound(u64),

    #[error("Order not found: {0}")]
    OrderNotFound(u64),
}

impl DomainError {
    /// Get an error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidRating(_) => "INVALID_RATING",
            Self::EmptyCart => "EMPTY_CART",
            Self::ProductNotFound(_) => "UNKNOWN_PRODUCT",
            Self::OrderNotFound(_) => "UNKNOWN_ORDER",
        }
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_) | Self::InvalidRating(_) | Self::EmptyCart
        )
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ProductNotFound(_) | Self::OrderNotFound(_))
    }
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => format!("{field} is invalid"),
                })
            })
            .collect();
        if messages.is_empty() {
            // only nested (list/struct) failures
            return Self::ValidationError(errors.to_string());
        }
        messages.sort();
        Self::ValidationError(messages.join("; "))
    }
}
