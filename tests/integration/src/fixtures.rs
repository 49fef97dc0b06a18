//! Test fixtures and data generators
//!
//! Provides reusable test data for integration tests.

use std::sync::atomic::{AtomicU64, Ordering};

use storefront_core::{Checkout, CheckoutItem, LoginRequest, Product, RegisterRequest};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Account seeded into every mock API
pub const SEEDED_EMAIL: &str = "ana@example.com";
pub const SEEDED_USERNAME: &str = "ana";
pub const SEEDED_PASSWORD: &str = "correct-horse";

/// Number of products seeded into every mock API
pub const SEEDED_PRODUCTS: u64 = 40;

pub fn seeded_login() -> LoginRequest {
    LoginRequest::new(SEEDED_EMAIL, SEEDED_PASSWORD)
}

pub fn unique_registration() -> RegisterRequest {
    let suffix = unique_suffix();
    RegisterRequest {
        username: format!("shopper{suffix}"),
        email: format!("shopper{suffix}@example.com"),
        password: "TestPass123!".to_string(),
        password_confirm: "TestPass123!".to_string(),
    }
}

/// Catalogue with alternating categories
pub fn seeded_products() -> Vec<Product> {
    (1..=SEEDED_PRODUCTS)
        .map(|id| Product {
            id,
            name: format!("Product {id}"),
            description: String::new(),
            category: if id % 2 == 0 { "sofas" } else { "tables" }.to_string(),
            price_cents: 10_000 + id * 500,
            image: None,
            rating: None,
            in_stock: id % 7 != 0,
        })
        .collect()
}

pub fn checkout_for(product_ids: &[u64]) -> Checkout {
    Checkout {
        items: product_ids
            .iter()
            .map(|&product_id| CheckoutItem {
                product_id,
                quantity: 1,
            })
            .collect(),
        shipping_address: "12 Elm Street, Springfield".to_string(),
        phone: "5551234567".to_string(),
    }
}
