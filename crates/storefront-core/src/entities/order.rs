//! Placed orders and their line items

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Order lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Paid,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Check if the order can no longer change
    pub fn is_final(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }
}

/// One line of an order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: u64,
    pub name: String,
    pub quantity: u32,
    pub unit_price_cents: u64,
}

impl OrderItem {
    pub fn subtotal_cents(&self) -> u64 {
        self.unit_price_cents * u64::from(self.quantity)
    }
}

/// An order from the user's history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
    pub shipping_address: String,
    pub created_at: DateTime<Utc>,
}

impl Order {
    pub fn total_cents(&self) -> u64 {
        self.items.iter().map(OrderItem::subtotal_cents).sum()
    }

    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}
