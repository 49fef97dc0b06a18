//! Product reviews

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A customer review on a product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: u64,
    pub product_id: u64,
    pub username: String,
    /// Star rating, 1-5
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    pub created_at: DateTime<Utc>,
}
