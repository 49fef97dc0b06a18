//! Page-number paginated list envelope returned by list endpoints

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::pagination::{page_range, PageRange};

/// One page of a list endpoint: `{ count, next, previous, results }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// Total items across all pages
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }

    /// Page links for a control positioned on `current_page`
    pub fn page_range(
        &self,
        page_size: NonZeroU32,
        current_page: u32,
        sibling_count: u32,
    ) -> PageRange {
        page_range(self.count, page_size, current_page, sibling_count)
    }
}

impl<T> Default for Paginated<T> {
    fn default() -> Self {
        Self {
            count: 0,
            next: None,
            previous: None,
            results: Vec::new(),
        }
    }
}
