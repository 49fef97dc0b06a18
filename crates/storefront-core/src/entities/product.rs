//! Catalogue products and listing filters

use serde::{Deserialize, Serialize};

/// A product listed in the catalogue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    /// Price in minor currency units (cents)
    pub price_cents: u64,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub in_stock: bool,
}

/// Sort order for catalogue listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductSort {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    Rating,
}

impl ProductSort {
    /// Value of the `ordering` query parameter
    pub fn as_query(self) -> &'static str {
        match self {
            Self::Newest => "-created_at",
            Self::PriceAsc => "price",
            Self::PriceDesc => "-price",
            Self::Rating => "-rating",
        }
    }
}

/// Catalogue listing filters
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProductQuery {
    /// 1-indexed page number
    pub page: u32,
    pub category: Option<String>,
    pub search: Option<String>,
    pub min_price_cents: Option<u64>,
    pub max_price_cents: Option<u64>,
    pub sort: ProductSort,
}

impl ProductQuery {
    /// First page, no filters
    pub fn new() -> Self {
        Self {
            page: 1,
            ..Self::default()
        }
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn price_between(mut self, min_cents: u64, max_cents: u64) -> Self {
        self.min_price_cents = Some(min_cents.min(max_cents));
        self.max_price_cents = Some(min_cents.max(max_cents));
        self
    }

    pub fn sort(mut self, sort: ProductSort) -> Self {
        self.sort = sort;
        self
    }

    /// Query-string pairs in a stable order
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", self.page.max(1).to_string())];

        if let Some(category) = &self.category {
            pairs.push(("category", category.clone()));
        }
        if let Some(search) = self.search.as_ref().filter(|s| !s.trim().is_empty()) {
            pairs.push(("search", search.trim().to_string()));
        }
        if let Some(min) = self.min_price_cents {
            pairs.push(("min_price", min.to_string()));
        }
        if let Some(max) = self.max_price_cents {
            pairs.push(("max_price", max.to_string()));
        }
        pairs.push(("ordering", self.sort.as_query().to_string()));

        pairs
    }
}

/// A product saved to the user's favorites
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Favorite {
    pub id: u64,
    pub product: Product,
}
