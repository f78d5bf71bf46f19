//! Catalog search and filtering.
//!
//! [`apply`] is a pure function of the catalog and a [`SearchQuery`]. The
//! session controller keeps the last-applied query; nothing here holds state.

use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use quickcart_core::Price;
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Product};

/// Ordering applied to search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Catalog order.
    #[default]
    Featured,
    PriceAsc,
    PriceDesc,
    /// Case-insensitive lexicographic by name.
    Name,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Featured => write!(f, "featured"),
            Self::PriceAsc => write!(f, "price-asc"),
            Self::PriceDesc => write!(f, "price-desc"),
            Self::Name => write!(f, "name"),
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "featured" | "default" => Ok(Self::Featured),
            "price-asc" | "price_asc" => Ok(Self::PriceAsc),
            "price-desc" | "price_desc" => Ok(Self::PriceDesc),
            "name" => Ok(Self::Name),
            _ => Err(format!(
                "invalid sort key: {s} (expected featured, price-asc, price-desc or name)"
            )),
        }
    }
}

/// Search text plus filters.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Case-insensitive substring matched against name or description.
    pub text: String,
    /// Inclusive price ceiling.
    pub max_price: Option<Price>,
    /// Hide products with no stock.
    pub in_stock_only: bool,
    pub sort: SortKey,
}

impl SearchQuery {
    /// A query that matches the whole catalog in catalog order.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    #[must_use]
    pub const fn with_max_price(mut self, max_price: Option<Price>) -> Self {
        self.max_price = max_price;
        self
    }

    #[must_use]
    pub const fn with_in_stock_only(mut self, in_stock_only: bool) -> Self {
        self.in_stock_only = in_stock_only;
        self
    }

    #[must_use]
    pub const fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    /// Whether the query narrows or reorders the catalog at all.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.text.trim().is_empty()
            && self.max_price.is_none()
            && !self.in_stock_only
            && self.sort == SortKey::Featured
    }
}

/// Filter and sort the catalog.
#[must_use]
pub fn apply<'a>(catalog: &'a Catalog, query: &SearchQuery) -> Vec<&'a Product> {
    let needle = query.text.trim().to_lowercase();

    let mut results: Vec<&Product> = catalog
        .all()
        .iter()
        .filter(|product| needle.is_empty() || matches_text(product, &needle))
        .filter(|product| query.max_price.is_none_or(|max| product.price <= max))
        .filter(|product| !query.in_stock_only || product.in_stock())
        .collect();

    match query.sort {
        SortKey::Featured => {}
        SortKey::PriceAsc => results.sort_by_key(|product| product.price),
        SortKey::PriceDesc => results.sort_by_key(|product| Reverse(product.price)),
        SortKey::Name => results.sort_by_cached_key(|product| product.name.to_lowercase()),
    }

    results
}

fn matches_text(product: &Product, needle: &str) -> bool {
    product.name.to_lowercase().contains(needle)
        || product
            .description
            .as_deref()
            .is_some_and(|description| description.to_lowercase().contains(needle))
}
