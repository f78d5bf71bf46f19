//! Integration tests for Quickcart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p quickcart-integration-tests
//! ```
//!
//! No external services are needed. Each test starts its own mock catalog
//! endpoint with `httpmock`.
//!
//! # Test Categories
//!
//! - `catalog_fetch` - Catalog endpoint success and failure handling
//! - `shopping_session` - Full browse, cart and checkout flows
//! - `theme_persistence` - Theme flag surviving across sessions

use quickcart_storefront::{CatalogClient, CatalogConfig};
use serde_json::{Value, json};
use url::Url;

/// Path the mock catalog is served from.
pub const CATALOG_PATH: &str = "/api/products";

/// Build a client pointed at a mock server URL.
///
/// # Panics
///
/// Panics if `url` is not a valid URL or the HTTP client cannot be built.
#[must_use]
pub fn client_for(url: &str) -> CatalogClient {
    let url = Url::parse(url).expect("mock server URL should parse");
    CatalogClient::new(&CatalogConfig::new(url)).expect("client should build")
}

/// A small catalog in the endpoint's wire format.
#[must_use]
pub fn sample_catalog() -> Value {
    json!([
        {
            "productId": 1,
            "name": "Pen",
            "price": 10.0,
            "description": "Blue ballpoint pen",
            "imageUrl": "https://cdn.example.com/pen.png",
            "stockQuantity": 12
        },
        {
            "productId": 2,
            "name": "Notebook",
            "price": 4.5,
            "description": "A5 ruled notebook",
            "stockQuantity": 30
        },
        {
            "productId": 3,
            "name": "Desk Lamp",
            "price": 39.99,
            "description": "LED lamp with a pen holder base",
            "stockQuantity": 0
        },
        {
            "productId": 4,
            "name": "Eraser",
            "price": 1.25,
            "stockQuantity": 100
        }
    ])
}
