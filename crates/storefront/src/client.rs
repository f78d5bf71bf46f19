//! Catalog endpoint client.
//!
//! One read-only GET per session. No auth headers, no pagination, no retry.
//!
//! # Wire Format
//!
//! ```json
//! [
//!   {
//!     "productId": 1,
//!     "name": "Pen",
//!     "price": 10.0,
//!     "description": "Blue ballpoint",
//!     "imageUrl": "https://cdn.example.com/pen.png",
//!     "stockQuantity": 12
//!   }
//! ]
//! ```

use std::sync::Arc;

use quickcart_core::{Price, ProductId};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::catalog::Catalog;
use crate::config::CatalogConfig;

/// Longest slice of an error body that is logged.
const MAX_LOGGED_BODY_CHARS: usize = 500;

/// Errors that can occur when fetching the catalog.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("Catalog endpoint returned status {status}")]
    Status { status: u16, body: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A product record as sent by the catalog endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireProduct {
    pub product_id: ProductId,
    pub name: String,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub stock_quantity: u32,
}

/// Client for the catalog endpoint.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    endpoint: Url,
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be built.
    pub fn new(config: &CatalogConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                endpoint: config.url.clone(),
            }),
        })
    }

    /// The endpoint this client reads from.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    /// Fetch the raw product records.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` on transport failure, a non-success status, or a
    /// body that is not a JSON array. Array elements that are not valid
    /// products are skipped with a warning.
    #[instrument(skip(self), fields(endpoint = %self.inner.endpoint))]
    pub async fn fetch_products(&self) -> Result<Vec<WireProduct>, FetchError> {
        let response = self
            .inner
            .client
            .get(self.inner.endpoint.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(MAX_LOGGED_BODY_CHARS).collect::<String>(),
                "Catalog endpoint returned non-success status"
            );
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: response_text,
            });
        }

        let products = decode_products(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %response_text.chars().take(MAX_LOGGED_BODY_CHARS).collect::<String>(),
                "Failed to parse catalog response"
            );
            e
        })?;

        debug!(count = products.len(), "Fetched catalog");
        Ok(products)
    }

    /// Fetch and validate the catalog.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if the fetch fails. Individual invalid records are
    /// skipped rather than failing the whole catalog.
    pub async fn fetch_catalog(&self) -> Result<Catalog, FetchError> {
        Ok(Catalog::from_wire(self.fetch_products().await?))
    }
}

/// Decode a catalog body record by record.
///
/// The body must be a JSON array. Elements that are not valid products are
/// logged and skipped so one bad record does not cost the rest.
fn decode_products(body: &str) -> Result<Vec<WireProduct>, serde_json::Error> {
    let records: Vec<serde_json::Value> = serde_json::from_str(body)?;

    let products = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value(record) {
            Ok(product) => Some(product),
            Err(e) => {
                tracing::warn!(index, error = %e, "Skipping malformed catalog record");
                None
            }
        })
        .collect();

    Ok(products)
}

impl std::fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("endpoint", &self.inner.endpoint.as_str())
            .finish_non_exhaustive()
    }
}
