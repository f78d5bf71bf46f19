//! Subcommand implementations.

pub mod catalog;
pub mod shop;
pub mod theme;

use quickcart_storefront::{CatalogClient, StorefrontConfig};

/// Load configuration, letting `--url` override `QUICKCART_CATALOG_URL`.
///
/// # Errors
///
/// Returns an error if no usable catalog URL is configured.
pub fn load_config(url: Option<&str>) -> Result<StorefrontConfig, Box<dyn std::error::Error>> {
    let config = match url {
        Some(url) => StorefrontConfig::with_catalog_url(url)?,
        None => StorefrontConfig::from_env()?,
    };
    tracing::debug!(catalog_url = %config.catalog.url, "Loaded configuration");
    Ok(config)
}

/// Build the catalog client for a configuration.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built.
pub fn client(config: &StorefrontConfig) -> Result<CatalogClient, Box<dyn std::error::Error>> {
    Ok(CatalogClient::new(&config.catalog)?)
}
