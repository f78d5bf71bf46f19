//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `QUICKCART_CATALOG_URL` - URL of the JSON catalog endpoint
//!
//! ## Optional
//! - `QUICKCART_PREFERENCES_PATH` - Preferences file (default: .quickcart/preferences.json)
//! - `QUICKCART_USER_AGENT` - User-Agent for the catalog fetch (default: quickcart/<version>)

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

const DEFAULT_PREFERENCES_PATH: &str = ".quickcart/preferences.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront session configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Catalog endpoint configuration
    pub catalog: CatalogConfig,
    /// Where the theme preference is persisted
    pub preferences_path: PathBuf,
}

/// Catalog endpoint configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// URL returning the product list as JSON
    pub url: Url,
    /// User-Agent header sent with the fetch
    pub user_agent: String,
}

impl CatalogConfig {
    /// Configuration for `url` with the default user agent.
    #[must_use]
    pub fn new(url: Url) -> Self {
        Self {
            url,
            user_agent: default_user_agent(),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the catalog URL is missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the catalog URL is missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let raw_url = lookup("QUICKCART_CATALOG_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("QUICKCART_CATALOG_URL".to_string()))?;
        let url = parse_catalog_url(&raw_url).map_err(|reason| {
            ConfigError::InvalidEnvVar("QUICKCART_CATALOG_URL".to_string(), reason)
        })?;

        let user_agent = lookup("QUICKCART_USER_AGENT").unwrap_or_else(default_user_agent);
        let preferences_path = lookup("QUICKCART_PREFERENCES_PATH")
            .map_or_else(|| PathBuf::from(DEFAULT_PREFERENCES_PATH), PathBuf::from);

        Ok(Self {
            catalog: CatalogConfig { url, user_agent },
            preferences_path,
        })
    }

    /// Configuration for a catalog URL given on the command line.
    ///
    /// Optional settings still come from the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `url` is not an http(s) URL.
    pub fn with_catalog_url(url: &str) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| {
            if key == "QUICKCART_CATALOG_URL" {
                Some(url.to_string())
            } else {
                std::env::var(key).ok()
            }
        })
    }
}

/// Read only the preferences path from the environment.
///
/// Theme commands need no catalog URL, so they skip full configuration.
#[must_use]
pub fn preferences_path_from_env() -> PathBuf {
    let _ = dotenvy::dotenv();

    std::env::var("QUICKCART_PREFERENCES_PATH")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map_or_else(|| PathBuf::from(DEFAULT_PREFERENCES_PATH), PathBuf::from)
}

/// Parse and check a catalog URL.
///
/// # Errors
///
/// Returns a description of the problem if the URL does not parse or does
/// not use http or https.
pub fn parse_catalog_url(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw.trim()).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!("unsupported scheme {other}, expected http or https")),
    }
}

fn default_user_agent() -> String {
    format!("quickcart/{}", env!("CARGO_PKG_VERSION"))
}
