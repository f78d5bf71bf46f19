//! Unified error handling.
//!
//! Provides a unified `AppError` type for session operations. Every variant is
//! non-fatal: the session reports it as a notification and carries on with its
//! prior state.

use thiserror::Error;

use crate::cart::CartError;
use crate::client::FetchError;
use crate::config::ConfigError;
use crate::notify::Severity;
use crate::preferences::PreferenceError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// A product id is absent from the catalog or the cart.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Checkout was attempted with an empty cart.
    #[error("Your cart is empty")]
    EmptyCart,

    /// A quantity change the cart refused.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    /// Catalog retrieval failed.
    #[error("Could not load products: {0}")]
    FetchFailure(#[from] FetchError),

    /// Preference storage failed.
    #[error("Preferences error: {0}")]
    Preferences(#[from] PreferenceError),

    /// Configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl AppError {
    /// Severity of the notification that reports this error.
    ///
    /// User-input problems are warnings; everything else is an error.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::NotFound(_) | Self::EmptyCart | Self::InvalidQuantity(_) => Severity::Warning,
            Self::FetchFailure(_) | Self::Preferences(_) | Self::Config(_) => Severity::Error,
        }
    }
}

impl From<CartError> for AppError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::NotFound(product_id) => Self::NotFound(format!("product {product_id}")),
            CartError::EmptyCart => Self::EmptyCart,
            err @ (CartError::QuantityLimit(_) | CartError::TotalOverflow(_)) => {
                Self::InvalidQuantity(err.to_string())
            }
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
