//! Quickcart Storefront library.
//!
//! A storefront session engine: fetch a product catalog, search it, render it
//! into view-models, and keep an in-memory cart.
//!
//! # Architecture
//!
//! - [`catalog`] - Catalog store, populated once per session
//! - [`cart`] - Cart model; the only owner of cart state
//! - [`search`] - Pure filter/sort over the catalog
//! - [`views`] - Pure view-models for the grid, cart panel and quick view
//! - [`shop`] - Session controller tying the above together
//! - [`client`] - Catalog endpoint client (`reqwest`)
//! - [`preferences`] - Persisted theme flag
//! - [`notify`] - User-facing notifications
//!
//! # Example
//!
//! ```rust,ignore
//! use quickcart_storefront::{CatalogClient, NotificationQueue, Shop, StorefrontConfig};
//!
//! let config = StorefrontConfig::from_env()?;
//! let client = CatalogClient::new(&config.catalog)?;
//!
//! let mut shop = Shop::new(NotificationQueue::new());
//! shop.load_catalog(&client).await?;
//! shop.add_to_cart(ProductId::new(1))?;
//! println!("{}", shop.cart_view().subtotal);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod notify;
pub mod preferences;
pub mod search;
pub mod shop;
pub mod views;

pub use cart::{Cart, CartError, CartLine, MAX_LINE_QUANTITY};
pub use catalog::{Catalog, Product};
pub use client::{CatalogClient, FetchError, WireProduct};
pub use config::{CatalogConfig, ConfigError, StorefrontConfig};
pub use error::AppError;
pub use notify::{Notification, NotificationQueue, Notifier, Severity};
pub use preferences::{FilePreferenceStore, MemoryPreferenceStore, PreferenceStore, Theme};
pub use search::{SearchQuery, SortKey};
pub use shop::{CheckoutSummary, Shop};
pub use views::{CartBadge, CartItemView, CartView, CatalogView, ProductCardView, QuickView};
