//! Quickcart Core - Shared types library.
//!
//! This crate provides common types used across all Quickcart components:
//! - `storefront` - Catalog, cart model, search and view-models
//! - `cli` - Terminal front end that drives a shopping session
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps it
//! lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
