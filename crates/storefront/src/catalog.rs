//! Catalog store.
//!
//! Holds the products returned by the last catalog fetch, in fetch order.
//! An empty catalog (fetch pending or failed) answers every lookup with `None`.

use std::collections::HashMap;

use quickcart_core::{Price, ProductId};
use serde::Serialize;

use crate::client::WireProduct;

/// A product available for purchase.
///
/// Immutable from the client's perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub stock_quantity: u32,
}

impl Product {
    /// Create a product with no description, no image and no stock.
    #[must_use]
    pub fn new(id: ProductId, name: impl Into<String>, price: Price) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            description: None,
            image_url: None,
            stock_quantity: 0,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    #[must_use]
    pub const fn with_stock(mut self, stock_quantity: u32) -> Self {
        self.stock_quantity = stock_quantity;
        self
    }

    /// Whether at least one unit is in stock.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock_quantity > 0
    }
}

impl From<WireProduct> for Product {
    fn from(wire: WireProduct) -> Self {
        Self {
            id: wire.product_id,
            name: wire.name,
            price: wire.price,
            description: wire.description.filter(|d| !d.trim().is_empty()),
            image_url: wire.image_url.filter(|u| !u.trim().is_empty()),
            stock_quantity: wire.stock_quantity,
        }
    }
}

/// The last-fetched list of products.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    index: HashMap<ProductId, usize>,
}

impl Catalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog, skipping records that break catalog invariants.
    ///
    /// Products with a negative price are dropped. When an id repeats, the
    /// first occurrence wins.
    pub fn from_products(products: impl IntoIterator<Item = Product>) -> Self {
        let mut catalog = Self::new();

        for product in products {
            if product.price.is_negative() {
                tracing::warn!(
                    product_id = %product.id,
                    price = %product.price.amount(),
                    "Skipping product with negative price"
                );
                continue;
            }
            if catalog.index.contains_key(&product.id) {
                tracing::warn!(product_id = %product.id, "Skipping duplicate product id");
                continue;
            }
            catalog.index.insert(product.id, catalog.products.len());
            catalog.products.push(product);
        }

        catalog
    }

    /// Build a catalog from catalog endpoint records.
    pub fn from_wire(records: Vec<WireProduct>) -> Self {
        Self::from_products(records.into_iter().map(Product::from))
    }

    /// Look up a product by id.
    #[must_use]
    pub fn find_by_id(&self, product_id: ProductId) -> Option<&Product> {
        self.index
            .get(&product_id)
            .and_then(|&pos| self.products.get(pos))
    }

    /// All products, in fetch order.
    #[must_use]
    pub fn all(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
