//! View-models for the product grid, cart panel and quick view.
//!
//! Rendering is a pure projection of catalog and cart state. Front ends call
//! these after every mutation and draw the result however they like.

use quickcart_core::{Price, ProductId};
use serde::Serialize;

use crate::cart::{Cart, CartLine};
use crate::catalog::Product;

/// Grid cards show at most this many characters of the description.
const SUMMARY_CHARS: usize = 80;

/// Shown in the quick view when a product has no description.
const NO_DESCRIPTION: &str = "No description available.";

fn stock_label(product: &Product) -> String {
    if product.in_stock() {
        format!("In stock: {}", product.stock_quantity)
    } else {
        "Out of stock".to_string()
    }
}

fn summarize(text: &str) -> String {
    if text.chars().count() <= SUMMARY_CHARS {
        return text.to_string();
    }
    let cut: String = text.chars().take(SUMMARY_CHARS - 1).collect();
    format!("{}…", cut.trim_end())
}

// =============================================================================
// Product Grid
// =============================================================================

/// One product card in the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductCardView {
    pub id: ProductId,
    pub name: String,
    pub price: String,
    pub summary: Option<String>,
    pub image_url: Option<String>,
    pub stock_label: String,
    pub in_stock: bool,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price.display(),
            summary: product.description.as_deref().map(summarize),
            image_url: product.image_url.clone(),
            stock_label: stock_label(product),
            in_stock: product.in_stock(),
        }
    }
}

/// The product grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogView {
    pub products: Vec<ProductCardView>,
    pub result_count: usize,
}

impl CatalogView {
    /// Render a sequence of products, typically search results.
    pub fn render<'a>(products: impl IntoIterator<Item = &'a Product>) -> Self {
        let products: Vec<ProductCardView> =
            products.into_iter().map(ProductCardView::from).collect();
        Self {
            result_count: products.len(),
            products,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

// =============================================================================
// Cart Panel
// =============================================================================

/// Cart line display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartItemView {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    pub image_url: Option<String>,
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id,
            name: line.name.clone(),
            quantity: line.quantity(),
            price: line.price.display(),
            line_price: line.line_total().display(),
            image_url: line.image_url.clone(),
        }
    }
}

/// Cart panel display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u64,
}

impl CartView {
    /// Create an empty cart view.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            subtotal: Price::ZERO.display(),
            item_count: 0,
        }
    }

    /// Render the cart panel.
    #[must_use]
    pub fn render(cart: &Cart) -> Self {
        if cart.is_empty() {
            return Self::empty();
        }
        Self {
            items: cart.lines().iter().map(CartItemView::from).collect(),
            subtotal: cart.total().display(),
            item_count: cart.item_count(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Cart count badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CartBadge {
    pub count: u64,
}

impl From<&Cart> for CartBadge {
    fn from(cart: &Cart) -> Self {
        Self {
            count: cart.item_count(),
        }
    }
}

// =============================================================================
// Quick View
// =============================================================================

/// Read-only detail panel for a single product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuickView {
    pub id: ProductId,
    pub name: String,
    pub price: String,
    pub description: String,
    pub image_url: Option<String>,
    pub stock_label: String,
    pub in_stock: bool,
    /// Units of this product already in the cart.
    pub in_cart_quantity: u32,
}

impl QuickView {
    #[must_use]
    pub fn render(product: &Product, cart: &Cart) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price.display(),
            description: product
                .description
                .clone()
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            image_url: product.image_url.clone(),
            stock_label: stock_label(product),
            in_stock: product.in_stock(),
            in_cart_quantity: cart.line(product.id).map_or(0, CartLine::quantity),
        }
    }
}
