//! Cart model.
//!
//! The cart is the sole owner of cart state. Lines keep the order in which
//! products were first added; at most one line exists per product id and
//! every stored line has a quantity of at least one and at most
//! [`MAX_LINE_QUANTITY`]. A mutation that would push the total past what a
//! `Decimal` can hold is refused, so `total()` never overflows.

use quickcart_core::{Price, ProductId};
use serde::Serialize;
use thiserror::Error;

use crate::catalog::{Catalog, Product};

/// Most units a single cart line may hold.
pub const MAX_LINE_QUANTITY: u32 = 9_999;

/// Errors returned by cart operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// The product id is absent from the catalog or the cart.
    #[error("Product {0} not found")]
    NotFound(ProductId),

    /// Checkout was attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// The requested quantity is above [`MAX_LINE_QUANTITY`].
    #[error("Quantity for product {0} cannot exceed {MAX_LINE_QUANTITY}")]
    QuantityLimit(ProductId),

    /// The change would make the cart total too large to represent.
    #[error("Cart total too large after changing product {0}")]
    TotalOverflow(ProductId),
}

/// One entry in the cart: a product snapshot plus a quantity.
///
/// The snapshot is taken when the line is created, so later catalog changes
/// do not reach existing lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    pub price: Price,
    pub image_url: Option<String>,
    quantity: u32,
}

impl CartLine {
    fn snapshot(product: &Product) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            price: product.price,
            image_url: product.image_url.clone(),
            quantity: 1,
        }
    }

    /// Number of units on this line. Always at least one.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// The shopping cart for one session.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of a catalog product.
    ///
    /// Increments the existing line, or appends a new line with quantity 1.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NotFound` if the product is not in the catalog,
    /// `CartError::QuantityLimit` if the line is already full, or
    /// `CartError::TotalOverflow` if the total would overflow. The cart is
    /// unchanged in every case.
    pub fn add_item(
        &mut self,
        catalog: &Catalog,
        product_id: ProductId,
    ) -> Result<&CartLine, CartError> {
        let product = catalog
            .find_by_id(product_id)
            .ok_or(CartError::NotFound(product_id))?;

        let existing = self.line(product_id).map(|line| (line.price, line.quantity));
        if let Some((price, quantity)) = existing {
            let quantity = quantity + 1;
            if quantity > MAX_LINE_QUANTITY {
                return Err(CartError::QuantityLimit(product_id));
            }
            self.check_total(product_id, price, quantity)?;
            if let Some(line) = self.line_mut(product_id) {
                line.quantity = quantity;
            }
        } else {
            self.check_total(product_id, product.price, 1)?;
            self.lines.push(CartLine::snapshot(product));
        }

        tracing::debug!(
            product_id = %product_id,
            item_count = self.item_count(),
            "Added item to cart"
        );

        self.line(product_id).ok_or(CartError::NotFound(product_id))
    }

    /// Overwrite the quantity of an existing line.
    ///
    /// A quantity of zero or less removes the line, exactly like
    /// [`Cart::remove_item`], and returns `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NotFound` if a positive quantity is set for a
    /// product with no line in the cart, `CartError::QuantityLimit` above
    /// [`MAX_LINE_QUANTITY`], or `CartError::TotalOverflow` if the total would
    /// overflow. The cart is unchanged on error.
    pub fn set_quantity(
        &mut self,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<Option<&CartLine>, CartError> {
        if quantity <= 0 {
            self.remove_item(product_id);
            return Ok(None);
        }

        let price = self
            .line(product_id)
            .ok_or(CartError::NotFound(product_id))?
            .price;
        let quantity = u32::try_from(quantity)
            .ok()
            .filter(|&q| q <= MAX_LINE_QUANTITY)
            .ok_or(CartError::QuantityLimit(product_id))?;
        self.check_total(product_id, price, quantity)?;

        let line = self
            .line_mut(product_id)
            .ok_or(CartError::NotFound(product_id))?;
        line.quantity = quantity;

        tracing::debug!(product_id = %product_id, quantity, "Updated cart quantity");

        Ok(self.line(product_id))
    }

    /// Remove a line. Removing an absent product is a no-op.
    pub fn remove_item(&mut self, product_id: ProductId) -> Option<CartLine> {
        let pos = self.position(product_id)?;
        let removed = self.lines.remove(pos);

        tracing::debug!(
            product_id = %product_id,
            item_count = self.item_count(),
            "Removed item from cart"
        );

        Some(removed)
    }

    /// Empty the cart unconditionally.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of price times quantity over all lines, unrounded.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Lines in the order they were first added.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product_id == product_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Fail unless the total stays representable with `product_id` at
    /// `quantity` units of `price`.
    fn check_total(
        &self,
        product_id: ProductId,
        price: Price,
        quantity: u32,
    ) -> Result<(), CartError> {
        let mut total = price.checked_times(quantity);
        for line in self.lines.iter().filter(|line| line.product_id != product_id) {
            total = total.and_then(|sum| sum.checked_add(line.price.checked_times(line.quantity)?));
        }

        total.map(|_| ()).ok_or(CartError::TotalOverflow(product_id))
    }

    fn line_mut(&mut self, product_id: ProductId) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| line.product_id == product_id)
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.lines
            .iter()
            .position(|line| line.product_id == product_id)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    use super::*;

    fn id(n: i64) -> ProductId {
        ProductId::new(n)
    }

    fn catalog() -> Catalog {
        Catalog::from_products([
            Product::new(id(1), "Pen", Price::from_cents(1000)),
            Product::new(id(2), "Ink", Price::from_cents(450)),
            Product::new(id(3), "Paper", Price::from_cents(399)),
        ])
    }

    #[test]
    fn test_pen_scenario() {
        let catalog = catalog();
        let mut cart = Cart::new();

        cart.add_item(&catalog, id(1)).unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.line(id(1)).unwrap().quantity(), 1);
        assert_eq!(cart.total().display(), "₹10.00");

        cart.add_item(&catalog, id(1)).unwrap();
        assert_eq!(cart.line(id(1)).unwrap().quantity(), 2);
        assert_eq!(cart.total().display(), "₹20.00");

        cart.set_quantity(id(1), 5).unwrap();
        assert_eq!(cart.line(id(1)).unwrap().quantity(), 5);
        assert_eq!(cart.total().display(), "₹50.00");

        cart.remove_item(id(1));
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Price::ZERO);
    }

    #[test]
    fn test_repeated_adds_keep_one_line() {
        let catalog = catalog();
        let mut cart = Cart::new();

        for expected in 1..=7 {
            let line = cart.add_item(&catalog, id(2)).unwrap();
            assert_eq!(line.quantity(), expected);
        }

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.item_count(), 7);
    }

    #[test]
    fn test_add_unknown_product_leaves_cart_unchanged() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add_item(&catalog, id(1)).unwrap();

        let err = cart.add_item(&catalog, id(999)).unwrap_err();

        assert_eq!(err, CartError::NotFound(id(999)));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_add_with_empty_catalog_is_not_found() {
        let mut cart = Cart::new();
        let err = cart.add_item(&Catalog::new(), id(1)).unwrap_err();
        assert_eq!(err, CartError::NotFound(id(1)));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_lines_keep_first_insertion_order() {
        let catalog = catalog();
        let mut cart = Cart::new();

        cart.add_item(&catalog, id(3)).unwrap();
        cart.add_item(&catalog, id(1)).unwrap();
        cart.add_item(&catalog, id(3)).unwrap();
        cart.set_quantity(id(3), 9).unwrap();

        let order: Vec<ProductId> = cart.lines().iter().map(|l| l.product_id).collect();
        assert_eq!(order, vec![id(3), id(1)]);
    }

    #[test]
    fn test_snapshot_ignores_later_catalog_changes() {
        let mut cart = Cart::new();
        cart.add_item(&catalog(), id(1)).unwrap();

        let repriced = Catalog::from_products([Product::new(
            id(1),
            "Fancy Pen",
            Price::from_cents(2500),
        )]);
        cart.add_item(&repriced, id(1)).unwrap();

        let line = cart.line(id(1)).unwrap();
        assert_eq!(line.name, "Pen");
        assert_eq!(line.price, Price::from_cents(1000));
        assert_eq!(line.quantity(), 2);
    }

    #[test]
    fn test_set_quantity_zero_matches_remove() {
        let catalog = catalog();
        let mut by_zero = Cart::new();
        let mut by_remove = Cart::new();
        for cart in [&mut by_zero, &mut by_remove] {
            cart.add_item(&catalog, id(1)).unwrap();
            cart.add_item(&catalog, id(2)).unwrap();
        }

        assert_eq!(by_zero.set_quantity(id(1), 0).unwrap(), None);
        assert!(by_remove.remove_item(id(1)).is_some());

        assert_eq!(by_zero.lines(), by_remove.lines());
        assert_eq!(by_zero.total(), by_remove.total());
    }

    #[test]
    fn test_set_quantity_negative_removes() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add_item(&catalog, id(1)).unwrap();

        assert_eq!(cart.set_quantity(id(1), -3).unwrap(), None);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_missing_line_is_not_found() {
        let mut cart = Cart::new();
        assert_eq!(
            cart.set_quantity(id(1), 2).unwrap_err(),
            CartError::NotFound(id(1))
        );
        // Non-positive quantity on a missing line is the same no-op as remove
        assert_eq!(cart.set_quantity(id(1), 0).unwrap(), None);
    }

    #[test]
    fn test_set_quantity_overwrites() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add_item(&catalog, id(2)).unwrap();
        cart.add_item(&catalog, id(2)).unwrap();

        let line = cart.set_quantity(id(2), 3).unwrap().unwrap();
        assert_eq!(line.quantity(), 3);
    }

    #[test]
    fn test_set_quantity_above_limit_is_rejected() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add_item(&catalog, id(2)).unwrap();

        for quantity in [i64::from(MAX_LINE_QUANTITY) + 1, i64::MAX] {
            assert_eq!(
                cart.set_quantity(id(2), quantity).unwrap_err(),
                CartError::QuantityLimit(id(2))
            );
        }
        assert_eq!(cart.line(id(2)).unwrap().quantity(), 1);

        let line = cart
            .set_quantity(id(2), i64::from(MAX_LINE_QUANTITY))
            .unwrap()
            .unwrap();
        assert_eq!(line.quantity(), MAX_LINE_QUANTITY);
        assert_eq!(
            cart.add_item(&catalog, id(2)).unwrap_err(),
            CartError::QuantityLimit(id(2))
        );
        assert_eq!(cart.item_count(), u64::from(MAX_LINE_QUANTITY));
    }

    #[test]
    fn test_huge_price_with_max_quantity_is_rejected() {
        let wire: Vec<crate::client::WireProduct> = serde_json::from_str(
            r#"[{"productId": 1, "name": "Yacht", "price": 30000000000000000000, "stockQuantity": 1}]"#,
        )
        .unwrap();
        let catalog = Catalog::from_wire(wire);
        let mut cart = Cart::new();
        cart.add_item(&catalog, id(1)).unwrap();

        assert_eq!(
            cart.set_quantity(id(1), i64::MAX).unwrap_err(),
            CartError::QuantityLimit(id(1))
        );
        assert_eq!(cart.total().amount(), Decimal::from_i128_with_scale(30_000_000_000_000_000_000, 0));
    }

    #[test]
    fn test_total_overflow_is_rejected() {
        // About an eighth of the largest Decimal
        let huge = Price::new(Decimal::from_i128_with_scale(10_i128.pow(28), 0));
        let catalog = Catalog::from_products([
            Product::new(id(1), "Island", huge),
            Product::new(id(2), "Pen", Price::from_cents(1000)),
        ]);
        let mut cart = Cart::new();
        cart.add_item(&catalog, id(1)).unwrap();
        cart.add_item(&catalog, id(2)).unwrap();

        assert!(cart.set_quantity(id(1), 7).is_ok());
        assert_eq!(
            cart.set_quantity(id(1), 8).unwrap_err(),
            CartError::TotalOverflow(id(1))
        );
        for _ in 0..7 {
            cart.add_item(&catalog, id(2)).unwrap();
        }

        assert_eq!(cart.line(id(1)).unwrap().quantity(), 7);
        assert_eq!(
            cart.total(),
            Price::new(huge.amount() * Decimal::from(7) + Decimal::from(80))
        );
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add_item(&catalog, id(1)).unwrap();

        assert!(cart.remove_item(id(2)).is_none());
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_total_tracks_adds_and_removes() {
        let catalog = catalog();
        let mut cart = Cart::new();

        cart.add_item(&catalog, id(1)).unwrap();
        let before = cart.total().amount();
        cart.add_item(&catalog, id(3)).unwrap();
        assert_eq!(cart.total().amount() - before, Price::from_cents(399).amount());

        cart.set_quantity(id(3), 4).unwrap();
        let before = cart.total().amount();
        let removed = cart.remove_item(id(3)).unwrap();
        assert_eq!(before - cart.total().amount(), removed.line_total().amount());
    }

    #[test]
    fn test_item_count_after_interleaving() {
        let catalog = catalog();
        let mut cart = Cart::new();

        cart.add_item(&catalog, id(1)).unwrap();
        cart.add_item(&catalog, id(2)).unwrap();
        cart.set_quantity(id(2), 4).unwrap();
        cart.add_item(&catalog, id(3)).unwrap();
        cart.remove_item(id(1));
        cart.add_item(&catalog, id(2)).unwrap();

        let expected: u64 = cart.lines().iter().map(|l| u64::from(l.quantity())).sum();
        assert_eq!(cart.item_count(), expected);
        assert_eq!(cart.item_count(), 6);
    }

    #[test]
    fn test_total_keeps_precision_until_display() {
        let catalog = Catalog::from_products([Product::new(
            id(7),
            "Sticker",
            Price::new(Decimal::new(3333, 4)),
        )]);
        let mut cart = Cart::new();
        cart.add_item(&catalog, id(7)).unwrap();
        cart.set_quantity(id(7), 3).unwrap();

        assert_eq!(cart.total().amount(), Decimal::new(9999, 4));
        assert_eq!(cart.total().display(), "₹1.00");
    }

    #[test]
    fn test_clear() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add_item(&catalog, id(1)).unwrap();
        cart.add_item(&catalog, id(2)).unwrap();

        cart.clear();

        assert_eq!(cart.item_count(), 0);
        assert_eq!(cart.total(), Price::ZERO);
        assert!(cart.lines().is_empty());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(i64),
        Set(i64, i64),
        Remove(i64),
    }

    // Id 4 is never in the catalog.
    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => (1..=4i64).prop_map(Op::Add),
            2 => (1..=4i64, -2..30i64).prop_map(|(id, q)| Op::Set(id, q)),
            1 => (1..=4i64).prop_map(Op::Remove),
        ]
    }

    fn apply_to_model(model: &mut Vec<(ProductId, u32)>, catalog: &Catalog, op: &Op) {
        match *op {
            Op::Add(n) => {
                if catalog.find_by_id(id(n)).is_none() {
                    return;
                }
                match model.iter_mut().find(|(pid, _)| *pid == id(n)) {
                    Some((_, quantity)) => *quantity += 1,
                    None => model.push((id(n), 1)),
                }
            }
            Op::Set(n, q) if q <= 0 => model.retain(|(pid, _)| *pid != id(n)),
            Op::Set(n, q) => {
                if let Some((_, quantity)) = model.iter_mut().find(|(pid, _)| *pid == id(n)) {
                    *quantity = u32::try_from(q).unwrap();
                }
            }
            Op::Remove(n) => model.retain(|(pid, _)| *pid != id(n)),
        }
    }

    proptest! {
        #[test]
        fn prop_cart_matches_model(ops in prop::collection::vec(arb_op(), 0..40)) {
            let catalog = catalog();
            let mut cart = Cart::new();
            let mut model: Vec<(ProductId, u32)> = Vec::new();

            for op in &ops {
                let result = match *op {
                    Op::Add(n) => cart.add_item(&catalog, id(n)).map(|_| ()),
                    Op::Set(n, q) => cart.set_quantity(id(n), q).map(|_| ()),
                    Op::Remove(n) => {
                        cart.remove_item(id(n));
                        Ok(())
                    }
                };
                if let Err(err) = result {
                    prop_assert!(matches!(err, CartError::NotFound(_)), "unexpected {err}");
                }
                apply_to_model(&mut model, &catalog, op);

                let ids: Vec<ProductId> = cart.lines().iter().map(|l| l.product_id).collect();
                let model_ids: Vec<ProductId> = model.iter().map(|(pid, _)| *pid).collect();
                prop_assert_eq!(&ids, &model_ids);

                let mut unique = ids.clone();
                unique.sort_unstable();
                unique.dedup();
                prop_assert_eq!(unique.len(), ids.len());

                for line in cart.lines() {
                    prop_assert!(line.quantity() >= 1);
                }
                let quantities: Vec<u32> = cart.lines().iter().map(CartLine::quantity).collect();
                let model_quantities: Vec<u32> = model.iter().map(|(_, q)| *q).collect();
                prop_assert_eq!(quantities, model_quantities);

                let count: u64 = model.iter().map(|(_, q)| u64::from(*q)).sum();
                prop_assert_eq!(cart.item_count(), count);

                let total = model.iter().fold(Decimal::ZERO, |sum, (pid, q)| {
                    let price = catalog.find_by_id(*pid).unwrap().price;
                    sum + price.amount() * Decimal::from(*q)
                });
                prop_assert_eq!(cart.total().amount(), total);
            }
        }
    }
}
