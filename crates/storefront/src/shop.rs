//! Shopping session controller.
//!
//! A [`Shop`] owns everything a single storefront session needs: the catalog,
//! the cart, the last-applied search and the theme. Front ends hold one `Shop`
//! and call its methods for each user action, then re-render from the read
//! accessors. Each mutating action and each failure emits one notification.

use quickcart_core::{Price, ProductId};
use serde::Serialize;
use tracing::instrument;

use crate::cart::{Cart, CartError, CartLine};
use crate::catalog::Catalog;
use crate::client::CatalogClient;
use crate::error::{AppError, Result};
use crate::notify::{Notification, Notifier};
use crate::preferences::{PreferenceStore, Theme, save_theme};
use crate::search::{self, SearchQuery};
use crate::views::{CartBadge, CartView, CatalogView, QuickView};

/// What was bought at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutSummary {
    pub lines: Vec<CartLine>,
    pub item_count: u64,
    pub total: Price,
}

/// One storefront session.
#[derive(Debug)]
pub struct Shop<N: Notifier> {
    catalog: Catalog,
    cart: Cart,
    query: SearchQuery,
    theme: Theme,
    notifier: N,
}

impl<N: Notifier> Shop<N> {
    /// Start a session with an empty catalog and an empty cart.
    pub fn new(notifier: N) -> Self {
        Self {
            catalog: Catalog::new(),
            cart: Cart::new(),
            query: SearchQuery::new(),
            theme: Theme::default(),
            notifier,
        }
    }

    /// Start with a previously persisted theme.
    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Fetch the catalog and replace the current one.
    ///
    /// Returns the number of products loaded.
    ///
    /// # Errors
    ///
    /// Returns `AppError::FetchFailure` if the fetch fails. The current
    /// catalog is kept, which at session start means it stays empty.
    #[instrument(skip(self, client), fields(endpoint = %client.endpoint()))]
    pub async fn load_catalog(&mut self, client: &CatalogClient) -> Result<usize> {
        match client.fetch_catalog().await {
            Ok(catalog) => {
                let count = catalog.len();
                self.catalog = catalog;
                tracing::info!(count, "Catalog loaded");
                self.emit(Notification::info(format!("Loaded {count} products")));
                Ok(count)
            }
            Err(e) => {
                tracing::error!(error = %e, "Catalog fetch failed");
                Err(self.fail(AppError::FetchFailure(e)))
            }
        }
    }

    /// Replace the catalog directly.
    pub fn set_catalog(&mut self, catalog: Catalog) {
        self.catalog = catalog;
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Apply a search and make it the last-applied query.
    pub fn search(&mut self, query: SearchQuery) -> CatalogView {
        tracing::debug!(?query, "Applying search");
        self.query = query;
        self.results()
    }

    /// Re-render the grid with the last-applied query.
    #[must_use]
    pub fn results(&self) -> CatalogView {
        CatalogView::render(search::apply(&self.catalog, &self.query))
    }

    /// The last-applied query.
    #[must_use]
    pub const fn query(&self) -> &SearchQuery {
        &self.query
    }

    /// Detail panel for one product.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the product is not in the catalog.
    pub fn quick_view(&mut self, product_id: ProductId) -> Result<QuickView> {
        match self.catalog.find_by_id(product_id) {
            Some(product) => Ok(QuickView::render(product, &self.cart)),
            None => Err(self.fail(CartError::NotFound(product_id).into())),
        }
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Add one unit of a product. Returns the line's new quantity.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the product is not in the catalog, or
    /// `AppError::InvalidQuantity` if its line is full.
    #[instrument(skip(self))]
    pub fn add_to_cart(&mut self, product_id: ProductId) -> Result<u32> {
        match self.cart.add_item(&self.catalog, product_id) {
            Ok(line) => {
                let quantity = line.quantity();
                let message = format!("Added {} to cart", line.name);
                self.emit(Notification::success(message));
                Ok(quantity)
            }
            Err(e) => Err(self.fail(e.into())),
        }
    }

    /// Set a line's quantity. Zero or less removes the line.
    ///
    /// Returns the new quantity, or `None` if the line was removed.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if a positive quantity is set for a
    /// product that is not in the cart, or `AppError::InvalidQuantity` if the
    /// cart refuses the quantity.
    #[instrument(skip(self))]
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: i64) -> Result<Option<u32>> {
        if quantity <= 0 {
            self.remove_from_cart(product_id);
            return Ok(None);
        }

        match self.cart.set_quantity(product_id, quantity) {
            Ok(Some(line)) => {
                let quantity = line.quantity();
                let message = format!("Updated {} quantity to {quantity}", line.name);
                self.emit(Notification::success(message));
                Ok(Some(quantity))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(self.fail(e.into())),
        }
    }

    /// Remove a product from the cart. Absent products are a no-op.
    #[instrument(skip(self))]
    pub fn remove_from_cart(&mut self, product_id: ProductId) -> Option<CartLine> {
        let removed = self.cart.remove_item(product_id);
        let message = match &removed {
            Some(line) => format!("Removed {} from cart", line.name),
            None => format!("Product {product_id} is not in your cart"),
        };
        self.emit(Notification::info(message));
        removed
    }

    /// Check out: summarise and clear the cart. No payment is taken.
    ///
    /// # Errors
    ///
    /// Returns `AppError::EmptyCart` if there is nothing to check out. The
    /// cart is left untouched.
    #[instrument(skip(self))]
    pub fn checkout(&mut self) -> Result<CheckoutSummary> {
        if self.cart.is_empty() {
            return Err(self.fail(CartError::EmptyCart.into()));
        }

        let summary = CheckoutSummary {
            lines: self.cart.lines().to_vec(),
            item_count: self.cart.item_count(),
            total: self.cart.total(),
        };
        self.cart.clear();

        tracing::info!(
            item_count = summary.item_count,
            total = %summary.total.amount(),
            "Checkout complete"
        );
        self.emit(Notification::success(format!(
            "Thank you for your order! {} items, {}",
            summary.item_count,
            summary.total.display()
        )));

        Ok(summary)
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Render the cart panel.
    #[must_use]
    pub fn cart_view(&self) -> CartView {
        CartView::render(&self.cart)
    }

    #[must_use]
    pub fn badge(&self) -> CartBadge {
        CartBadge::from(&self.cart)
    }

    // =========================================================================
    // Theme
    // =========================================================================

    #[must_use]
    pub const fn theme(&self) -> Theme {
        self.theme
    }

    /// Flip the theme and persist it.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Preferences` if the theme cannot be saved. The
    /// current theme is kept in that case.
    pub fn toggle_theme(&mut self, store: &mut dyn PreferenceStore) -> Result<Theme> {
        let next = self.theme.toggle();
        if let Err(e) = save_theme(store, next) {
            return Err(self.fail(e.into()));
        }
        self.theme = next;
        self.emit(Notification::info(format!("Switched to {next} theme")));
        Ok(next)
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    pub const fn notifier(&self) -> &N {
        &self.notifier
    }

    pub const fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    fn emit(&mut self, notification: Notification) {
        tracing::debug!(
            severity = %notification.severity,
            message = %notification.message,
            "Notification"
        );
        self.notifier.notify(notification);
    }

    fn fail(&mut self, err: AppError) -> AppError {
        self.emit(Notification::new(err.severity(), err.to_string()));
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Product;
    use crate::notify::{NotificationQueue, Severity};
    use crate::preferences::{MemoryPreferenceStore, load_theme};
    use crate::search::SortKey;

    fn id(n: i64) -> ProductId {
        ProductId::new(n)
    }

    fn shop() -> Shop<NotificationQueue> {
        let mut shop = Shop::new(NotificationQueue::new());
        shop.set_catalog(Catalog::from_products([
            Product::new(id(1), "Pen", Price::from_cents(1000)).with_stock(5),
            Product::new(id(2), "Ink", Price::from_cents(450)).with_stock(0),
        ]));
        shop
    }

    fn last_severity(shop: &Shop<NotificationQueue>) -> Severity {
        shop.notifier().last().unwrap().severity
    }

    #[test]
    fn test_add_notifies_success() {
        let mut shop = shop();
        assert_eq!(shop.add_to_cart(id(1)).unwrap(), 1);
        assert_eq!(shop.add_to_cart(id(1)).unwrap(), 2);

        let notification = shop.notifier().last().unwrap();
        assert_eq!(notification.severity, Severity::Success);
        assert_eq!(notification.message, "Added Pen to cart");
        assert_eq!(shop.badge().count, 2);
    }

    #[test]
    fn test_add_unknown_warns_and_leaves_cart() {
        let mut shop = shop();
        shop.add_to_cart(id(1)).unwrap();

        let err = shop.add_to_cart(id(999)).unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(last_severity(&shop), Severity::Warning);
        assert_eq!(shop.cart().item_count(), 1);
    }

    #[test]
    fn test_update_quantity() {
        let mut shop = shop();
        shop.add_to_cart(id(1)).unwrap();

        assert_eq!(shop.update_quantity(id(1), 5).unwrap(), Some(5));
        assert_eq!(shop.cart_view().subtotal, "₹50.00");

        assert_eq!(shop.update_quantity(id(1), 0).unwrap(), None);
        assert!(shop.cart().is_empty());
        assert_eq!(last_severity(&shop), Severity::Info);
    }

    #[test]
    fn test_update_missing_line_is_not_found() {
        let mut shop = shop();
        let err = shop.update_quantity(id(1), 3).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(last_severity(&shop), Severity::Warning);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut shop = shop();
        assert!(shop.remove_from_cart(id(2)).is_none());
        assert_eq!(
            shop.notifier().last().unwrap().message,
            "Product 2 is not in your cart"
        );
    }

    #[test]
    fn test_checkout_clears_cart() {
        let mut shop = shop();
        shop.add_to_cart(id(1)).unwrap();
        shop.add_to_cart(id(2)).unwrap();
        shop.update_quantity(id(2), 2).unwrap();

        let summary = shop.checkout().unwrap();

        assert_eq!(summary.item_count, 3);
        assert_eq!(summary.total, Price::from_cents(1900));
        assert_eq!(summary.lines.len(), 2);
        assert!(shop.cart().is_empty());
        assert_eq!(shop.cart_view(), CartView::empty());
        assert_eq!(last_severity(&shop), Severity::Success);
    }

    #[test]
    fn test_checkout_empty_cart() {
        let mut shop = shop();
        let err = shop.checkout().unwrap_err();
        assert!(matches!(err, AppError::EmptyCart));
        assert_eq!(last_severity(&shop), Severity::Warning);
        assert!(shop.cart().is_empty());
    }

    #[test]
    fn test_quick_view() {
        let mut shop = shop();
        shop.add_to_cart(id(1)).unwrap();

        let view = shop.quick_view(id(1)).unwrap();
        assert_eq!(view.in_cart_quantity, 1);

        assert!(matches!(shop.quick_view(id(42)), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_search_remembers_query() {
        let mut shop = shop();
        let view = shop.search(SearchQuery::new().with_sort(SortKey::PriceAsc));
        assert_eq!(view.products[0].name, "Ink");

        shop.add_to_cart(id(1)).unwrap();
        let again = shop.results();
        assert_eq!(again, view);
        assert_eq!(shop.query().sort, SortKey::PriceAsc);
    }

    #[test]
    fn test_empty_catalog_session() {
        let mut shop = Shop::new(NotificationQueue::new());
        assert!(shop.results().is_empty());
        assert!(shop.add_to_cart(id(1)).is_err());
    }

    #[test]
    fn test_toggle_theme_persists() {
        let mut shop = shop();
        let mut store = MemoryPreferenceStore::new();

        assert_eq!(shop.toggle_theme(&mut store).unwrap(), Theme::Dark);
        assert_eq!(load_theme(&store).unwrap(), Theme::Dark);
        assert_eq!(shop.toggle_theme(&mut store).unwrap(), Theme::Light);
        assert_eq!(shop.theme(), Theme::Light);
    }

    #[test]
    fn test_update_quantity_over_limit_warns() {
        let mut shop = shop();
        shop.add_to_cart(id(1)).unwrap();
        shop.notifier_mut().drain();

        let err = shop.update_quantity(id(1), i64::MAX).unwrap_err();

        assert!(matches!(err, AppError::InvalidQuantity(_)));
        assert_eq!(shop.cart().line(id(1)).unwrap().quantity(), 1);
        assert_eq!(shop.notifier().len(), 1);
        assert_eq!(last_severity(&shop), Severity::Warning);
        assert_eq!(shop.cart_view().subtotal, "₹10.00");
    }

    #[test]
    fn test_with_theme() {
        let shop = Shop::new(NotificationQueue::new()).with_theme(Theme::Dark);
        assert_eq!(shop.theme(), Theme::Dark);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_keeps_catalog() {
        let url = url::Url::parse("http://127.0.0.1:1/products").unwrap();
        let client = CatalogClient::new(&crate::config::CatalogConfig::new(url)).unwrap();
        let mut shop = shop();

        let err = shop.load_catalog(&client).await.unwrap_err();

        assert!(matches!(err, AppError::FetchFailure(_)));
        assert_eq!(shop.catalog().len(), 2);
        assert_eq!(shop.notifier().len(), 1);
        assert_eq!(last_severity(&shop), Severity::Error);
    }
}
