//! Plain-text drawing of storefront view-models.

use std::io::{self, Write};

use crossterm::style::Stylize;
use quickcart_storefront::{
    CartView, CatalogView, CheckoutSummary, Notification, QuickView, Severity, Theme,
};

/// Draw the product grid as a table.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn catalog(out: &mut impl Write, view: &CatalogView) -> io::Result<()> {
    if view.is_empty() {
        return writeln!(out, "No products match.");
    }

    writeln!(out, "{:>6}  {:<28} {:>10}  {}", "ID", "NAME", "PRICE", "STOCK")?;
    for card in &view.products {
        writeln!(
            out,
            "{:>6}  {:<28} {:>10}  {}",
            card.id.as_i64(), card.name, card.price, card.stock_label
        )?;
        if let Some(summary) = &card.summary {
            writeln!(out, "{:>6}  {summary}", "")?;
        }
    }
    writeln!(out, "{} product(s)", view.result_count)
}

/// Draw the cart panel.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn cart(out: &mut impl Write, view: &CartView) -> io::Result<()> {
    if view.is_empty() {
        return writeln!(out, "Your cart is empty.");
    }

    writeln!(out, "Cart ({} item(s))", view.item_count)?;
    for item in &view.items {
        writeln!(
            out,
            "{:>6}  {:<28} x{:<4} {:>10} {:>10}",
            item.product_id.as_i64(), item.name, item.quantity, item.price, item.line_price
        )?;
    }
    writeln!(out, "Subtotal: {}", view.subtotal)
}

/// Draw the quick view panel.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn quick_view(out: &mut impl Write, view: &QuickView) -> io::Result<()> {
    writeln!(out, "{} ({})", view.name, view.price)?;
    writeln!(out, "{} | in cart: {}", view.stock_label, view.in_cart_quantity)?;
    if let Some(url) = &view.image_url {
        writeln!(out, "Image: {url}")?;
    }
    writeln!(out, "{}", view.description)
}

/// Draw a checkout receipt.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn receipt(out: &mut impl Write, summary: &CheckoutSummary) -> io::Result<()> {
    for line in &summary.lines {
        writeln!(
            out,
            "  {} x{} {}",
            line.name,
            line.quantity(),
            line.line_total().display()
        )?;
    }
    writeln!(
        out,
        "Total: {} ({} item(s))",
        summary.total.display(),
        summary.item_count
    )
}

/// Draw pending notifications, one per line.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn notifications(
    out: &mut impl Write,
    notifications: &[Notification],
    theme: Theme,
) -> io::Result<()> {
    for notification in notifications {
        let marker = match notification.severity {
            Severity::Success => "+",
            Severity::Info => "i",
            Severity::Warning => "!",
            Severity::Error => "x",
        };
        match theme {
            Theme::Light => writeln!(out, "[{marker}] {}", notification.message)?,
            // Bright text on dark terminals
            Theme::Dark => writeln!(
                out,
                "{} {}",
                format!("[{marker}]").bold(),
                notification.message
            )?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use quickcart_core::{Price, ProductId};
    use quickcart_storefront::{Cart, Catalog, Product};

    use super::*;

    fn render<F>(draw: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        draw(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn catalog_with_pen() -> Catalog {
        Catalog::from_products([Product::new(ProductId::new(1), "Pen", Price::from_cents(1000))
            .with_description("Blue ink")
            .with_stock(3)])
    }

    #[test]
    fn test_catalog_table() {
        let view = CatalogView::render(catalog_with_pen().all());
        let text = render(|out| catalog(out, &view));
        assert!(text.contains("Pen"));
        assert!(text.contains("₹10.00"));
        assert!(text.contains("In stock: 3"));
        assert!(text.contains("Blue ink"));
        assert!(text.ends_with("1 product(s)\n"));
    }

    #[test]
    fn test_empty_catalog() {
        let view = CatalogView::render(Catalog::new().all());
        assert_eq!(render(|out| catalog(out, &view)), "No products match.\n");
    }

    #[test]
    fn test_cart_panel() {
        let catalog = catalog_with_pen();
        let mut shopping_cart = Cart::new();
        shopping_cart.add_item(&catalog, ProductId::new(1)).unwrap();
        shopping_cart.add_item(&catalog, ProductId::new(1)).unwrap();

        let text = render(|out| cart(out, &CartView::render(&shopping_cart)));
        assert!(text.starts_with("Cart (2 item(s))"));
        assert!(text.contains("₹20.00"));
        assert!(text.ends_with("Subtotal: ₹20.00\n"));

        let text = render(|out| cart(out, &CartView::empty()));
        assert_eq!(text, "Your cart is empty.\n");
    }

    #[test]
    fn test_notifications_light() {
        let text = render(|out| {
            notifications(
                out,
                &[
                    Notification::success("Added Pen to cart"),
                    Notification::warning("Your cart is empty"),
                ],
                Theme::Light,
            )
        });
        assert_eq!(text, "[+] Added Pen to cart\n[!] Your cart is empty\n");
    }

    #[test]
    fn test_notifications_dark() {
        let text = render(|out| {
            notifications(out, &[Notification::error("Checkout failed")], Theme::Dark)
        });
        assert!(text.starts_with("\x1b[1m"));
        assert!(text.contains("[x]"));
        assert!(text.ends_with(" Checkout failed\n"));
        assert_ne!(text, "[x] Checkout failed\n");
    }
}
