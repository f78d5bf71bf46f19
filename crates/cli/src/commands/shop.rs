//! Interactive shopping session.
//!
//! Fetches the catalog once, then reads one command per line until `quit` or
//! end of input. Every command is followed by the notifications it produced.
//!
//! # Usage
//!
//! ```bash
//! qc shop --url https://shop.example.com/api/products
//! ```

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use quickcart_core::{Price, ProductId};
use quickcart_storefront::preferences::{self, PreferenceStore};
use quickcart_storefront::{
    CatalogView, FilePreferenceStore, NotificationQueue, SearchQuery, Shop, SortKey, Theme,
};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::render;

const HELP: &str = "\
Commands:
  list                 show products matching the current search
  search <text>        search names and descriptions (empty clears)
  sort <key>           featured | price-asc | price-desc | name
  max <price>|off      price ceiling
  instock on|off       hide products that are out of stock
  view <id>            product details
  add <id>             add one to the cart
  qty <id> <n>         set quantity (0 removes)
  remove <id>          remove from the cart
  cart                 show the cart
  checkout             place the order
  theme                toggle light/dark
  help                 this text
  quit                 leave";

/// Errors parsing a session command line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command: {0} (type `help` for a list)")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("{0}")]
    Invalid(String),
}

/// One session command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShopCommand {
    List,
    Search(String),
    Sort(SortKey),
    MaxPrice(Option<Price>),
    InStock(bool),
    View(ProductId),
    Add(ProductId),
    Quantity(ProductId, i64),
    Remove(ProductId),
    Cart,
    Checkout,
    Theme,
    Help,
    Quit,
}

/// Whether the session should keep reading commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

fn parse_id(arg: Option<&str>, usage: &'static str) -> Result<ProductId, CommandError> {
    let arg = arg.ok_or(CommandError::Usage(usage))?;
    arg.parse()
        .map_err(|_| CommandError::Invalid(format!("not a product id: {arg}")))
}

fn parse_switch(arg: Option<&str>, usage: &'static str) -> Result<bool, CommandError> {
    match arg.map(str::to_ascii_lowercase).as_deref() {
        Some("on" | "yes" | "true") => Ok(true),
        Some("off" | "no" | "false") => Ok(false),
        _ => Err(CommandError::Usage(usage)),
    }
}

/// Parse a price typed by the user.
///
/// # Errors
///
/// Returns `CommandError::Invalid` for non-numeric or negative input.
pub fn parse_price(raw: &str) -> Result<Price, CommandError> {
    let amount = Decimal::from_str(raw.trim().trim_start_matches(['$', '₹']))
        .map_err(|_| CommandError::Invalid(format!("not a price: {raw}")))?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(CommandError::Invalid(format!("price cannot be negative: {raw}")));
    }
    Ok(Price::new(amount))
}

impl FromStr for ShopCommand {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let mut args = rest.split_whitespace();

        match verb.to_ascii_lowercase().as_str() {
            "list" | "ls" => Ok(Self::List),
            "search" | "find" => Ok(Self::Search(rest.to_string())),
            "sort" => {
                let key = args.next().ok_or(CommandError::Usage("sort <key>"))?;
                key.parse().map(Self::Sort).map_err(CommandError::Invalid)
            }
            "max" => match args.next() {
                Some(arg) if arg.eq_ignore_ascii_case("off") => Ok(Self::MaxPrice(None)),
                Some(arg) => parse_price(arg).map(|p| Self::MaxPrice(Some(p))),
                None => Err(CommandError::Usage("max <price>|off")),
            },
            "instock" => parse_switch(args.next(), "instock on|off").map(Self::InStock),
            "view" | "show" => parse_id(args.next(), "view <id>").map(Self::View),
            "add" => parse_id(args.next(), "add <id>").map(Self::Add),
            "qty" | "quantity" => {
                let id = parse_id(args.next(), "qty <id> <n>")?;
                let raw = args.next().ok_or(CommandError::Usage("qty <id> <n>"))?;
                let quantity = raw
                    .parse::<i64>()
                    .map_err(|_| CommandError::Invalid(format!("not a quantity: {raw}")))?;
                Ok(Self::Quantity(id, quantity))
            }
            "remove" | "rm" => parse_id(args.next(), "remove <id>").map(Self::Remove),
            "cart" => Ok(Self::Cart),
            "checkout" => Ok(Self::Checkout),
            "theme" => Ok(Self::Theme),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

/// Fetch the catalog and run an interactive session on stdin/stdout.
///
/// A failed fetch is reported and the session continues with an empty
/// catalog.
///
/// # Errors
///
/// Returns an error if configuration is missing or the terminal fails.
pub async fn run(url: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(url)?;
    let client = super::client(&config)?;

    let mut store = FilePreferenceStore::new(&config.preferences_path);
    let theme = preferences::load_theme(&store).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Could not read preferences, using default theme");
        Theme::default()
    });

    let mut shop = Shop::new(NotificationQueue::new()).with_theme(theme);
    let loaded = shop.load_catalog(&client).await.is_ok();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    flush_notifications(&mut shop, &mut out)?;
    if loaded {
        render::catalog(&mut out, &shop.results())?;
    }

    let stdin = io::stdin();
    interact(&mut shop, &mut store, stdin.lock(), &mut out)?;
    Ok(())
}

/// Read and execute commands until `quit` or end of input.
///
/// # Errors
///
/// Returns an error if reading input or writing output fails.
pub fn interact(
    shop: &mut Shop<NotificationQueue>,
    store: &mut dyn PreferenceStore,
    input: impl BufRead,
    out: &mut impl Write,
) -> io::Result<()> {
    prompt(shop, out)?;

    for line in input.lines() {
        let line = line?;
        if !line.trim().is_empty() {
            match line.parse::<ShopCommand>() {
                Ok(command) => {
                    let flow = execute(shop, store, command, out)?;
                    flush_notifications(shop, out)?;
                    if flow == Flow::Quit {
                        return Ok(());
                    }
                }
                Err(e) => writeln!(out, "{e}")?,
            }
        }
        prompt(shop, out)?;
    }

    writeln!(out)
}

/// Execute one command and draw its result.
///
/// Session failures are reported through notifications, so they do not
/// surface here.
///
/// # Errors
///
/// Returns an error only if writing output fails.
pub fn execute(
    shop: &mut Shop<NotificationQueue>,
    store: &mut dyn PreferenceStore,
    command: ShopCommand,
    out: &mut impl Write,
) -> io::Result<Flow> {
    tracing::debug!(?command, "Executing command");

    match command {
        ShopCommand::List => {
            let view = shop.results();
            show_results(shop, &view, out)?;
        }
        ShopCommand::Search(text) => {
            let query = shop.query().clone().with_text(text);
            let view = shop.search(query);
            show_results(shop, &view, out)?;
        }
        ShopCommand::Sort(sort) => {
            let query = shop.query().clone().with_sort(sort);
            let view = shop.search(query);
            show_results(shop, &view, out)?;
        }
        ShopCommand::MaxPrice(max_price) => {
            let query = shop.query().clone().with_max_price(max_price);
            let view = shop.search(query);
            show_results(shop, &view, out)?;
        }
        ShopCommand::InStock(in_stock_only) => {
            let query: SearchQuery = shop.query().clone().with_in_stock_only(in_stock_only);
            let view = shop.search(query);
            show_results(shop, &view, out)?;
        }
        ShopCommand::View(product_id) => {
            if let Ok(view) = shop.quick_view(product_id) {
                render::quick_view(out, &view)?;
            }
        }
        ShopCommand::Add(product_id) => {
            let _ = shop.add_to_cart(product_id);
        }
        ShopCommand::Quantity(product_id, quantity) => {
            let _ = shop.update_quantity(product_id, quantity);
        }
        ShopCommand::Remove(product_id) => {
            shop.remove_from_cart(product_id);
        }
        ShopCommand::Cart => render::cart(out, &shop.cart_view())?,
        ShopCommand::Checkout => {
            if let Ok(summary) = shop.checkout() {
                render::receipt(out, &summary)?;
            }
        }
        ShopCommand::Theme => {
            let _ = shop.toggle_theme(store);
        }
        ShopCommand::Help => writeln!(out, "{HELP}")?,
        ShopCommand::Quit => return Ok(Flow::Quit),
    }

    Ok(Flow::Continue)
}

/// Draw search results, noting when the current query narrows or reorders them.
fn show_results(
    shop: &Shop<NotificationQueue>,
    view: &CatalogView,
    out: &mut impl Write,
) -> io::Result<()> {
    render::catalog(out, view)?;
    if !shop.query().is_default() {
        writeln!(
            out,
            "(filtered, {} of {} products)",
            view.result_count,
            shop.catalog().len()
        )?;
    }
    Ok(())
}

fn flush_notifications(
    shop: &mut Shop<NotificationQueue>,
    out: &mut impl Write,
) -> io::Result<()> {
    let theme = shop.theme();
    let pending = shop.notifier_mut().drain();
    render::notifications(out, &pending, theme)
}

fn prompt(shop: &Shop<NotificationQueue>, out: &mut impl Write) -> io::Result<()> {
    write!(out, "qc ({})> ", shop.badge().count)?;
    out.flush()
}
