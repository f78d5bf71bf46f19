//! Quickcart CLI - Terminal storefront.
//!
//! # Usage
//!
//! ```bash
//! # List the catalog, filtered and sorted
//! qc catalog --search pen --max-price 20 --sort price-asc
//!
//! # Interactive shopping session
//! qc shop --url https://shop.example.com/api/products
//!
//! # Show or change the persisted theme
//! qc theme toggle
//! ```
//!
//! # Commands
//!
//! - `catalog` - Fetch and print the product grid
//! - `shop` - Fetch the catalog and start an interactive cart session
//! - `theme` - Show, set or toggle the light/dark theme
//!
//! The catalog URL comes from `--url` or `QUICKCART_CATALOG_URL`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io;

use clap::{Parser, Subcommand};
use quickcart_storefront::{SearchQuery, SortKey};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod render;

use commands::theme::ThemeAction;

#[derive(Parser)]
#[command(name = "qc")]
#[command(author, version, about = "Quickcart terminal storefront")]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and print the product catalog
    Catalog {
        /// Catalog endpoint (overrides `QUICKCART_CATALOG_URL`)
        #[arg(long)]
        url: Option<String>,

        /// Case-insensitive text to match in names and descriptions
        #[arg(short, long, default_value = "")]
        search: String,

        /// Highest price to include
        #[arg(long, value_parser = parse_max_price)]
        max_price: Option<quickcart_core::Price>,

        /// Sort order (featured, price-asc, price-desc, name)
        #[arg(long, default_value = "featured")]
        sort: SortKey,

        /// Hide products that are out of stock
        #[arg(long)]
        in_stock: bool,

        /// Print the grid as JSON
        #[arg(long)]
        json: bool,
    },
    /// Start an interactive shopping session
    Shop {
        /// Catalog endpoint (overrides `QUICKCART_CATALOG_URL`)
        #[arg(long)]
        url: Option<String>,
    },
    /// Show or change the color theme (light, dark, toggle)
    Theme {
        #[arg(default_value = "show")]
        action: ThemeAction,
    },
}

fn parse_max_price(raw: &str) -> Result<quickcart_core::Price, String> {
    commands::shop::parse_price(raw).map_err(|e| e.to_string())
}

fn init_tracing(verbose: bool) {
    // Defaults to info level for our crates if RUST_LOG is not set
    let default = if verbose {
        "quickcart_storefront=debug,quickcart_cli=debug"
    } else {
        "quickcart_storefront=info,quickcart_cli=info"
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into());

    // Logs go to stderr so stdout stays clean for output
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr)
                .compact(),
        )
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Catalog {
            url,
            search,
            max_price,
            sort,
            in_stock,
            json,
        } => {
            let query = SearchQuery::new()
                .with_text(search)
                .with_max_price(max_price)
                .with_in_stock_only(in_stock)
                .with_sort(sort);
            let mut out = io::stdout().lock();
            commands::catalog::list(url.as_deref(), &query, json, &mut out).await?;
        }
        Commands::Shop { url } => commands::shop::run(url.as_deref()).await?,
        Commands::Theme { action } => {
            let path = quickcart_storefront::config::preferences_path_from_env();
            commands::theme::run(&path, action, &mut io::stdout().lock())?;
        }
    }
    Ok(())
}
