//! One-shot catalog listing.
//!
//! # Usage
//!
//! ```bash
//! # Everything, in catalog order
//! qc catalog --url https://shop.example.com/api/products
//!
//! # Pens under ₹20, cheapest first, as JSON
//! qc catalog --search pen --max-price 20 --sort price-asc --json
//! ```

use std::io::Write;

use quickcart_storefront::{Catalog, CatalogView, SearchQuery, search};
use tracing::info;

use crate::render;

/// Fetch the catalog and print the filtered grid.
///
/// # Errors
///
/// Returns an error if configuration is missing, the fetch fails, or output
/// cannot be written.
pub async fn list(
    url: Option<&str>,
    query: &SearchQuery,
    json: bool,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(url)?;
    let client = super::client(&config)?;

    let catalog = client.fetch_catalog().await?;
    info!(count = catalog.len(), "Fetched catalog");

    write_results(&catalog, query, json, out)
}

/// Apply `query` and write the grid as a table or JSON.
///
/// # Errors
///
/// Returns an error if output cannot be written.
pub fn write_results(
    catalog: &Catalog,
    query: &SearchQuery,
    json: bool,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let view = CatalogView::render(search::apply(catalog, query));

    if json {
        serde_json::to_writer_pretty(&mut *out, &view)?;
        writeln!(out)?;
    } else {
        render::catalog(out, &view)?;
    }
    Ok(())
}
