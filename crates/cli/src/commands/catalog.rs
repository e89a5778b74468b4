//! Catalog commands.

use little_oat_storefront::{Storefront, StorefrontError};

use super::CliError;

/// Fetch the catalog and print the rendered product grid.
///
/// An unreachable or empty catalog prints the maintenance message.
///
/// # Errors
///
/// Returns error if the grid template fails to render.
#[allow(clippy::print_stdout)]
pub async fn products(page: &Storefront) -> Result<(), CliError> {
    let grid = page.load_products().await;
    let html = grid.to_html().map_err(StorefrontError::from)?;
    println!("{html}");
    tracing::info!(count = grid.cards().len(), "Catalog printed");
    Ok(())
}
