//! Cart commands.
//!
//! Each invocation hydrates the cart from the storage file, applies one
//! action, and lets the cart store persist the result.

use little_oat_core::ProductId;
use little_oat_storefront::cart::EMPTY_CART_MESSAGE;
use little_oat_storefront::{CardMode, CartPanel, CheckoutOutcome, Storefront};

use super::CliError;

/// Plain-text rendering of the cart panel.
fn format_panel(panel: &CartPanel) -> String {
    if panel.is_empty() {
        return EMPTY_CART_MESSAGE.to_string();
    }

    let id_width = panel
        .lines
        .iter()
        .map(|line| line.id.as_str().len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for line in &panel.lines {
        out.push_str(&format!(
            "{:<id_width$}  {}  {}\n",
            line.id.as_str(),
            line.title,
            line.price
        ));
    }
    let noun = if panel.count == 1 { "item" } else { "items" };
    out.push_str(&format!("{} {noun}, total {}", panel.count, panel.total));
    out
}

/// Print the cart contents and total.
///
/// # Errors
///
/// Never fails; the signature matches the other commands.
#[allow(clippy::print_stdout, clippy::unnecessary_wraps)]
pub fn show(page: &Storefront) -> Result<(), CliError> {
    let panel = page.with_cart(|cart| cart.panel());
    println!("{}", format_panel(&panel));
    Ok(())
}

/// Add a catalog product to the cart.
///
/// # Errors
///
/// Returns error if cards are in buy-now mode or the id is not in the
/// catalog.
pub async fn add(page: &Storefront, id: &str) -> Result<(), CliError> {
    if page.card_mode() != CardMode::Cart {
        return Err(CliError::CartDisabled);
    }

    page.load_products().await;
    let id = ProductId::new(id);
    // Feedback is printed by the terminal UI; the delayed panel steps are moot here.
    let (outcome, _feedback) = page
        .add_to_cart_clicked(&id)
        .ok_or_else(|| CliError::UnknownProduct(id.to_string()))?;
    tracing::info!(product_id = %id, added = outcome.is_added(), "Add to cart");
    Ok(())
}

/// Remove a product from the cart.
///
/// # Errors
///
/// Never fails; removing an absent id only prints a note.
#[allow(clippy::print_stdout, clippy::unnecessary_wraps)]
pub fn remove(page: &Storefront, id: &str) -> Result<(), CliError> {
    let id = ProductId::new(id);
    let was_present = page.with_cart(|cart| cart.contains(&id));
    page.remove_from_cart(&id);
    if was_present {
        println!("Removed {id}");
    } else {
        println!("{id} was not in the cart");
    }
    Ok(())
}

/// Empty the cart, asking first unless `--yes` was given.
///
/// # Errors
///
/// Never fails; a declined prompt leaves the cart as it was.
#[allow(clippy::print_stdout, clippy::unnecessary_wraps)]
pub fn clear(page: &Storefront) -> Result<(), CliError> {
    if page.with_cart(|cart| cart.is_empty()) {
        println!("{EMPTY_CART_MESSAGE}");
    } else if page.clear_cart() {
        println!("Cart cleared");
    } else {
        println!("Cart unchanged");
    }
    Ok(())
}

/// Send the cart to checkout.
///
/// The payment link is printed by the terminal UI.
///
/// # Errors
///
/// Returns `CliError::CheckoutFailed` if the checkout request failed.
pub async fn checkout(page: &Storefront) -> Result<(), CliError> {
    match page.checkout().await {
        CheckoutOutcome::Redirected(_) | CheckoutOutcome::EmptyCart => Ok(()),
        CheckoutOutcome::Failed => Err(CliError::CheckoutFailed),
    }
}
