//! CLI command implementations.

pub mod cart;
pub mod catalog;
pub mod site;

use little_oat_storefront::StorefrontError;
use thiserror::Error;

/// Errors that end a command with a non-zero exit status.
#[derive(Debug, Error)]
pub enum CliError {
    /// The storefront could not be set up or a component failed.
    #[error(transparent)]
    Storefront(#[from] StorefrontError),

    /// Product id not present in the catalog.
    #[error("No product with id '{0}' in the catalog")]
    UnknownProduct(String),

    /// Cards are configured for buy-now links, not a cart.
    #[error("The storefront is in buy-now mode; set STOREFRONT_CARD_MODE=cart to use the cart")]
    CartDisabled,

    /// Checkout did not produce a payment link.
    #[error("Checkout did not complete")]
    CheckoutFailed,

    /// An optional integration is not configured.
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    /// A background task panicked or was cancelled.
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
