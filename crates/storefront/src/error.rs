//! Unified error handling with Sentry integration.
//!
//! Provides a unified `StorefrontError` type. Nothing in the storefront is
//! fatal to the page: components degrade to an empty or maintenance state and
//! call [`StorefrontError::report`] so the failure is logged and captured.

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::releases::ReleasesError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Local storage operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Catalog request failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Checkout request failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Release statistics request failed.
    #[error("Releases error: {0}")]
    Releases(#[from] ReleasesError),

    /// HTML template rendering failed.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

impl StorefrontError {
    /// Whether this error is worth capturing to Sentry.
    ///
    /// Storage hiccups and the optional releases widget only get logged.
    #[must_use]
    pub const fn is_reportable(&self) -> bool {
        matches!(
            self,
            Self::Catalog(_) | Self::Checkout(_) | Self::Template(_) | Self::HttpClient(_)
        )
    }

    /// Log the error and capture it to Sentry when reportable.
    pub fn report(&self) {
        if self.is_reportable() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Storefront error"
            );
        } else {
            tracing::warn!(error = %self, "Storefront error");
        }
    }

    /// Message safe to show to a shopper.
    ///
    /// Internal details are never exposed.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Checkout(_) => "Checkout failed. Please try again.".to_string(),
            Self::Catalog(_) => {
                "Unable to load products at this time. Please try again later.".to_string()
            }
            Self::Config(err) => err.to_string(),
            _ => "Something went wrong. Please try again.".to_string(),
        }
    }
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;

/// Add a breadcrumb for shopper actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "prod_123")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storefront_error_display() {
        let err = StorefrontError::from(CheckoutError::MissingRedirect);
        assert_eq!(
            err.to_string(),
            "Checkout error: Checkout response did not include a redirect URL"
        );

        let err = StorefrontError::from(ConfigError::InvalidEnvVar(
            "STOREFRONT_CARD_MODE".into(),
            "expected 'cart' or 'buy-now'".into(),
        ));
        assert_eq!(
            err.to_string(),
            "Config error: Invalid environment variable STOREFRONT_CARD_MODE: expected 'cart' or 'buy-now'"
        );
    }

    #[test]
    fn test_user_message_hides_details() {
        let err = StorefrontError::from(CheckoutError::Api {
            status: 500,
            message: "Lemon Squeezy configuration missing".to_string(),
        });
        assert_eq!(err.user_message(), "Checkout failed. Please try again.");
        assert!(!err.user_message().contains("Lemon"));
    }

    #[test]
    fn test_reportable_classification() {
        assert!(StorefrontError::from(CheckoutError::MissingRedirect).is_reportable());
        assert!(
            !StorefrontError::from(StorageError::Io(std::io::Error::other("disk full")))
                .is_reportable()
        );
    }

    #[test]
    fn test_report_without_sentry_client_is_harmless() {
        StorefrontError::from(CheckoutError::MissingRedirect).report();
        add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "p1")]));
    }
}
