//! Checkout endpoint client.
//!
//! The cart is posted as `{"items": [...]}` to `{base}/api/checkout`. The
//! backend bundles the items into a hosted checkout and replies with
//! `{"checkout_url": "...", "total": 53.0, "item_count": 2}`. Payment itself
//! happens on the hosted page; this client only obtains the redirect.

mod initiator;

pub use initiator::{CHECKOUT_FAILED_ALERT, CheckoutOutcome, EMPTY_CART_ALERT, run_checkout};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument};
use url::Url;

use little_oat_core::CartLineItem;

/// Errors that can occur when creating a checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Response body was not the expected JSON.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Response had no usable `checkout_url`.
    #[error("Checkout response did not include a redirect URL")]
    MissingRedirect,
}

/// Outcome of a successful checkout request.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutSession {
    /// Hosted payment page to open.
    pub checkout_url: String,
    /// Total charged, as computed by the backend.
    pub total: Option<f64>,
    pub item_count: Option<usize>,
}

#[derive(Serialize)]
struct CheckoutRequest<'a> {
    items: &'a [CartLineItem],
}

#[derive(Deserialize)]
struct CheckoutResponse {
    #[serde(default)]
    checkout_url: Option<String>,
    #[serde(default)]
    total: Option<f64>,
    #[serde(default)]
    item_count: Option<usize>,
}

/// Client for the checkout endpoint.
#[derive(Debug, Clone)]
pub struct CheckoutClient {
    client: reqwest::Client,
    endpoint: String,
}

impl CheckoutClient {
    /// Create a client for `{base_url}/api/checkout`.
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: &Url) -> Self {
        Self {
            client,
            endpoint: format!("{}/api/checkout", base_url.as_str().trim_end_matches('/')),
        }
    }

    /// The full checkout URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Post the cart and return the hosted checkout redirect.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails, the status is not 2xx, the body is
    /// not JSON, or `checkout_url` is missing or empty.
    #[instrument(skip(self, items), fields(item_count = items.len()))]
    pub async fn create_checkout(
        &self,
        items: &[CartLineItem],
    ) -> Result<CheckoutSession, CheckoutError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&CheckoutRequest { items })
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CheckoutError::Api {
                status: status.as_u16(),
                message: message.chars().take(200).collect(),
            });
        }

        let body = response.text().await?;
        let parsed: CheckoutResponse = serde_json::from_str(&body)?;

        let checkout_url = parsed
            .checkout_url
            .filter(|url| !url.trim().is_empty())
            .ok_or(CheckoutError::MissingRedirect)?;

        info!(total = ?parsed.total, "Checkout created");

        Ok(CheckoutSession {
            checkout_url,
            total: parsed.total,
            item_count: parsed.item_count,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use little_oat_core::Product;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_request_body_shape() {
        let items = vec![CartLineItem::from_product(&Product::new(
            "test-1",
            "Test Product",
            "$29.00",
        ))];
        let body = serde_json::to_value(CheckoutRequest { items: &items }).unwrap();
        assert_eq!(
            body,
            json!({
                "items": [{
                    "id": "test-1",
                    "title": "Test Product",
                    "price": "$29.00",
                    "priceValue": 29.0,
                    "image": null
                }]
            })
        );
    }

    #[test]
    fn test_endpoint() {
        let base = Url::parse("https://api.example.com").unwrap();
        let client = CheckoutClient::new(reqwest::Client::new(), &base);
        assert_eq!(client.endpoint(), "https://api.example.com/api/checkout");
    }

    #[test]
    fn test_missing_redirect_display() {
        assert_eq!(
            CheckoutError::MissingRedirect.to_string(),
            "Checkout response did not include a redirect URL"
        );
    }
}
