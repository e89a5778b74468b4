//! Remote product catalog client.
//!
//! One `GET {base}/api/products` per page load. The backend answers with
//! either a bare product list or `{"products": [...]}`; anything else is kept
//! as-is in [`CatalogResponse::Unrecognized`] and treated as an empty catalog
//! by the page.
//!
//! [`CatalogClient::fetch_products`] never fails: transport errors, non-2xx
//! statuses and undecodable bodies are logged and collapse to `None`.

use serde_json::Value;
use thiserror::Error;
use tracing::{error, instrument, warn};
use url::Url;

use little_oat_core::Product;

/// Errors that can occur when fetching the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Body was not JSON.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A decoded catalog payload.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogResponse {
    /// A bare list or a `products` wrapper.
    Products(Vec<Product>),
    /// Any other JSON shape, returned untouched.
    Unrecognized(Value),
}

impl CatalogResponse {
    /// Interpret a JSON body.
    ///
    /// Records that fail to decode (for example, with no `id`) are skipped
    /// rather than discarding the whole list.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Array(records) => Self::Products(decode_records(records)),
            Value::Object(mut map) => match map.remove("products") {
                Some(Value::Array(records)) => Self::Products(decode_records(records)),
                Some(other) => {
                    map.insert("products".to_string(), other);
                    Self::Unrecognized(Value::Object(map))
                }
                None => Self::Unrecognized(Value::Object(map)),
            },
            other => Self::Unrecognized(other),
        }
    }

    /// Products to display; empty for unrecognized payloads.
    #[must_use]
    pub fn into_products(self) -> Vec<Product> {
        match self {
            Self::Products(products) => products,
            Self::Unrecognized(_) => Vec::new(),
        }
    }
}

fn decode_records(records: Vec<Value>) -> Vec<Product> {
    records
        .into_iter()
        .filter_map(|record| match serde_json::from_value::<Product>(record) {
            Ok(product) => Some(product),
            Err(e) => {
                warn!(error = %e, "Skipping undecodable catalog record");
                None
            }
        })
        .collect()
}

/// Client for the catalog endpoint.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: reqwest::Client,
    endpoint: String,
}

impl CatalogClient {
    /// Create a client for `{base_url}/api/products`.
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: &Url) -> Self {
        Self {
            client,
            endpoint: format!("{}/api/products", base_url.as_str().trim_end_matches('/')),
        }
    }

    /// The full products URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch the catalog, or `None` on any failure.
    pub async fn fetch_products(&self) -> Option<CatalogResponse> {
        match self.try_fetch_products().await {
            Ok(response) => Some(response),
            Err(e) => {
                error!(error = %e, endpoint = %self.endpoint, "Error fetching products");
                None
            }
        }
    }

    /// Fetch the catalog, surfacing the failure reason.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails, the status is not 2xx, or the body
    /// is not JSON.
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    pub async fn try_fetch_products(&self) -> Result<CatalogResponse, CatalogError> {
        let response = self.client.get(&self.endpoint).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message: message.chars().take(200).collect(),
            });
        }

        let body = response.text().await?;
        let value: Value = serde_json::from_str(&body)?;
        Ok(CatalogResponse::from_value(value))
    }
}
