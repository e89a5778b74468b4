//! Integration tests for the Little Oat storefront.
//!
//! Every test runs the real HTTP clients against a `wiremock` server standing
//! in for the shop backend or GitHub, so no network access is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p little-oat-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `catalog` - product loading and the maintenance fallback
//! - `checkout_flow` - cart hand-off, busy state, failure handling
//! - `persistence` - carts surviving restarts through a storage file
//! - `widgets` - analytics page views and release download badges

use std::sync::Arc;

use little_oat_core::Product;
use little_oat_storefront::{HeadlessUi, KeyValueStore, MemoryStore, Storefront, StorefrontConfig};
use serde_json::{Value, json};
use wiremock::MockServer;

/// A storefront wired to a mock backend.
pub struct TestContext {
    pub server: MockServer,
    pub page: Storefront,
    pub ui: Arc<HeadlessUi>,
    pub storage: Arc<MemoryStore>,
}

impl TestContext {
    /// Start a mock backend and a storefront pointed at it.
    ///
    /// # Panics
    ///
    /// Panics if the storefront cannot be built.
    pub async fn new() -> Self {
        Self::with_storage(Arc::new(MemoryStore::new())).await
    }

    /// Like [`TestContext::new`], with pre-seeded storage.
    ///
    /// # Panics
    ///
    /// Panics if the storefront cannot be built.
    pub async fn with_storage(storage: Arc<MemoryStore>) -> Self {
        let server = MockServer::start().await;
        let ui = Arc::new(HeadlessUi::new());
        let page = storefront_for(&server.uri(), storage.clone(), ui.clone());
        Self {
            server,
            page,
            ui,
            storage,
        }
    }
}

/// Build a storefront with every endpoint on `base_url`.
///
/// # Panics
///
/// Panics if `base_url` is not a valid URL or the HTTP client cannot be built.
#[must_use]
pub fn storefront_for(
    base_url: &str,
    storage: Arc<dyn KeyValueStore>,
    ui: Arc<HeadlessUi>,
) -> Storefront {
    let config = StorefrontConfig::with_base_url(base_url).expect("valid mock server URL");
    Storefront::new(config, storage, ui).expect("Failed to build storefront")
}

/// A catalog record the way the backend sends it.
#[must_use]
pub fn product_json(id: &str, title: &str, price: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": format!("{title} for little learners."),
        "price": price,
        "image": format!("https://cdn.example.com/{id}.png"),
        "category": "Printable",
        "features": ["PDF download", "Ages 4-7"]
    })
}

/// Decoded form of [`product_json`].
///
/// # Panics
///
/// Never, for the fixed record shape above.
#[must_use]
pub fn product(id: &str, title: &str, price: &str) -> Product {
    serde_json::from_value(product_json(id, title, price)).expect("fixture product decodes")
}
