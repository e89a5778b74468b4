//! The storefront page.
//!
//! [`Storefront`] wires the components together for one page view: it owns the
//! cart, the HTTP clients and the products currently on screen, and exposes
//! the handlers a host calls in response to shopper input.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};

use little_oat_core::{Product, ProductId};

use crate::analytics::AnalyticsTracker;
use crate::cart::{AddOutcome, CartStore};
use crate::catalog::CatalogClient;
use crate::checkout::{CheckoutClient, CheckoutOutcome, run_checkout};
use crate::config::StorefrontConfig;
use crate::error::{Result, StorefrontError, add_breadcrumb};
use crate::releases::{DownloadBadges, ReleasesClient};
use crate::render::{
    ADDED_LABEL, ALREADY_IN_CART_LABEL, CardAction, CardMode, DescriptionToggle, ProductCard,
    ProductGrid,
};
use crate::storage::KeyValueStore;
use crate::ui::Ui;

/// Delay before the cart panel opens after an add-to-cart click.
pub const CART_OPEN_DELAY: Duration = Duration::from_millis(300);

/// How long add-to-cart feedback stays on the button.
pub const FEEDBACK_DURATION: Duration = Duration::from_secs(2);

const USER_AGENT: &str = concat!("little-oat-storefront/", env!("CARGO_PKG_VERSION"));

/// One page view of the shop.
///
/// Cheap to clone; all clones share state.
#[derive(Clone)]
pub struct Storefront {
    inner: Arc<StorefrontInner>,
}

struct StorefrontInner {
    config: StorefrontConfig,
    ui: Arc<dyn Ui>,
    cart: Mutex<CartStore>,
    catalog: CatalogClient,
    checkout: CheckoutClient,
    analytics: Option<AnalyticsTracker>,
    releases: Option<ReleasesClient>,
    products: Mutex<Vec<Product>>,
    descriptions: Mutex<HashMap<ProductId, DescriptionToggle>>,
}

impl std::fmt::Debug for Storefront {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storefront")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl Storefront {
    /// Build the page and hydrate the cart from storage.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::HttpClient` if the HTTP client cannot be
    /// built (for example, no TLS backend is available).
    pub fn new(
        config: StorefrontConfig,
        storage: Arc<dyn KeyValueStore>,
        ui: Arc<dyn Ui>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()?;

        let catalog = CatalogClient::new(client.clone(), &config.catalog_base_url);
        let checkout = CheckoutClient::new(client.clone(), &config.checkout_base_url);
        let analytics = config
            .analytics_base_url
            .as_ref()
            .map(|url| AnalyticsTracker::new(client.clone(), url, Arc::clone(&storage)));
        let releases = config
            .github
            .as_ref()
            .map(|github| ReleasesClient::new(client.clone(), github));

        let cart = CartStore::load(storage, Arc::clone(&ui));

        Ok(Self {
            inner: Arc::new(StorefrontInner {
                config,
                ui,
                cart: Mutex::new(cart),
                catalog,
                checkout,
                analytics,
                releases,
                products: Mutex::new(Vec::new()),
                descriptions: Mutex::new(HashMap::new()),
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn card_mode(&self) -> CardMode {
        self.inner.config.card_mode
    }

    /// Run `f` with exclusive access to the cart.
    pub fn with_cart<T>(&self, f: impl FnOnce(&mut CartStore) -> T) -> T {
        f(&mut self.cart())
    }

    fn cart(&self) -> MutexGuard<'_, CartStore> {
        self.inner.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Show the loading state, fetch the catalog, then show the products or
    /// the maintenance message.
    #[instrument(skip(self))]
    pub async fn load_products(&self) -> ProductGrid {
        self.render_grid(&ProductGrid::Loading);

        let products = self
            .inner
            .catalog
            .fetch_products()
            .await
            .map(crate::catalog::CatalogResponse::into_products)
            .unwrap_or_default();

        info!(count = products.len(), "Products loaded");
        self.show_products(products)
    }

    /// Render a product list and remember it for click handlers.
    ///
    /// An empty list shows the maintenance message.
    pub fn show_products(&self, products: Vec<Product>) -> ProductGrid {
        let grid = ProductGrid::from_products(&products, self.card_mode());
        self.render_grid(&grid);
        *self
            .inner
            .products
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = products;
        self.inner
            .descriptions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        grid
    }

    /// A product currently on the page.
    #[must_use]
    pub fn product(&self, id: &ProductId) -> Option<Product> {
        self.inner
            .products
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|p| &p.id == id)
            .cloned()
    }

    fn render_grid(&self, grid: &ProductGrid) {
        match grid.to_html() {
            Ok(html) => self.inner.ui.render_product_grid(&html),
            Err(e) => StorefrontError::from(e).report(),
        }
    }

    // =========================================================================
    // Card Interactions
    // =========================================================================

    /// Add-to-cart button clicked.
    ///
    /// Shows "Added!" or "Already in Cart" on the button, opens the cart
    /// panel after [`CART_OPEN_DELAY`], and restores the label after
    /// [`FEEDBACK_DURATION`]. The delayed steps run on a spawned task whose
    /// handle is returned with the outcome.
    ///
    /// Returns `None` when cards are in buy-now mode or the product is not on
    /// the page.
    pub fn add_to_cart_clicked(&self, id: &ProductId) -> Option<(AddOutcome, JoinHandle<()>)> {
        if self.card_mode() != CardMode::Cart {
            warn!(product_id = %id, "Add to cart clicked in buy-now mode");
            return None;
        }
        let Some(product) = self.product(id) else {
            warn!(product_id = %id, "Add to cart clicked for unknown product");
            return None;
        };

        let outcome = self.cart().add(&product);
        let label = if outcome.is_added() {
            ADDED_LABEL
        } else {
            ALREADY_IN_CART_LABEL
        };
        add_breadcrumb("cart", label, Some(&[("product_id", id.as_str())]));

        let ui = Arc::clone(&self.inner.ui);
        ui.set_card_feedback(id, Some(label));

        let id = id.clone();
        let feedback = tokio::spawn(async move {
            tokio::time::sleep(CART_OPEN_DELAY).await;
            ui.set_cart_open(true);
            tokio::time::sleep(FEEDBACK_DURATION.saturating_sub(CART_OPEN_DELAY)).await;
            ui.set_card_feedback(&id, None);
        });

        Some((outcome, feedback))
    }

    /// Buy-now link clicked: open the product's checkout link.
    ///
    /// Returns the opened URL, or `None` in cart mode, for unknown products,
    /// and for products without a link.
    pub fn buy_now_clicked(&self, id: &ProductId) -> Option<String> {
        let product = self.product(id)?;
        let card = ProductCard::from_product(&product, self.card_mode());
        let href = match card.action {
            CardAction::BuyNow { href } if href != "#" => href,
            CardAction::BuyNow { .. } => {
                warn!(product_id = %id, "Product has no buy link");
                return None;
            }
            CardAction::AddToCart => return None,
        };

        add_breadcrumb("checkout", "Buy now", Some(&[("product_id", id.as_str())]));
        self.inner.ui.open_in_new_context(&href);
        Some(href)
    }

    /// "Show more" / "Show less" clicked on a card description.
    ///
    /// Returns the new state, or `None` if the description is not collapsible.
    pub fn toggle_description(&self, id: &ProductId) -> Option<DescriptionToggle> {
        let product = self.product(id)?;
        if !ProductCard::from_product(&product, self.card_mode()).collapsible {
            return None;
        }

        let mut descriptions = self
            .inner
            .descriptions
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let state = descriptions
            .entry(id.clone())
            .or_insert(DescriptionToggle::Collapsed);
        *state = state.toggled();
        let state = *state;
        drop(descriptions);

        self.inner
            .ui
            .set_description_expanded(id, state.is_expanded(), state.label());
        Some(state)
    }

    // =========================================================================
    // Cart Panel
    // =========================================================================

    /// Remove button clicked in the cart panel.
    pub fn remove_from_cart(&self, id: &ProductId) {
        self.cart().remove(id);
    }

    /// Clear button clicked. Returns whether the cart was emptied.
    pub fn clear_cart(&self) -> bool {
        self.cart().clear()
    }

    /// Checkout button clicked.
    pub async fn checkout(&self) -> CheckoutOutcome {
        run_checkout(&self.inner.cart, &self.inner.checkout, &self.inner.ui).await
    }

    // =========================================================================
    // Supplementary Widgets
    // =========================================================================

    /// Record a page view; `None` when analytics is not configured.
    pub fn track_page_view(&self, page: &str) -> Option<JoinHandle<()>> {
        self.inner
            .analytics
            .as_ref()
            .map(|tracker| tracker.track_page_view(page))
    }

    /// Desktop download counts; `None` when not configured or unavailable.
    pub async fn download_badges(&self) -> Option<DownloadBadges> {
        self.inner.releases.as_ref()?.download_badges().await
    }
}
