//! Cart-to-checkout flow.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::{info, instrument};

use crate::cart::CartStore;
use crate::error::{StorefrontError, add_breadcrumb};
use crate::ui::Ui;

use super::CheckoutClient;

pub const EMPTY_CART_ALERT: &str = "Your cart is empty!";
pub const CHECKOUT_FAILED_ALERT: &str = "Checkout failed. Please try again.";

/// How a checkout attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Nothing to buy; no request was sent.
    EmptyCart,
    /// The hosted checkout was opened and the cart cleared.
    Redirected(String),
    /// The request failed; the cart is untouched.
    Failed,
}

/// Marks the checkout control busy until dropped.
struct BusyGuard {
    ui: Arc<dyn Ui>,
}

impl BusyGuard {
    fn new(ui: Arc<dyn Ui>) -> Self {
        ui.set_checkout_busy(true);
        Self { ui }
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.ui.set_checkout_busy(false);
    }
}

/// Send the cart to checkout and follow the redirect.
///
/// The cart lock is only held to snapshot and to clear, never across the
/// request, so other handlers can run while it is in flight.
#[instrument(skip_all)]
pub async fn run_checkout(
    cart: &Mutex<CartStore>,
    client: &CheckoutClient,
    ui: &Arc<dyn Ui>,
) -> CheckoutOutcome {
    let items = cart
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .items()
        .to_vec();

    if items.is_empty() {
        ui.alert(EMPTY_CART_ALERT);
        return CheckoutOutcome::EmptyCart;
    }

    add_breadcrumb("checkout", "Checkout started", None);
    let _busy = BusyGuard::new(Arc::clone(ui));

    match client.create_checkout(&items).await {
        Ok(session) => {
            info!(item_count = items.len(), "Redirecting to hosted checkout");
            ui.open_in_new_context(&session.checkout_url);
            cart.lock().unwrap_or_else(PoisonError::into_inner).reset();
            ui.set_cart_open(false);
            CheckoutOutcome::Redirected(session.checkout_url)
        }
        Err(e) => {
            StorefrontError::from(e).report();
            ui.alert(CHECKOUT_FAILED_ALERT);
            CheckoutOutcome::Failed
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use little_oat_core::Product;
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::util::SubscriberInitExt;
    use url::Url;

    use super::*;
    use crate::storage::MemoryStore;
    use crate::ui::{HeadlessUi, UiEvent};

    /// Counts ERROR-level events.
    #[derive(Clone, Default)]
    struct ErrorCounter(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for ErrorCounter {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == tracing::Level::ERROR {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    fn cart_with_one_item(ui: &Arc<dyn Ui>) -> Mutex<CartStore> {
        let mut store = CartStore::load(Arc::new(MemoryStore::new()), Arc::clone(ui));
        store.add(&Product::new("p1", "Pack", "$5"));
        Mutex::new(store)
    }

    /// Port 9 (discard) fails any request attempted against it.
    fn unreachable_client() -> CheckoutClient {
        CheckoutClient::new(
            reqwest::Client::new(),
            &Url::parse("http://127.0.0.1:9").unwrap(),
        )
    }

    #[tokio::test]
    async fn test_empty_cart_never_sends_request() {
        let ui = Arc::new(HeadlessUi::new());
        let dyn_ui: Arc<dyn Ui> = ui.clone();
        let cart = Mutex::new(CartStore::load(Arc::new(MemoryStore::new()), dyn_ui.clone()));

        let outcome = run_checkout(&cart, &unreachable_client(), &dyn_ui).await;
        assert_eq!(outcome, CheckoutOutcome::EmptyCart);
        assert_eq!(ui.alerts(), vec![EMPTY_CART_ALERT.to_string()]);
        assert!(!ui.events().contains(&UiEvent::CheckoutBusy(true)));
    }

    #[tokio::test]
    async fn test_transport_failure_preserves_cart_and_restores_control() {
        let ui = Arc::new(HeadlessUi::new());
        let dyn_ui: Arc<dyn Ui> = ui.clone();
        let cart = cart_with_one_item(&dyn_ui);
        let client = unreachable_client();

        let outcome = run_checkout(&cart, &client, &dyn_ui).await;
        assert_eq!(outcome, CheckoutOutcome::Failed);
        assert_eq!(cart.lock().unwrap().len(), 1);
        assert_eq!(ui.alerts(), vec![CHECKOUT_FAILED_ALERT.to_string()]);

        let events = ui.events();
        let busy_on = events
            .iter()
            .position(|e| *e == UiEvent::CheckoutBusy(true))
            .unwrap();
        let busy_off = events
            .iter()
            .position(|e| *e == UiEvent::CheckoutBusy(false))
            .unwrap();
        assert!(busy_on < busy_off);
    }

    #[tokio::test]
    async fn test_failure_logs_a_single_error() {
        let errors = ErrorCounter::default();
        let _subscriber = tracing_subscriber::registry()
            .with(errors.clone())
            .set_default();

        let ui: Arc<dyn Ui> = Arc::new(HeadlessUi::new());
        let cart = cart_with_one_item(&ui);

        let outcome = run_checkout(&cart, &unreachable_client(), &ui).await;
        assert_eq!(outcome, CheckoutOutcome::Failed);
        assert_eq!(errors.0.load(Ordering::SeqCst), 1);
    }
}
