//! The page surface the storefront drives.
//!
//! Everything the storefront computes is a plain view-model or an HTML
//! fragment. Applying it to a screen happens behind [`Ui`], which a host
//! implements: the CLI prints to the terminal, tests use [`HeadlessUi`] to
//! record what would have been shown.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use little_oat_core::ProductId;

use crate::cart::CartPanel;

/// Imperative display and interaction hooks.
pub trait Ui: Send + Sync {
    /// Show a blocking notification.
    fn alert(&self, message: &str);

    /// Ask a yes/no question. `true` means the shopper confirmed.
    fn confirm(&self, message: &str) -> bool;

    /// Open a URL in a new browsing context.
    fn open_in_new_context(&self, url: &str);

    /// Replace the cart panel contents, count badges, and total.
    fn render_cart(&self, panel: &CartPanel);

    /// Open or close the cart panel.
    fn set_cart_open(&self, open: bool);

    /// Disable the checkout control and show a busy indicator, or restore it.
    fn set_checkout_busy(&self, busy: bool);

    /// Replace the product grid with an HTML fragment.
    fn render_product_grid(&self, html: &str);

    /// Show transient feedback on a card's action control, or `None` to
    /// restore its normal label.
    fn set_card_feedback(&self, product_id: &ProductId, label: Option<&str>);

    /// Expand or collapse a card description and relabel its toggle.
    fn set_description_expanded(&self, product_id: &ProductId, expanded: bool, toggle_label: &str);
}

/// Something a [`HeadlessUi`] was asked to do.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    Alert(String),
    Confirm(String),
    Open(String),
    RenderCart { count: usize, total: String },
    CartOpen(bool),
    CheckoutBusy(bool),
    ProductGrid(String),
    CardFeedback {
        product_id: ProductId,
        label: Option<String>,
    },
    Description {
        product_id: ProductId,
        expanded: bool,
    },
}

/// A [`Ui`] that records every call instead of displaying anything.
///
/// `confirm` answers with a scripted response (default: yes).
#[derive(Debug)]
pub struct HeadlessUi {
    events: Mutex<Vec<UiEvent>>,
    last_cart: Mutex<Option<CartPanel>>,
    confirm_response: AtomicBool,
}

impl Default for HeadlessUi {
    fn default() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            last_cart: Mutex::new(None),
            confirm_response: AtomicBool::new(true),
        }
    }
}

impl HeadlessUi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set what subsequent `confirm` calls return.
    pub fn set_confirm_response(&self, response: bool) {
        self.confirm_response.store(response, Ordering::SeqCst);
    }

    /// Snapshot of recorded events, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<UiEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drain recorded events.
    pub fn take_events(&self) -> Vec<UiEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Messages passed to `alert`.
    #[must_use]
    pub fn alerts(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                UiEvent::Alert(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    /// Number of `confirm` prompts shown.
    #[must_use]
    pub fn confirm_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, UiEvent::Confirm(_)))
            .count()
    }

    /// URLs passed to `open_in_new_context`.
    #[must_use]
    pub fn opened_urls(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                UiEvent::Open(url) => Some(url),
                _ => None,
            })
            .collect()
    }

    /// The most recently rendered cart panel.
    #[must_use]
    pub fn last_cart(&self) -> Option<CartPanel> {
        self.last_cart
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recently rendered product grid fragment.
    #[must_use]
    pub fn last_product_grid(&self) -> Option<String> {
        self.events().into_iter().rev().find_map(|e| match e {
            UiEvent::ProductGrid(html) => Some(html),
            _ => None,
        })
    }

    fn record(&self, event: UiEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

impl Ui for HeadlessUi {
    fn alert(&self, message: &str) {
        self.record(UiEvent::Alert(message.to_string()));
    }

    fn confirm(&self, message: &str) -> bool {
        self.record(UiEvent::Confirm(message.to_string()));
        self.confirm_response.load(Ordering::SeqCst)
    }

    fn open_in_new_context(&self, url: &str) {
        self.record(UiEvent::Open(url.to_string()));
    }

    fn render_cart(&self, panel: &CartPanel) {
        self.record(UiEvent::RenderCart {
            count: panel.count,
            total: panel.total.clone(),
        });
        *self.last_cart.lock().unwrap_or_else(PoisonError::into_inner) = Some(panel.clone());
    }

    fn set_cart_open(&self, open: bool) {
        self.record(UiEvent::CartOpen(open));
    }

    fn set_checkout_busy(&self, busy: bool) {
        self.record(UiEvent::CheckoutBusy(busy));
    }

    fn render_product_grid(&self, html: &str) {
        self.record(UiEvent::ProductGrid(html.to_string()));
    }

    fn set_card_feedback(&self, product_id: &ProductId, label: Option<&str>) {
        self.record(UiEvent::CardFeedback {
            product_id: product_id.clone(),
            label: label.map(String::from),
        });
    }

    fn set_description_expanded(&self, product_id: &ProductId, expanded: bool, _toggle_label: &str) {
        self.record(UiEvent::Description {
            product_id: product_id.clone(),
            expanded,
        });
    }
}
