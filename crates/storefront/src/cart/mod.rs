//! Shopping cart persisted in local key-value storage.
//!
//! [`CartStore`] owns the authoritative line-item list. Every mutation writes
//! the list back to storage and re-renders the cart panel through [`Ui`]
//! before returning, so callers never need a separate refresh.
//!
//! # Invariants
//!
//! - No two line items share a product id.
//! - `total()` is always the sum of `price_value` over the current items.

mod panel;

pub use panel::{CartLineView, CartPanel, EMPTY_CART_MESSAGE};

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use little_oat_core::{CartLineItem, Product, ProductId, format_usd};

use crate::storage::{KeyValueStore, keys};
use crate::ui::Ui;

/// Prompt shown before emptying a non-empty cart.
pub const CLEAR_CONFIRMATION: &str = "Are you sure you want to clear your cart?";

/// Result of [`CartStore::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new line item was appended.
    Added,
    /// An item with the same id was already present; nothing changed.
    AlreadyInCart,
}

impl AddOutcome {
    /// `true` when the cart changed.
    #[must_use]
    pub const fn is_added(self) -> bool {
        matches!(self, Self::Added)
    }
}

/// The shopper's cart.
pub struct CartStore {
    items: Vec<CartLineItem>,
    storage: Arc<dyn KeyValueStore>,
    ui: Arc<dyn Ui>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("items", &self.items)
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Hydrate the cart from storage and render it.
    ///
    /// An absent key, an unreadable store, or a document that does not decode
    /// as a line-item list all produce an empty cart.
    #[must_use]
    pub fn load(storage: Arc<dyn KeyValueStore>, ui: Arc<dyn Ui>) -> Self {
        let items = read_items(storage.as_ref());
        let store = Self { items, storage, ui };
        store.render();
        store
    }

    /// Current line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether a product is already in the cart.
    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.items.iter().any(|item| &item.id == id)
    }

    /// Add a product. Adding an id that is already present changes nothing.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn add(&mut self, product: &Product) -> AddOutcome {
        if self.contains(&product.id) {
            debug!("Product already in cart");
            return AddOutcome::AlreadyInCart;
        }

        self.items.push(CartLineItem::from_product(product));
        self.save();
        self.render();
        AddOutcome::Added
    }

    /// Remove a product if present.
    #[instrument(skip(self), fields(product_id = %id))]
    pub fn remove(&mut self, id: &ProductId) {
        self.items.retain(|item| &item.id != id);
        self.save();
        self.render();
    }

    /// Empty the cart after asking the shopper to confirm.
    ///
    /// Returns `true` if the cart was emptied. An already-empty cart returns
    /// `false` without prompting or writing to storage.
    #[instrument(skip(self))]
    pub fn clear(&mut self) -> bool {
        if self.items.is_empty() {
            return false;
        }
        if !self.ui.confirm(CLEAR_CONFIRMATION) {
            debug!("Clear cart declined");
            return false;
        }
        self.reset();
        true
    }

    /// Empty the cart unconditionally (used after a successful checkout).
    pub(crate) fn reset(&mut self) {
        self.items.clear();
        self.save();
        self.render();
    }

    /// Sum of line-item prices.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.items.iter().map(|item| item.price_value).sum()
    }

    /// Total formatted as currency (e.g. `$12.50`).
    #[must_use]
    pub fn formatted_total(&self) -> String {
        format_usd(self.total())
    }

    /// Current panel view-model.
    #[must_use]
    pub fn panel(&self) -> CartPanel {
        CartPanel::from_items(&self.items)
    }

    fn save(&self) {
        let encoded = match serde_json::to_string(&self.items) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!(error = %e, "Failed to encode cart");
                return;
            }
        };
        if let Err(e) = self.storage.set(keys::CART, &encoded) {
            warn!(error = %e, "Failed to persist cart");
        }
    }

    fn render(&self) {
        self.ui.render_cart(&self.panel());
    }
}

fn read_items(storage: &dyn KeyValueStore) -> Vec<CartLineItem> {
    let raw = match storage.get(keys::CART) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(error = %e, "Failed to read saved cart");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<CartLineItem>>(&raw) {
        Ok(mut items) => {
            // Older saves could hold duplicates; keep the first occurrence.
            let mut seen = std::collections::HashSet::new();
            items.retain(|item| seen.insert(item.id.clone()));
            items
        }
        Err(e) => {
            warn!(error = %e, "Saved cart is malformed, starting empty");
            Vec::new()
        }
    }
}
