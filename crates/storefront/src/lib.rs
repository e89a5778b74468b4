//! Little Oat Learners storefront library.
//!
//! Client-side logic for the shop page: a persisted cart, the remote product
//! catalog, product cards, checkout hand-off, and the page's carousels.
//! Hosts drive a [`Storefront`] and supply a [`Ui`] that puts its output on
//! screen.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod analytics;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod page;
pub mod releases;
pub mod render;
pub mod slider;
pub mod storage;
pub mod ui;

pub use cart::{AddOutcome, CartPanel, CartStore};
pub use checkout::CheckoutOutcome;
pub use config::StorefrontConfig;
pub use error::{Result, StorefrontError};
pub use page::Storefront;
pub use render::{CardMode, ProductCard, ProductGrid};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use ui::{HeadlessUi, Ui, UiEvent};
