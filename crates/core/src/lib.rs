//! Little Oat Core - Shared types library.
//!
//! This crate provides the domain types used by every Little Oat component:
//! - `storefront` - Cart store, catalog client, card rendering, checkout
//! - `cli` - Terminal host for the storefront
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no storage
//! access, no HTTP clients. This keeps it lightweight and allows it to be used
//! anywhere, including in tests that never touch the network.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, display prices, products and cart line items

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
