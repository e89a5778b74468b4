//! Synchronous key-value persistence.
//!
//! The storefront persists exactly two things: the cart line-item sequence and
//! the anonymous visitor id. Both go through [`KeyValueStore`], a narrow
//! string-to-string interface shaped like browser local storage.
//!
//! # Implementations
//!
//! - [`MemoryStore`] - in-process map; counts writes so tests can assert that
//!   an operation did not touch storage
//! - [`FileStore`] - one JSON object on disk, the CLI's stand-in for a browser
//!   profile
//!
//! Access is unsynchronized across processes. Two hosts sharing a
//! `FileStore` path overwrite each other's keys, last write wins.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

/// Storage keys shared by every page of the site.
pub mod keys {
    /// JSON-encoded cart line-item sequence.
    pub const CART: &str = "littleOatCart";

    /// Anonymous visitor identifier used for page-view analytics.
    pub const VISITOR_ID: &str = "littleOatVisitorId";
}

/// Errors that can occur when reading or writing persisted state.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying file I/O failed.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing document is not a JSON object of strings.
    #[error("Corrupt storage document: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// A synchronous string key-value store.
pub trait KeyValueStore: Send + Sync {
    /// Read a value. `Ok(None)` when the key is absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing medium cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing medium cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a key. Deleting an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing medium cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
