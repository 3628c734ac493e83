//! Persistent key-value storage for client-side state.
//!
//! The storefront keeps a handful of small JSON documents between runs: the
//! cart, the admin bearer token, the cached admin profile and the search
//! history. They all live behind [`KeyValueStore`], a string-keyed,
//! string-valued store that callers encode JSON into.
//!
//! # Backends
//!
//! - [`FileStore`] - one file per key inside a data directory
//! - [`MemoryStore`] - process-local map, used for tests and throwaway sessions

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Well-known storage keys.
pub mod keys {
    /// Key for the shopper's cart line items.
    pub const CART: &str = "cart";

    /// Key for the admin bearer token.
    pub const AUTH_TOKEN: &str = "jwt_token";

    /// Key for the cached admin profile returned at login.
    pub const ADMIN_USER: &str = "admin_user";

    /// Key for recent catalog search queries.
    pub const SEARCH_HISTORY: &str = "searchHistory";
}

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Value could not be encoded or decoded as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Key contains characters the backend cannot store.
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    /// Backend refused the write (full, read-only, poisoned).
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// A durable string key-value store.
///
/// Implementations must be safe to share between threads; the cart, the
/// credential session and the search history each hold a handle to the
/// same store.
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value for `key`, or `None` if it was never set.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the delete.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Read and decode a JSON value.
///
/// # Errors
///
/// Returns an error if the backend fails or the stored JSON does not decode
/// into `T`.
pub fn get_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match store.get(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Encode and store a JSON value.
///
/// # Errors
///
/// Returns an error if encoding fails or the backend rejects the write.
pub fn set_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}
