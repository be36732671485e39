//! Persistent key-value state.
//!
//! Profiles are kept in a host-style key-value store: each key holds one TOML value that is
//! always read and written whole. [`FileStore`] backs the CLI; [`MemoryStore`] is used in tests
//! and by embedders that provide their own persistence.

use std::{fmt::Debug, sync::Arc};

use derive_more::Deref;
use parking_lot::RwLock;
use thiserror::Error;

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed state file: {0}")]
    Decode(#[from] toml::de::Error),
    #[error("Failed to encode state: {0}")]
    Encode(#[from] toml::ser::Error),
    #[error("Value under key '{key}' has an unexpected shape: {reason}")]
    Shape { key: String, reason: String },
}

/// A store of named values, each read and replaced as a whole.
pub trait KeyValueStore: Debug + Send + Sync {
    fn get(&self, key: &str) -> StoreResult<Option<toml::Value>>;

    /// Replace the value under `key`. The write is atomic with respect to other readers.
    fn update(&mut self, key: &str, value: toml::Value) -> StoreResult<()>;

    /// Register keys whose values should follow the user across devices.
    fn set_keys_for_sync(&mut self, keys: &[&str]) -> StoreResult<()>;

    fn keys_for_sync(&self) -> StoreResult<Vec<String>>;
}

/// Shared handle to the active [`KeyValueStore`].
#[derive(Debug, Clone, Deref)]
pub struct Store {
    #[deref]
    inner: Arc<RwLock<dyn KeyValueStore>>,
}

impl Store {
    pub fn new<S: KeyValueStore + 'static>(store: S) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    /// Create a memory backed store for use in tests
    #[cfg(test)]
    pub(crate) fn in_memory() -> Self {
        Self::new(MemoryStore::default())
    }
}
