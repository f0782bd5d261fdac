//! Local durable key-value storage.
//!
//! The credential and the offline plan snapshot live here. Callers receive a
//! store handle explicitly instead of reaching for process-global state, so
//! tests can swap in [`MemoryStore`].

mod file;
mod memory;

pub use file::{JsonFileStore, default_data_dir};
pub use memory::MemoryStore;

use std::path::PathBuf;

use thiserror::Error;

/// Errors from a [`KeyValueStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access store file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("store file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode store file {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// String-keyed, string-valued durable storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

// Compile-time assertion: usable as `dyn KeyValueStore`.
const _: () = {
    fn _assert_object_safe(_: &dyn KeyValueStore) {}
};
