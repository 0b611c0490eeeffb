//! Storage - the local key-value store the tracker mirrors its state into.
//!
//! Values are JSON documents stored under string keys, the way a browser's
//! `localStorage` holds them. Adapters decide where the bytes live.
//!
//! ## Example
//!
//! ```ignore
//! use tech_tracker::{FileKeyValueStore, KeyValueStore};
//!
//! let storage = FileKeyValueStore::open("./data")?;
//! storage.set("appSettings", r#"{"theme":"dark"}"#)?;
//! assert!(storage.get("appSettings")?.is_some());
//! ```

mod file;
mod in_memory;

use thiserror::Error;

pub use file::FileKeyValueStore;
pub use in_memory::InMemoryKeyValueStore;

/// Primary key of the technology collection.
pub const TECHNOLOGIES_KEY: &str = "technologies";

/// Keys older tracker variants stored the collection under.
pub const LEGACY_TECHNOLOGY_KEYS: [&str; 3] = [
    "techTrackerData",
    "technology-tracker-progress",
    "technology_tracker_data",
];

/// Key of the flat settings object.
pub const SETTINGS_KEY: &str = "appSettings";

/// Error type for key-value adapters.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage lock poisoned during {0}")]
    LockPoisoned(&'static str),
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// String-keyed storage of serialized documents.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`. Returns None if absent.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write (or overwrite) the value under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Returns true if it existed.
    fn remove(&self, key: &str) -> Result<bool, StorageError>;

    /// Remove every key.
    fn clear(&self) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<bool, StorageError> {
        (**self).remove(key)
    }

    fn clear(&self) -> Result<(), StorageError> {
        (**self).clear()
    }
}
