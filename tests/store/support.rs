//! Fixtures shared by the store tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tech_tracker::{
    import_json, InMemoryKeyValueStore, KeyValueStore, RecordStore, StorageError, StoreConfig,
};

/// A store seeded with `[{id:1, title:"React", status:"not-started"}]`.
pub fn react_store() -> RecordStore<InMemoryKeyValueStore> {
    store_with(r#"[{"id":1,"title":"React","status":"not-started"}]"#)
}

pub fn store_with(seed_json: &str) -> RecordStore<InMemoryKeyValueStore> {
    let seed = import_json(seed_json).unwrap();
    RecordStore::open(
        InMemoryKeyValueStore::new(),
        StoreConfig::default().with_seed(seed),
    )
}

/// Key-value store whose writes can be switched to fail, like a full quota.
#[derive(Clone, Default)]
pub struct FlakyStore {
    inner: InMemoryKeyValueStore,
    failing: Arc<AtomicBool>,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StorageError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("quota exceeded".to_string()));
        }
        Ok(())
    }
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check()?;
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<bool, StorageError> {
        self.check()?;
        self.inner.remove(key)
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.check()?;
        self.inner.clear()
    }
}
