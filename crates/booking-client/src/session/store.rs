//! Session store abstraction and implementations
//!
//! The session layer persists exactly two string entries (token and
//! user JSON). The trait mirrors that shape: multi-key get/set/remove
//! over flat string keys, with the multi-key forms doing the work in
//! one call so hydration is a single read.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use storage::kv::{KvConfig, KvError, KvStore};
use thiserror::Error;

/// Session store error types
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying key-value store failure
    #[error("Storage backend error: {0}")]
    Backend(#[from] KvError),

    /// The store cannot be used right now
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Persistent multi-key storage for session entries
///
/// Implementations must treat each key independently; a missing key is
/// `None`, not an error.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Get one value
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Get several values in one call, positionally matching `keys`
    async fn get_many(&self, keys: &[&str]) -> Result<Vec<Option<String>>>;

    /// Set one value
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Set several values in one call
    async fn set_many(&self, entries: &[(&str, &str)]) -> Result<()>;

    /// Remove several keys in one call; missing keys are not an error
    async fn remove_many(&self, keys: &[&str]) -> Result<()>;
}

/// Sled-backed session store
///
/// Wraps [`storage::kv::KvStore`] with string values so sessions
/// survive process restarts.
pub struct KvSessionStore {
    kv: KvStore,
}

impl KvSessionStore {
    /// Open a store at the given path
    pub fn open(path: impl Into<String>) -> Result<Self> {
        let kv = KvStore::new(KvConfig::new(path))?;
        Ok(Self { kv })
    }

    /// Create a store with a custom key-value configuration
    pub fn with_config(config: KvConfig) -> Result<Self> {
        let kv = KvStore::new(config)?;
        Ok(Self { kv })
    }

    /// Create an in-memory store (for testing)
    pub fn in_memory() -> Result<Self> {
        let kv = KvStore::in_memory()?;
        Ok(Self { kv })
    }

    /// Flush pending writes to disk
    pub fn flush(&self) -> Result<()> {
        self.kv.flush()?;
        Ok(())
    }
}

#[async_trait]
impl SessionStore for KvSessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.kv.get(key)?)
    }

    async fn get_many(&self, keys: &[&str]) -> Result<Vec<Option<String>>> {
        let mut values = Vec::with_capacity(keys.len());
        for key in keys {
            values.push(self.kv.get(key)?);
        }
        Ok(values)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.kv.set(key, &value)?;
        Ok(())
    }

    async fn set_many(&self, entries: &[(&str, &str)]) -> Result<()> {
        for (key, value) in entries {
            self.kv.set(key, value)?;
        }
        Ok(())
    }

    async fn remove_many(&self, keys: &[&str]) -> Result<()> {
        self.kv.remove_many(keys)?;
        Ok(())
    }
}

/// In-memory session store
///
/// Backs tests and any embedding that does not want persistence.
#[derive(Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently held
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Whether the store holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn get_many(&self, keys: &[&str]) -> Result<Vec<Option<String>>> {
        let entries = self.entries.lock().unwrap();
        Ok(keys.iter().map(|key| entries.get(*key).cloned()).collect())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn set_many(&self, entries: &[(&str, &str)]) -> Result<()> {
        let mut map = self.entries.lock().unwrap();
        for (key, value) in entries {
            map.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }

    async fn remove_many(&self, keys: &[&str]) -> Result<()> {
        let mut map = self.entries.lock().unwrap();
        for key in keys {
            map.remove(*key);
        }
        Ok(())
    }
}
