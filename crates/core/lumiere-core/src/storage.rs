//! Durable keyed storage seam
//!
//! The stores persist through this trait; the SQLite backend lives in
//! `lumiere-storage-sqlite` and an in-memory double is provided here for
//! tests. Writes are last-writer-wins; there is no cross-key transaction.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::Result;

/// Storage key for the serialized selection
pub const KEY_SELECTED_PRODUCTS: &str = "selected-products";
/// Storage key for the explicit reading-direction preference
pub const KEY_RTL_MODE: &str = "rtl-mode";
/// Storage key for the serialized conversation log
pub const KEY_CONVERSATION: &str = "conversation-history";

/// Keyed blob storage persisted across sessions
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// Fetch the value stored under `key`, if any
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    async fn put(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key` and its value; absent keys are not an error
    async fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory storage for tests and throwaway sessions
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a key directly, bypassing the trait (test setup helper)
    pub fn seed(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }
}

#[async_trait]
impl KeyValueStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_get_remove_round_trip() {
        let store = MemoryStorage::new();
        store.put("rtl-mode", "true").await.unwrap();
        assert_eq!(store.get("rtl-mode").await.unwrap().as_deref(), Some("true"));
        store.remove("rtl-mode").await.unwrap();
        assert_eq!(store.get("rtl-mode").await.unwrap(), None);
    }

    #[tokio::test]
    async fn last_writer_wins() {
        let store = MemoryStorage::new();
        store.put("k", "a").await.unwrap();
        store.put("k", "b").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("b"));
    }
}
