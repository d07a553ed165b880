//! In-memory storage - used for tests and as the fallback when the configured backend fails.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use pokshin_core::StoreError;
use pokshin_core::ports::KeyValueStore;

/// Key-value storage in a HashMap behind an async RwLock.
///
/// Note: Data is lost on process restart.
pub struct InMemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get() {
        let store = InMemoryStore::new();
        store.set("key1", "value1").await.unwrap();
        assert_eq!(store.get("key1").await, Some("value1".to_string()));
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let store = InMemoryStore::new();
        store.set("key1", "old").await.unwrap();
        store.set("key1", "new").await.unwrap();
        assert_eq!(store.get("key1").await.as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn test_remove() {
        let store = InMemoryStore::new();
        store.set("key1", "value1").await.unwrap();
        store.remove("key1").await.unwrap();
        store.remove("missing").await.unwrap();
        assert_eq!(store.get("key1").await, None);
    }
}
