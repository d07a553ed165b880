use async_trait::async_trait;

use crate::error::StoreError;

/// Durable string-valued key-value storage (local file, Redis, in-memory).
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Get the value stored under a key.
    async fn get(&self, key: &str) -> Option<String>;

    /// Store a value, replacing any previous one.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove a key. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}
