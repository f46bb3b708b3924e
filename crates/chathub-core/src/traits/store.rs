//! Key-value store trait for the session revocation store.

use async_trait::async_trait;

use crate::result::AppResult;

/// Trait for key-value backends (Redis or in-memory).
///
/// Values are plain strings. Entries written with [`KeyValueStore::set`]
/// never expire on their own; they live until deleted.
#[async_trait]
pub trait KeyValueStore: Send + Sync + std::fmt::Debug + 'static {
    /// Store a value without expiry, overwriting any previous value.
    async fn set(&self, key: &str, value: &str) -> AppResult<()>;

    /// Get a value by key. Returns `None` if the key does not exist.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Check whether a key exists.
    async fn exists(&self, key: &str) -> AppResult<bool>;

    /// Delete keys. Returns the number of keys that were present.
    async fn delete(&self, keys: &[&str]) -> AppResult<u64>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
