//! In-memory key-value store backed by a concurrent map.
//!
//! Entries never expire and are never evicted; a live session must stay
//! live until it is explicitly deleted.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use chathub_core::result::AppResult;
use chathub_core::traits::KeyValueStore;

/// In-memory store for single-node deployments and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<DashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.entries.contains_key(key))
    }

    async fn delete(&self, keys: &[&str]) -> AppResult<u64> {
        let removed = keys
            .iter()
            .filter(|key| self.entries.remove(**key).is_some())
            .count() as u64;
        debug!(requested = keys.len(), removed, "Deleted keys from memory store");
        Ok(removed)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_exists() {
        let store = MemoryStore::new();
        store.set("session:a", "user-1").await.unwrap();
        assert_eq!(store.get("session:a").await.unwrap().as_deref(), Some("user-1"));
        assert!(store.exists("session:a").await.unwrap());
        assert!(!store.exists("session:b").await.unwrap());
    }

    #[tokio::test]
    async fn delete_counts_only_present_keys() {
        let store = MemoryStore::new();
        store.set("a", "1").await.unwrap();
        store.set("b", "2").await.unwrap();
        assert_eq!(store.delete(&["a", "b", "c"]).await.unwrap(), 2);
        assert_eq!(store.delete(&["a"]).await.unwrap(), 0);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn set_overwrites() {
        let store = MemoryStore::new();
        store.set("k", "1").await.unwrap();
        store.set("k", "2").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("2"));
        assert_eq!(store.len(), 1);
    }
}
