//! Store manager that dispatches to the configured backend.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use chathub_core::config::CacheConfig;
use chathub_core::error::AppError;
use chathub_core::result::AppResult;
use chathub_core::traits::KeyValueStore;

/// Wraps the configured backend and bounds every call with a timeout.
///
/// A backend that stops answering surfaces as an error after
/// `operation_timeout`, never as a hung request.
#[derive(Debug, Clone)]
pub struct CacheManager {
    inner: Arc<dyn KeyValueStore>,
    operation_timeout: Duration,
}

impl CacheManager {
    /// Create a new manager from configuration.
    pub async fn new(config: &CacheConfig) -> AppResult<Self> {
        let inner: Arc<dyn KeyValueStore> = match config.provider.as_str() {
            #[cfg(feature = "redis-backend")]
            "redis" => {
                info!("Initializing Redis revocation store");
                let client = crate::redis::RedisClient::connect(&config.redis).await?;
                Arc::new(crate::redis::RedisStore::new(client))
            }
            #[cfg(feature = "memory")]
            "memory" => {
                info!("Initializing in-memory revocation store");
                Arc::new(crate::memory::MemoryStore::new())
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown cache provider: '{other}'. Supported: memory, redis"
                )));
            }
        };

        Ok(Self {
            inner,
            operation_timeout: Duration::from_millis(config.operation_timeout_ms),
        })
    }

    /// Create a manager around an existing backend (for testing).
    pub fn from_provider(provider: Arc<dyn KeyValueStore>, operation_timeout: Duration) -> Self {
        Self {
            inner: provider,
            operation_timeout,
        }
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        fut: impl Future<Output = AppResult<T>> + Send,
    ) -> AppResult<T> {
        match tokio::time::timeout(self.operation_timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    operation,
                    timeout_ms = self.operation_timeout.as_millis() as u64,
                    "Revocation store call timed out"
                );
                Err(AppError::internal(format!(
                    "Revocation store {operation} timed out"
                )))
            }
        }
    }
}

#[async_trait]
impl KeyValueStore for CacheManager {
    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.bounded("set", self.inner.set(key, value)).await
    }

    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.bounded("get", self.inner.get(key)).await
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        self.bounded("exists", self.inner.exists(key)).await
    }

    async fn delete(&self, keys: &[&str]) -> AppResult<u64> {
        self.bounded("delete", self.inner.delete(keys)).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.bounded("health_check", self.inner.health_check()).await
    }
}
