//! # chathub-cache
//!
//! Key-value store backends for ChatHub's session revocation store:
//!
//! - **memory**: in-process map using [dashmap](https://crates.io/crates/dashmap)
//! - **redis**: Redis-backed store using the [redis](https://crates.io/crates/redis) crate
//!
//! The backend is selected at runtime from configuration and wrapped in a
//! [`CacheManager`] that bounds every call with a timeout.

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use provider::CacheManager;
