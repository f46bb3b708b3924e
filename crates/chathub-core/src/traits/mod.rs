//! Capability traits implemented by infrastructure crates.

pub mod access;
pub mod repository;
pub mod store;

pub use access::{Resource, Subject};
pub use repository::Repository;
pub use store::KeyValueStore;
