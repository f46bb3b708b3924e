//! In-process store.

pub mod store;

pub use store::MemoryStore;
