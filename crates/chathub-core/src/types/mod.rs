//! Shared value types.

pub mod field;
pub mod pagination;

pub use field::FieldValue;
pub use pagination::{PageRequest, PageResponse};
