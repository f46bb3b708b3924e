//! Custom Axum extractors.

pub mod auth;
pub mod json;
pub mod pagination;
pub mod path;

pub use auth::{AccessRules, AuthUser, Authorized};
pub use json::ValidJson;
pub use pagination::PaginationParams;
