//! User repository implementations.

pub mod memory;
pub mod user;

pub use memory::MemoryUserRepository;
pub use user::PgUserRepository;

use chathub_core::error::AppError;

/// Columns `find_by_field` may look up users by.
pub const USER_LOOKUP_FIELDS: &[&str] = &["id", "email"];

pub(crate) fn unknown_field(field: &str) -> AppError {
    AppError::internal(format!(
        "Users cannot be looked up by '{field}'. Supported: {}",
        USER_LOOKUP_FIELDS.join(", ")
    ))
}

pub(crate) fn duplicate_email() -> AppError {
    AppError::bad_request("User already exists.")
}
