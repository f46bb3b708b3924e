//! User management.

pub mod service;

pub use service::{CreateUserCommand, UpdateUserCommand, UserService, create_account};
