//! # chathub-service
//!
//! Business logic for ChatHub accounts: signup, login, logout, and user
//! management. Services depend only on capability traits, so they run the
//! same against PostgreSQL or the in-memory repository.

pub mod auth;
pub mod hashing;
pub mod user;

pub use auth::{AuthService, LoginOutcome, SignupCommand};
pub use user::{CreateUserCommand, UpdateUserCommand, UserService, create_account};

use std::sync::Arc;

use uuid::Uuid;

use chathub_core::traits::Repository;
use chathub_entity::User;

/// Shared handle to the user store.
pub type UserRepo = Arc<dyn Repository<User, Uuid>>;

#[cfg(test)]
pub(crate) mod testing;
