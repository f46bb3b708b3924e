//! # chathub-database
//!
//! PostgreSQL connection management, embedded migrations, and the user
//! repositories (PostgreSQL and in-memory).

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use repositories::{MemoryUserRepository, PgUserRepository};
