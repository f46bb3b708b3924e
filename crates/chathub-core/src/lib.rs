//! # chathub-core
//!
//! Core crate for ChatHub. Contains the capability traits consumed by the
//! authorization layer (key-value store, repository, access subjects and
//! resources), configuration schemas, pagination types, and the unified
//! error system.
//!
//! This crate has **no** internal dependencies on other ChatHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
