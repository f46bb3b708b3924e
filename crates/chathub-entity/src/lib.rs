//! # chathub-entity
//!
//! Domain entity models for ChatHub. Every entity that can be the target of
//! an access check implements [`chathub_core::traits::Resource`].

pub mod conversation;
pub mod message;
pub mod resource;
pub mod user;

pub use conversation::Conversation;
pub use message::Message;
pub use user::{User, UserRole};
