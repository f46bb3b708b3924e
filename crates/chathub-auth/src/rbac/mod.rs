//! Hierarchical role-based access control.
//!
//! A [`PolicyDefinition`] is loaded once, validated, and compiled into an
//! [`AccessManager`] that answers "may this role perform this action on this
//! resource" with inheritance and ownership conditions applied.

pub mod condition;
pub mod defaults;
pub mod manager;
pub mod policy;

pub use condition::{Condition, ValueDescriptor};
pub use manager::{AccessManager, GrantSummary};
pub use policy::{Permission, PolicyDefinition, Preset, Role};
