//! Attribute lookup used by access conditions.

use crate::types::field::FieldValue;

/// A protected record that access conditions can inspect.
pub trait Resource: Send + Sync {
    /// Resource name used as the key in role grants (e.g. `"Message"`).
    fn resource_name(&self) -> &'static str;

    /// Look up a named attribute. `None` when the resource has no such field.
    fn field(&self, name: &str) -> Option<FieldValue>;
}

/// The authenticated principal on whose behalf an action is attempted.
pub trait Subject: Send + Sync {
    /// Look up a named attribute. `None` when the subject has no such field.
    fn field(&self, name: &str) -> Option<FieldValue>;
}
