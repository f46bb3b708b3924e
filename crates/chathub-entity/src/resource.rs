//! Resource names used as keys in role grants.

/// Resource name for [`crate::User`].
pub const USER: &str = "User";
/// Resource name for [`crate::Conversation`].
pub const CONVERSATION: &str = "Conversation";
/// Resource name for [`crate::Message`].
pub const MESSAGE: &str = "Message";
