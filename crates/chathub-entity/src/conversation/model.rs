//! Conversation entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use chathub_core::traits::Resource;
use chathub_core::types::FieldValue;

use crate::resource;

/// A conversation between participants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    /// Unique conversation identifier.
    pub id: Uuid,
    /// The user who opened the conversation.
    pub created_by: Uuid,
    /// Participating users, creator included.
    pub participants: Vec<Uuid>,
    /// When the conversation was created.
    pub created_at: DateTime<Utc>,
    /// When the conversation was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Open a conversation owned by `created_by`.
    pub fn new(created_by: Uuid, mut participants: Vec<Uuid>) -> Self {
        if !participants.contains(&created_by) {
            participants.insert(0, created_by);
        }
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_by,
            participants,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Resource for Conversation {
    fn resource_name(&self) -> &'static str {
        resource::CONVERSATION
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(FieldValue::Uuid(self.id)),
            "created_by" => Some(FieldValue::Uuid(self.created_by)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creator_is_always_a_participant() {
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();
        let conv = Conversation::new(owner, vec![other]);
        assert_eq!(conv.participants, vec![owner, other]);
        assert_eq!(conv.field("created_by"), Some(FieldValue::Uuid(owner)));
    }
}
