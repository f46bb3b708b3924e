//! Message entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use chathub_core::traits::Resource;
use chathub_core::types::FieldValue;

use crate::resource;

/// A message posted to a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Unique message identifier.
    pub id: Uuid,
    /// Conversation the message belongs to.
    pub conversation_id: Uuid,
    /// Author.
    pub created_by: Uuid,
    /// Message text.
    pub body: String,
    /// When the message was posted.
    pub created_at: DateTime<Utc>,
    /// When the message was last edited.
    pub updated_at: DateTime<Utc>,
}

impl Message {
    /// Compose a message in `conversation_id` authored by `created_by`.
    pub fn new(conversation_id: Uuid, created_by: Uuid, body: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            conversation_id,
            created_by,
            body: body.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Resource for Message {
    fn resource_name(&self) -> &'static str {
        resource::MESSAGE
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(FieldValue::Uuid(self.id)),
            "conversation_id" => Some(FieldValue::Uuid(self.conversation_id)),
            "created_by" => Some(FieldValue::Uuid(self.created_by)),
            _ => None,
        }
    }
}
