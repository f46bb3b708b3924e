//! The authenticated user attached to a request.

use serde::Serialize;
use uuid::Uuid;

use chathub_core::traits::Subject;
use chathub_core::types::FieldValue;

/// Identity established by the request gate for the current request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextUser {
    /// User id.
    pub id: Uuid,
    /// Session id from the token.
    pub auth_uuid: Uuid,
    /// Email from the token.
    pub email: String,
    /// Role id from the token.
    pub role: String,
}

impl Subject for ContextUser {
    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(FieldValue::Uuid(self.id)),
            "email" => Some(FieldValue::Str(self.email.clone())),
            "role" => Some(FieldValue::Str(self.role.clone())),
            _ => None,
        }
    }
}
