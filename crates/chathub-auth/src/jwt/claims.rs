//! JWT claims carried by every session token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use chathub_entity::User;

use crate::error::AuthError;

/// Identity claims embedded in a session token.
///
/// `user_id` and `auth_uuid` are kept as strings on the wire; the request
/// gate parses them and rejects tokens whose ids are not UUIDs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Email of the user at issuance.
    pub email: String,
    /// User id.
    #[serde(rename = "userID")]
    pub user_id: String,
    /// Session id; keys the liveness record.
    #[serde(rename = "authUUID")]
    pub auth_uuid: String,
    /// Role id at issuance.
    pub role: String,
    /// Issued-at timestamp (seconds since epoch). Zero when absent.
    #[serde(default)]
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

impl Claims {
    /// Claims for a new session of `user` issued at `now`.
    pub fn for_session(
        user: &User,
        session_id: Uuid,
        now: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            email: user.email.clone(),
            user_id: user.id.to_string(),
            auth_uuid: session_id.to_string(),
            role: user.role.as_str().to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Check the invariants required before signing.
    pub fn validate(&self) -> Result<(), AuthError> {
        let required = [
            ("email", &self.email),
            ("userID", &self.user_id),
            ("authUUID", &self.auth_uuid),
            ("role", &self.role),
        ];
        if let Some((name, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(AuthError::Signing(format!("claim '{name}' is empty")));
        }
        if self.exp == 0 {
            return Err(AuthError::Signing("claim 'exp' is not set".into()));
        }
        if self.iat != 0 && self.exp <= self.iat {
            return Err(AuthError::Signing("claim 'exp' is not after 'iat'".into()));
        }
        Ok(())
    }

    /// Expiry as a timestamp.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}
