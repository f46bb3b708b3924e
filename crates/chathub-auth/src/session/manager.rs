//! Session lifecycle manager: login, logout, token verification, liveness.
//!
//! A session is live while its record `session:<authUUID>` exists in the
//! revocation store. Tokens carry their own expiry; the record lets a
//! logout take effect before that expiry.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info};
use uuid::Uuid;

use chathub_cache::keys;
use chathub_core::traits::KeyValueStore;
use chathub_entity::User;

use crate::error::AuthError;
use crate::jwt::{Claims, TokenCodec};

/// A signed token together with the claims it carries.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// The signed token.
    pub token: String,
    /// Claims embedded in the token.
    pub claims: Claims,
    /// When the token stops verifying.
    pub expires_at: DateTime<Utc>,
}

/// Issues and revokes session tokens.
#[derive(Clone)]
pub struct SessionManager {
    codec: Arc<dyn TokenCodec>,
    store: Arc<dyn KeyValueStore>,
    secret: String,
    ttl: Duration,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("codec", &self.codec)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    /// Creates a session manager signing with `secret` and issuing tokens valid for `ttl`.
    pub fn new(
        codec: Arc<dyn TokenCodec>,
        store: Arc<dyn KeyValueStore>,
        secret: impl Into<String>,
        ttl: Duration,
    ) -> Self {
        Self {
            codec,
            store,
            secret: secret.into(),
            ttl,
        }
    }

    /// Starts a new session for `user`.
    ///
    /// The token is signed first and the liveness record written second. If
    /// the record cannot be written the token is discarded and the store
    /// error returned.
    pub async fn login(&self, user: &User) -> Result<IssuedToken, AuthError> {
        let session_id = Uuid::new_v4();
        let now = Utc::now();
        let ttl = chrono::Duration::from_std(self.ttl)
            .map_err(|e| AuthError::Signing(format!("session ttl out of range: {e}")))?;
        let expires_at = now + ttl;

        let claims = Claims::for_session(user, session_id, now, expires_at);
        let token = self.codec.create(&claims, &self.secret)?;

        if let Err(e) = self
            .store
            .set(&keys::session(session_id), &user.id.to_string())
            .await
        {
            error!(
                user_id = %user.id,
                session_id = %session_id,
                error = %e,
                "Failed to record session; discarding issued token"
            );
            return Err(AuthError::Store(e));
        }

        info!(user_id = %user.id, session_id = %session_id, "Session started");
        Ok(IssuedToken {
            token,
            claims,
            expires_at,
        })
    }

    /// Ends a session. Ending an unknown or already-ended session succeeds.
    pub async fn logout(&self, session_id: Uuid) -> Result<(), AuthError> {
        let removed = self
            .store
            .delete(&[&keys::session(session_id)])
            .await
            .map_err(AuthError::Store)?;
        info!(session_id = %session_id, removed, "Session ended");
        Ok(())
    }

    /// Parses and verifies the bearer token in an `Authorization` header.
    ///
    /// Does not consult the revocation store; see [`SessionManager::is_live`].
    pub fn verify(&self, authorization_header: Option<&str>) -> Result<Claims, AuthError> {
        let token = extract_token(authorization_header);
        self.codec.parse(token, &self.secret)
    }

    /// Whether the session still has a liveness record.
    pub async fn is_live(&self, session_id: Uuid) -> Result<bool, AuthError> {
        let live = self
            .store
            .exists(&keys::session(session_id))
            .await
            .map_err(AuthError::Store)?;
        debug!(session_id = %session_id, live, "Checked session liveness");
        Ok(live)
    }
}

/// Token part of `"<scheme> <token>"`; empty unless the header splits into
/// exactly two parts on a single space.
pub fn extract_token(authorization_header: Option<&str>) -> &str {
    let Some(header) = authorization_header else {
        return "";
    };
    let mut parts = header.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(token), None) => token,
        _ => "",
    }
}
