//! Request gate: authenticate the bearer token, confirm the session is live,
//! and check access rules before a handler runs.
//!
//! This type knows nothing about HTTP frameworks; the API layer feeds it the
//! raw `Authorization` header and renders the [`AppError`] it returns.

use std::sync::Arc;

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use chathub_core::error::AppError;
use chathub_core::result::AppResult;
use chathub_core::traits::Resource;

use crate::context::ContextUser;
use crate::error::AuthError;
use crate::rbac::AccessManager;
use crate::session::SessionManager;

/// A `(resource, action)` pair a route requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessRule {
    /// Resource name.
    pub resource: &'static str,
    /// Action name.
    pub action: &'static str,
}

impl AccessRule {
    /// Creates a rule.
    pub const fn new(resource: &'static str, action: &'static str) -> Self {
        Self { resource, action }
    }
}

/// Authenticates and authorizes requests.
#[derive(Debug, Clone)]
pub struct AuthGuard {
    sessions: Arc<SessionManager>,
    access: Arc<AccessManager>,
}

impl AuthGuard {
    /// Creates a guard over the given session and access managers.
    pub fn new(sessions: Arc<SessionManager>, access: Arc<AccessManager>) -> Self {
        Self { sessions, access }
    }

    /// Establish the caller's identity from an `Authorization` header.
    ///
    /// - missing, malformed, or wrongly signed token: `Authorization`
    /// - expired token or revoked session: `TokenExpired`
    /// - ids in the token that are not UUIDs: `TokenMalformed`
    /// - revocation store failure: `Internal`
    pub async fn check_auth(&self, authorization_header: Option<&str>) -> AppResult<ContextUser> {
        let claims = self
            .sessions
            .verify(authorization_header)
            .map_err(|e| match e {
                AuthError::ExpiredToken => AppError::token_expired("Token has expired"),
                other => {
                    debug!(error = %other, "Rejected bearer token");
                    AppError::authorization("Missing or invalid authorization token")
                }
            })?;

        let id = Uuid::parse_str(&claims.user_id)
            .map_err(|_| AppError::token_malformed("Token carries an invalid user id"))?;
        let auth_uuid = Uuid::parse_str(&claims.auth_uuid)
            .map_err(|_| AppError::token_malformed("Token carries an invalid session id"))?;

        match self.sessions.is_live(auth_uuid).await {
            Ok(true) => {}
            Ok(false) => {
                debug!(user_id = %id, session_id = %auth_uuid, "Token refers to an ended session");
                return Err(AppError::token_expired("Session has ended"));
            }
            Err(e) => {
                error!(session_id = %auth_uuid, error = %e, "Liveness check failed");
                return Err(e.into());
            }
        }

        Ok(ContextUser {
            id,
            auth_uuid,
            email: claims.email,
            role: claims.role,
        })
    }

    /// Check every rule against "any instance" of its resource.
    ///
    /// Rules with an empty resource or action are skipped.
    pub fn authorize(&self, user: &ContextUser, rules: &[AccessRule]) -> AppResult<()> {
        for rule in rules {
            if rule.resource.is_empty() || rule.action.is_empty() {
                warn!(
                    resource = rule.resource,
                    action = rule.action,
                    "Skipping malformed access rule"
                );
                continue;
            }
            self.check(user, rule.resource, rule.action, None)?;
        }
        Ok(())
    }

    /// Check one action against a loaded resource instance.
    pub fn authorize_instance(
        &self,
        user: &ContextUser,
        resource: &str,
        action: &str,
        instance: &dyn Resource,
    ) -> AppResult<()> {
        self.check(user, resource, action, Some(instance))
    }

    /// The session manager behind this guard.
    pub fn sessions(&self) -> &Arc<SessionManager> {
        &self.sessions
    }

    /// The access manager behind this guard.
    pub fn access(&self) -> &Arc<AccessManager> {
        &self.access
    }

    fn check(
        &self,
        user: &ContextUser,
        resource: &str,
        action: &str,
        instance: Option<&dyn Resource>,
    ) -> AppResult<()> {
        match self
            .access
            .is_granted(&user.role, resource, action, instance, user)
        {
            Ok(true) => Ok(()),
            Ok(false) => {
                info!(
                    user_id = %user.id,
                    role = %user.role,
                    resource,
                    action,
                    "Access denied"
                );
                Err(AppError::access_denied(resource, action))
            }
            Err(e) => {
                error!(
                    user_id = %user.id,
                    role = %user.role,
                    resource,
                    action,
                    error = %e,
                    "Access evaluation failed"
                );
                Err(e.into())
            }
        }
    }
}
