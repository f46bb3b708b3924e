//! Component errors for token handling, policy loading, and access evaluation.
//!
//! These stay typed inside the crate and are converted to [`AppError`]
//! once, at the point where they leave it.

use thiserror::Error;

use chathub_core::error::{AppError, ErrorKind};

/// Failures of the token codec, the credential hasher, and the session manager.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Claims were rejected before signing, or the signer failed.
    #[error("failed to sign token: {0}")]
    Signing(String),
    /// The token could not be decoded or verified.
    #[error("malformed token: {0}")]
    MalformedToken(String),
    /// The token verified but its `exp` has passed.
    #[error("token has expired")]
    ExpiredToken,
    /// The hashing algorithm failed or a stored digest is unparsable.
    #[error("password hashing failed: {0}")]
    Hashing(String),
    /// The secret does not match the stored digest.
    #[error("password does not match")]
    PasswordMismatch,
    /// The revocation store failed.
    #[error("revocation store error: {0}")]
    Store(#[source] AppError),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::ExpiredToken => AppError::token_expired("Token has expired"),
            AuthError::MalformedToken(ref reason) => {
                AppError::authorization(format!("Invalid token: {reason}"))
            }
            AuthError::PasswordMismatch => AppError::login_credentials_incorrect(),
            AuthError::Store(inner) => {
                AppError::with_source(ErrorKind::Internal, "Revocation store unavailable", inner)
            }
            other @ (AuthError::Signing(_) | AuthError::Hashing(_)) => {
                let message = other.to_string();
                AppError::with_source(ErrorKind::Internal, message, other)
            }
        }
    }
}

/// Configuration errors found while loading an access policy.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    /// A role names a parent that is not defined.
    #[error("role '{role}' inherits from unknown role '{parent}'")]
    UnknownParent {
        /// The inheriting role.
        role: String,
        /// The missing parent.
        parent: String,
    },
    /// The inheritance graph contains a cycle through `role`.
    #[error("role inheritance cycle detected at '{role}'")]
    Cycle {
        /// A role on the cycle.
        role: String,
    },
    /// A permission references a preset that is not defined.
    #[error("role '{role}' grants {resource} with unknown preset '{preset}'")]
    UnknownPreset {
        /// The granting role.
        role: String,
        /// The resource of the grant.
        resource: String,
        /// The missing preset.
        preset: String,
    },
    /// A permission has an empty action.
    #[error("role '{role}' grants {resource} with an empty action")]
    EmptyAction {
        /// The granting role.
        role: String,
        /// The resource of the grant.
        resource: String,
    },
    /// The policy file could not be read or parsed.
    #[error("failed to load policy: {0}")]
    Load(String),
}

impl From<PolicyError> for AppError {
    fn from(err: PolicyError) -> Self {
        AppError::configuration(err.to_string())
    }
}

/// Errors raised while evaluating an access decision.
///
/// Both indicate a mismatch between the policy and the code calling it,
/// and are reported as internal errors rather than as denials.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// The role is not defined in the policy.
    #[error("unknown role '{0}'")]
    UnknownRole(String),
    /// A condition names a field the subject or resource does not have.
    #[error("{side} has no field '{field}'")]
    MissingField {
        /// `"resource"` or `"subject"`.
        side: &'static str,
        /// The missing field name.
        field: String,
    },
}

impl From<AccessError> for AppError {
    fn from(err: AccessError) -> Self {
        let message = format!("Access evaluation failed: {err}");
        AppError::with_source(ErrorKind::Internal, message, err)
    }
}
