//! Unified application error types for ChatHub.
//!
//! Component errors (token, policy, store, persistence) are converted into
//! [`AppError`] exactly once, at the boundary where they leave their
//! component. From there on the error travels unchanged through `?` until it
//! is rendered by the HTTP layer.

use std::fmt;

use thiserror::Error;

/// Error taxonomy surfaced to clients.
///
/// Each kind has a fixed HTTP status and machine-readable code; see
/// [`ErrorKind::status_code`] and [`ErrorKind::code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Missing, unparsable, or wrongly signed credentials.
    Authorization,
    /// The token's lifetime has passed or its session was revoked.
    TokenExpired,
    /// The token verified but its identity claims are unusable.
    TokenMalformed,
    /// The caller is authenticated but not permitted.
    AccessDenied,
    /// The requested record does not exist.
    NotFound,
    /// The request is invalid.
    BadRequest,
    /// Login with an unknown email or a wrong password.
    LoginCredentialsIncorrect,
    /// Anything else.
    Internal,
}

impl ErrorKind {
    /// HTTP status associated with this kind.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Authorization | Self::TokenExpired | Self::TokenMalformed => 401,
            Self::AccessDenied => 403,
            Self::NotFound => 404,
            Self::BadRequest | Self::LoginCredentialsIncorrect => 400,
            Self::Internal => 500,
        }
    }

    /// Machine-readable code rendered in the error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Authorization => "AUTHORIZATION_ERROR",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::TokenMalformed => "TOKEN_MALFORMED",
            Self::AccessDenied => "ACCESS_DENIED",
            Self::NotFound => "NOT_FOUND",
            Self::BadRequest => "BAD_REQUEST",
            Self::LoginCredentialsIncorrect => "LOGIN_CREDENTIALS_INCORRECT",
            Self::Internal => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// The unified application error used throughout ChatHub.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional structured details rendered alongside the message.
    pub details: Option<serde_json::Value>,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
            source: Some(Box::new(source)),
        }
    }

    /// Attach structured details.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Create an authorization error.
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authorization, message)
    }

    /// Create a token-expired error.
    pub fn token_expired(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TokenExpired, message)
    }

    /// Create a token-malformed error.
    pub fn token_malformed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TokenMalformed, message)
    }

    /// Create an access-denied error naming the resource and action.
    pub fn access_denied(resource: &str, action: &str) -> Self {
        Self::new(
            ErrorKind::AccessDenied,
            format!("Access denied: cannot {action} {resource}"),
        )
        .with_details(serde_json::json!({
            "resource": resource,
            "action": action,
        }))
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a bad-request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    /// Create the uniform wrong-credentials error.
    pub fn login_credentials_incorrect() -> Self {
        Self::new(
            ErrorKind::LoginCredentialsIncorrect,
            "Email or password is incorrect",
        )
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Create an internal error for a configuration problem.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::Internal,
            format!("Configuration error: {}", message.into()),
        )
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            details: self.details.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Internal,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Internal,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_fixed_status_and_code() {
        let table = [
            (ErrorKind::Authorization, 401, "AUTHORIZATION_ERROR"),
            (ErrorKind::TokenExpired, 401, "TOKEN_EXPIRED"),
            (ErrorKind::TokenMalformed, 401, "TOKEN_MALFORMED"),
            (ErrorKind::AccessDenied, 403, "ACCESS_DENIED"),
            (ErrorKind::NotFound, 404, "NOT_FOUND"),
            (ErrorKind::BadRequest, 400, "BAD_REQUEST"),
            (
                ErrorKind::LoginCredentialsIncorrect,
                400,
                "LOGIN_CREDENTIALS_INCORRECT",
            ),
            (ErrorKind::Internal, 500, "INTERNAL_ERROR"),
        ];
        for (kind, status, code) in table {
            assert_eq!(kind.status_code(), status);
            assert_eq!(kind.code(), code);
        }
    }

    #[test]
    fn access_denied_carries_resource_and_action() {
        let err = AppError::access_denied("User", "delete");
        assert_eq!(err.kind, ErrorKind::AccessDenied);
        let details = err.details.expect("details");
        assert_eq!(details["resource"], "User");
        assert_eq!(details["action"], "delete");
    }

    #[test]
    fn clone_drops_source_but_keeps_details() {
        let err = AppError::with_source(
            ErrorKind::Internal,
            "boom",
            std::io::Error::other("disk"),
        )
        .with_details(serde_json::json!({"k": 1}));
        let cloned = err.clone();
        assert!(cloned.source.is_none());
        assert_eq!(cloned.details, err.details);
        assert_eq!(cloned.to_string(), "INTERNAL_ERROR: boom");
    }
}
