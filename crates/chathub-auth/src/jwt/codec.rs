//! HMAC-signed JWT creation and parsing.

use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::error::AuthError;

use super::claims::Claims;

/// Creates and parses signed session tokens.
pub trait TokenCodec: Send + Sync + std::fmt::Debug + 'static {
    /// Sign `claims` with `secret`.
    fn create(&self, claims: &Claims, secret: &str) -> Result<String, AuthError>;

    /// Verify `token` with `secret` and return its claims.
    fn parse(&self, token: &str, secret: &str) -> Result<Claims, AuthError>;
}

/// JWT codec signing with HS256.
///
/// Parsing accepts only the HMAC family regardless of what the token
/// header claims, so `alg: none` and asymmetric algorithms are rejected.
#[derive(Debug, Clone)]
pub struct JwtCodec {
    validation: Validation,
}

impl JwtCodec {
    /// Codec with the given clock-skew leeway for `exp`, in seconds.
    pub fn new(leeway_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.validate_exp = true;
        validation.leeway = leeway_seconds;
        validation.set_required_spec_claims(&["exp"]);
        Self { validation }
    }
}

impl Default for JwtCodec {
    fn default() -> Self {
        Self::new(0)
    }
}

impl TokenCodec for JwtCodec {
    fn create(&self, claims: &Claims, secret: &str) -> Result<String, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::Signing("signing secret is empty".into()));
        }
        claims.validate()?;

        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| AuthError::Signing(e.to_string()))
    }

    fn parse(&self, token: &str, secret: &str) -> Result<Claims, AuthError> {
        if token.is_empty() {
            return Err(AuthError::MalformedToken("token is empty".into()));
        }
        if secret.is_empty() {
            return Err(AuthError::MalformedToken("verification secret is empty".into()));
        }

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &self.validation,
        )
        .map_err(|e| match e.kind() {
            JwtErrorKind::ExpiredSignature => AuthError::ExpiredToken,
            _ => AuthError::MalformedToken(e.to_string()),
        })?;

        Ok(data.claims)
    }
}
