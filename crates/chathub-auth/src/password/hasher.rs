//! Argon2id credential hashing and verification.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use chathub_core::config::AuthConfig;

use crate::error::AuthError;

/// One-way, salted credential hashing.
///
/// Implementations are CPU-heavy by design; async callers should run them
/// on the blocking pool.
pub trait CredentialHasher: Send + Sync + std::fmt::Debug + 'static {
    /// Hash `secret` with a fresh random salt.
    fn hash(&self, secret: &str) -> Result<String, AuthError>;

    /// Check `secret` against a digest produced by [`CredentialHasher::hash`].
    fn verify(&self, digest: &str, secret: &str) -> Result<(), AuthError>;
}

/// Argon2id hasher with configurable cost parameters.
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    params: Params,
}

impl Argon2Hasher {
    /// Build a hasher from the configured memory, iteration, and parallelism costs.
    pub fn new(config: &AuthConfig) -> Result<Self, AuthError> {
        Self::with_costs(
            config.argon2_memory_kib,
            config.argon2_iterations,
            config.argon2_parallelism,
        )
    }

    /// Build a hasher from explicit cost parameters.
    pub fn with_costs(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self, AuthError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| AuthError::Hashing(format!("invalid Argon2 parameters: {e}")))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, secret: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;
        Ok(hash.to_string())
    }

    fn verify(&self, digest: &str, secret: &str) -> Result<(), AuthError> {
        let parsed = PasswordHash::new(digest)
            .map_err(|e| AuthError::Hashing(format!("invalid digest format: {e}")))?;

        match self.argon2().verify_password(secret.as_bytes(), &parsed) {
            Ok(()) => Ok(()),
            Err(argon2::password_hash::Error::Password) => Err(AuthError::PasswordMismatch),
            Err(e) => Err(AuthError::Hashing(e.to_string())),
        }
    }
}
