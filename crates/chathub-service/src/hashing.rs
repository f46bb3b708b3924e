//! Run credential hashing on the blocking pool.

use std::sync::Arc;

use chathub_auth::error::AuthError;
use chathub_auth::password::CredentialHasher;
use chathub_core::error::AppError;
use chathub_core::result::AppResult;

/// Hash `secret` off the async executor.
pub async fn hash_password(hasher: &Arc<dyn CredentialHasher>, secret: &str) -> AppResult<String> {
    let hasher = Arc::clone(hasher);
    let secret = secret.to_owned();
    tokio::task::spawn_blocking(move || hasher.hash(&secret))
        .await
        .map_err(|e| AppError::internal(format!("Hashing task failed: {e}")))?
        .map_err(AppError::from)
}

/// Check `secret` against `digest` off the async executor.
///
/// `Ok(false)` on mismatch; `Err` only when hashing itself fails.
pub async fn verify_password(
    hasher: &Arc<dyn CredentialHasher>,
    digest: &str,
    secret: &str,
) -> AppResult<bool> {
    let hasher = Arc::clone(hasher);
    let digest = digest.to_owned();
    let secret = secret.to_owned();
    let outcome = tokio::task::spawn_blocking(move || hasher.verify(&digest, &secret))
        .await
        .map_err(|e| AppError::internal(format!("Hashing task failed: {e}")))?;

    match outcome {
        Ok(()) => Ok(true),
        Err(AuthError::PasswordMismatch) => Ok(false),
        Err(e) => Err(e.into()),
    }
}
