//! Password length policy for new passwords.

use chathub_core::config::AuthConfig;
use chathub_core::error::AppError;

/// Enforces the configured password length bounds.
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    min_length: usize,
    max_length: usize,
}

impl PasswordPolicy {
    /// Creates a policy from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
            max_length: config.password_max_length,
        }
    }

    /// Validates a password, counting characters rather than bytes.
    pub fn validate(&self, password: &str) -> Result<(), AppError> {
        let length = password.chars().count();
        if length < self.min_length || length > self.max_length {
            return Err(AppError::bad_request(format!(
                "Password must be between {} and {} characters long",
                self.min_length, self.max_length
            )));
        }
        Ok(())
    }
}
