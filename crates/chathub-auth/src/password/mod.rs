//! Credential hashing and password policy.

pub mod hasher;
pub mod validator;

pub use hasher::{Argon2Hasher, CredentialHasher};
pub use validator::PasswordPolicy;
