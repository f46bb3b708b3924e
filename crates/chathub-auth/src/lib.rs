//! # chathub-auth
//!
//! Authentication and authorization for ChatHub.
//!
//! ## Modules
//!
//! - `jwt`: session token claims and the HMAC token codec
//! - `password`: Argon2id credential hashing and password length policy
//! - `session`: login/logout/verify against the revocation store
//! - `rbac`: hierarchical role policy and the access manager
//! - `guard`: framework-agnostic request gate (authenticate, check liveness, authorize)
//! - `context`: the per-request authenticated user

pub mod context;
pub mod error;
pub mod guard;
pub mod jwt;
pub mod password;
pub mod rbac;
pub mod session;

pub use context::ContextUser;
pub use error::{AccessError, AuthError, PolicyError};
pub use guard::{AccessRule, AuthGuard};
pub use jwt::{Claims, JwtCodec, TokenCodec};
pub use password::{Argon2Hasher, CredentialHasher, PasswordPolicy};
pub use rbac::{AccessManager, PolicyDefinition};
pub use session::{IssuedToken, SessionManager};
