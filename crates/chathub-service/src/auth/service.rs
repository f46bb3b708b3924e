//! Account service: signup, credential check + login, logout.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::warn;

use chathub_auth::password::CredentialHasher;
use chathub_auth::{ContextUser, IssuedToken, PasswordPolicy, SessionManager};
use chathub_core::error::AppError;
use chathub_core::result::AppResult;
use chathub_entity::user::{User, UserRole};

use crate::UserRepo;
use crate::hashing::{hash_password, verify_password};
use crate::user::service::{CreateUserCommand, create_account};

/// Data submitted at signup.
#[derive(Debug, Clone)]
pub struct SignupCommand {
    /// Email, used as the login name.
    pub email: String,
    /// Plaintext password.
    pub password: String,
    /// Repeated password.
    pub confirmed_password: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// The authenticated user.
    pub user: User,
    /// The session token.
    pub token: IssuedToken,
}

/// Handles account lifecycle operations.
#[derive(Clone)]
pub struct AuthService {
    users: UserRepo,
    hasher: Arc<dyn CredentialHasher>,
    sessions: Arc<SessionManager>,
    password_policy: PasswordPolicy,
    /// Digest checked when the email is unknown, so both failures cost one verify.
    dummy_digest: Arc<OnceCell<String>>,
}

impl AuthService {
    /// Creates a new account service.
    pub fn new(
        users: UserRepo,
        hasher: Arc<dyn CredentialHasher>,
        sessions: Arc<SessionManager>,
        password_policy: PasswordPolicy,
    ) -> Self {
        Self {
            users,
            hasher,
            sessions,
            password_policy,
            dummy_digest: Arc::new(OnceCell::new()),
        }
    }

    /// Register a new `USER` account.
    pub async fn signup(&self, cmd: SignupCommand) -> AppResult<User> {
        if cmd.password != cmd.confirmed_password {
            return Err(AppError::bad_request("Passwords do not match."));
        }
        self.register(CreateUserCommand {
            email: cmd.email,
            password: cmd.password,
            first_name: cmd.first_name,
            last_name: cmd.last_name,
            role: UserRole::User,
        })
        .await
    }

    /// Create an account with any role, without an acting user.
    ///
    /// Used by signup and by the CLI when seeding the operator account.
    pub async fn register(&self, cmd: CreateUserCommand) -> AppResult<User> {
        create_account(&self.users, &self.hasher, &self.password_policy, cmd).await
    }

    /// Check credentials and start a session.
    ///
    /// Unknown email and wrong password produce the same error.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<LoginOutcome> {
        let email = normalize_email(email);
        let Some(user) = self.users.find_by_field("email", &email).await? else {
            let digest = self
                .dummy_digest
                .get_or_try_init(|| hash_password(&self.hasher, "chathub-unknown-account"))
                .await?;
            verify_password(&self.hasher, digest, password).await?;
            warn!("Login attempt for unknown email");
            return Err(AppError::login_credentials_incorrect());
        };

        if !verify_password(&self.hasher, &user.password_hash, password).await? {
            warn!(user_id = %user.id, "Login attempt with wrong password");
            return Err(AppError::login_credentials_incorrect());
        }

        let token = self.sessions.login(&user).await?;
        Ok(LoginOutcome { user, token })
    }

    /// End the caller's session.
    pub async fn logout(&self, ctx: &ContextUser) -> AppResult<()> {
        self.sessions.logout(ctx.auth_uuid).await?;
        Ok(())
    }
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
