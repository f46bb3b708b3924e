//! User service: profile reads, admin CRUD, role changes.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use chathub_auth::password::CredentialHasher;
use chathub_auth::{AccessRule, AuthGuard, ContextUser, PasswordPolicy};
use chathub_core::error::AppError;
use chathub_core::result::AppResult;
use chathub_core::types::pagination::{PageRequest, PageResponse};
use chathub_entity::resource::USER;
use chathub_entity::user::{NewUser, User, UserRole};

use crate::UserRepo;
use crate::auth::service::normalize_email;
use crate::hashing::hash_password;

/// Data required to create a user with an explicit role.
#[derive(Debug, Clone)]
pub struct CreateUserCommand {
    /// Email, used as the login name.
    pub email: String,
    /// Plaintext password.
    pub password: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Assigned role.
    pub role: UserRole,
}

/// Partial update of a user. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserCommand {
    /// New given name.
    pub first_name: Option<String>,
    /// New family name.
    pub last_name: Option<String>,
    /// New email.
    pub email: Option<String>,
    /// New password.
    pub password: Option<String>,
    /// New role. Requires `update` on every user, not just oneself.
    pub role: Option<UserRole>,
}

/// Manages user accounts on behalf of an authenticated caller.
#[derive(Clone)]
pub struct UserService {
    users: UserRepo,
    hasher: Arc<dyn CredentialHasher>,
    guard: Arc<AuthGuard>,
    password_policy: PasswordPolicy,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(
        users: UserRepo,
        hasher: Arc<dyn CredentialHasher>,
        guard: Arc<AuthGuard>,
        password_policy: PasswordPolicy,
    ) -> Self {
        Self {
            users,
            hasher,
            guard,
            password_policy,
        }
    }

    /// The caller's own record.
    pub async fn me(&self, ctx: &ContextUser) -> AppResult<User> {
        self.users
            .find_by_id(&ctx.id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// One page of users, newest first.
    pub async fn list(&self, page: &PageRequest) -> AppResult<PageResponse<User>> {
        self.users.find_all(page).await
    }

    /// Load a user the caller may read.
    pub async fn get(&self, ctx: &ContextUser, id: Uuid) -> AppResult<User> {
        let user = self.load(id).await?;
        self.guard.authorize_instance(ctx, USER, "read", &user)?;
        Ok(user)
    }

    /// Create a user with an explicit role.
    pub async fn create(&self, ctx: &ContextUser, cmd: CreateUserCommand) -> AppResult<User> {
        let user = create_account(&self.users, &self.hasher, &self.password_policy, cmd).await?;
        info!(user_id = %user.id, created_by = %ctx.id, "User created");
        Ok(user)
    }

    /// Apply a partial update to a user the caller may update.
    pub async fn update(
        &self,
        ctx: &ContextUser,
        id: Uuid,
        cmd: UpdateUserCommand,
    ) -> AppResult<User> {
        let mut user = self.load(id).await?;
        self.guard.authorize_instance(ctx, USER, "update", &user)?;

        if let Some(role) = cmd.role.filter(|role| *role != user.role) {
            self.guard.authorize(ctx, &[AccessRule::new(USER, "update")])?;
            info!(user_id = %user.id, from = %user.role, to = %role, changed_by = %ctx.id, "Role changed");
            user.role = role;
        }

        if let Some(email) = cmd.email {
            let email = normalize_email(&email);
            if email.is_empty() {
                return Err(AppError::bad_request("Email must not be empty"));
            }
            if email != user.email {
                if let Some(existing) = self.users.find_by_field("email", &email).await? {
                    if existing.id != user.id {
                        return Err(AppError::bad_request("User already exists."));
                    }
                }
                user.email = email;
            }
        }

        if let Some(password) = cmd.password {
            self.password_policy.validate(&password)?;
            user.password_hash = hash_password(&self.hasher, &password).await?;
        }
        if let Some(first_name) = cmd.first_name {
            user.first_name = first_name.trim().to_string();
        }
        if let Some(last_name) = cmd.last_name {
            user.last_name = last_name.trim().to_string();
        }

        user.updated_at = Utc::now();
        self.users.save(&user).await
    }

    /// Delete a user the caller may delete. Callers cannot delete themselves.
    pub async fn delete(&self, ctx: &ContextUser, id: Uuid) -> AppResult<()> {
        let user = self.load(id).await?;
        self.guard.authorize_instance(ctx, USER, "delete", &user)?;

        if user.id == ctx.id {
            return Err(AppError::bad_request("Cannot delete your own account"));
        }

        if !self.users.delete_by_id(&id).await? {
            return Err(AppError::not_found("User not found"));
        }
        info!(user_id = %id, deleted_by = %ctx.id, "User deleted");
        Ok(())
    }

    async fn load(&self, id: Uuid) -> AppResult<User> {
        self.users
            .find_by_id(&id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))
    }
}

/// Validate, hash, and store a new account without an acting user.
pub async fn create_account(
    users: &UserRepo,
    hasher: &Arc<dyn CredentialHasher>,
    password_policy: &PasswordPolicy,
    cmd: CreateUserCommand,
) -> AppResult<User> {
    password_policy.validate(&cmd.password)?;

    let email = normalize_email(&cmd.email);
    if email.is_empty() {
        return Err(AppError::bad_request("Email must not be empty"));
    }
    if users.find_by_field("email", &email).await?.is_some() {
        return Err(AppError::bad_request("User already exists."));
    }

    let password_hash = hash_password(hasher, &cmd.password).await?;
    let user = users
        .save(&User::create(NewUser {
            email,
            password_hash,
            first_name: cmd.first_name.trim().to_string(),
            last_name: cmd.last_name.trim().to_string(),
            role: cmd.role,
        }))
        .await?;

    info!(user_id = %user.id, role = %user.role, "User registered");
    Ok(user)
}

#[cfg(test)]
mod tests {
    use chathub_core::error::ErrorKind;

    use super::*;
    use crate::testing::{Fixture, fixture};

    fn command(email: &str, role: UserRole) -> CreateUserCommand {
        CreateUserCommand {
            email: email.into(),
            password: "password123".into(),
            first_name: "Test".into(),
            last_name: "User".into(),
            role,
        }
    }

    async fn login_as(fx: &Fixture, email: &str, role: UserRole) -> (User, ContextUser) {
        let user = fx.auth.register(command(email, role)).await.unwrap();
        let outcome = fx.auth.login(email, "password123").await.unwrap();
        let header = format!("Bearer {}", outcome.token.token);
        let ctx = fx.guard.check_auth(Some(&header)).await.unwrap();
        (user, ctx)
    }

    #[tokio::test]
    async fn me_returns_the_callers_record() {
        let fx = fixture();
        let (user, ctx) = login_as(&fx, "ada@example.com", UserRole::User).await;
        assert_eq!(fx.users.me(&ctx).await.unwrap().id, user.id);
    }

    #[tokio::test]
    async fn users_can_read_only_themselves() {
        let fx = fixture();
        let (me, ctx) = login_as(&fx, "ada@example.com", UserRole::User).await;
        let (other, _) = login_as(&fx, "bob@example.com", UserRole::User).await;

        assert_eq!(fx.users.get(&ctx, me.id).await.unwrap().email, "ada@example.com");
        let err = fx.users.get(&ctx, other.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::AccessDenied);

        let err = fx.users.get(&ctx, Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn users_update_their_profile_but_not_their_role() {
        let fx = fixture();
        let (me, ctx) = login_as(&fx, "ada@example.com", UserRole::User).await;

        let updated = fx
            .users
            .update(
                &ctx,
                me.id,
                UpdateUserCommand {
                    first_name: Some(" Augusta ".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.first_name, "Augusta");

        let err = fx
            .users
            .update(
                &ctx,
                me.id,
                UpdateUserCommand {
                    role: Some(UserRole::SuperAdmin),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::AccessDenied);
        assert_eq!(fx.repo.find_by_id(&me.id).await.unwrap().unwrap().role, UserRole::User);
    }

    #[tokio::test]
    async fn admins_change_roles() {
        let fx = fixture();
        let (_, admin) = login_as(&fx, "root@example.com", UserRole::Admin).await;
        let (user, _) = login_as(&fx, "ada@example.com", UserRole::User).await;

        let updated = fx
            .users
            .update(
                &admin,
                user.id,
                UpdateUserCommand {
                    role: Some(UserRole::Admin),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.role, UserRole::Admin);
    }

    #[tokio::test]
    async fn email_changes_respect_uniqueness() {
        let fx = fixture();
        let (me, ctx) = login_as(&fx, "ada@example.com", UserRole::User).await;
        login_as(&fx, "bob@example.com", UserRole::User).await;

        let err = fx
            .users
            .update(
                &ctx,
                me.id,
                UpdateUserCommand {
                    email: Some("BOB@example.com".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::BadRequest);
    }

    #[tokio::test]
    async fn password_change_takes_effect_at_next_login() {
        let fx = fixture();
        let (me, ctx) = login_as(&fx, "ada@example.com", UserRole::User).await;

        fx.users
            .update(
                &ctx,
                me.id,
                UpdateUserCommand {
                    password: Some("another-secret".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(fx.auth.login("ada@example.com", "password123").await.is_err());
        assert!(fx.auth.login("ada@example.com", "another-secret").await.is_ok());
    }

    #[tokio::test]
    async fn delete_rules() {
        let fx = fixture();
        let (admin_user, admin) = login_as(&fx, "root@example.com", UserRole::Admin).await;
        let (user, ctx) = login_as(&fx, "ada@example.com", UserRole::User).await;

        let err = fx.users.delete(&ctx, user.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::AccessDenied);

        let err = fx.users.delete(&admin, admin_user.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::BadRequest);

        fx.users.delete(&admin, user.id).await.unwrap();
        let err = fx.users.delete(&admin, user.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn create_assigns_the_requested_role() {
        let fx = fixture();
        let (_, admin) = login_as(&fx, "root@example.com", UserRole::SuperAdmin).await;
        let user = fx
            .users
            .create(&admin, command("mod@example.com", UserRole::Admin))
            .await
            .unwrap();
        assert_eq!(user.role, UserRole::Admin);

        let page = fx.users.list(&PageRequest::default()).await.unwrap();
        assert_eq!(page.total_items, 2);
    }
}
