//! Authentication and route-level authorization extractors.
//!
//! Both read the raw `Authorization` header and hand it to
//! [`AuthGuard::check_auth`](chathub_auth::AuthGuard::check_auth); header
//! parsing rules live there, not here.

use std::marker::PhantomData;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use chathub_auth::{AccessRule, ContextUser};

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated caller. Rejects with 401 when the token is missing,
/// invalid, expired, or its session has ended.
#[derive(Debug, Clone)]
pub struct AuthUser(pub ContextUser);

impl std::ops::Deref for AuthUser {
    type Target = ContextUser;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        let user = state.guard.check_auth(header).await?;
        Ok(AuthUser(user))
    }
}

/// Static rule set a route requires. Implemented by marker types.
pub trait AccessRules: Send + Sync + 'static {
    /// Every rule must be granted.
    const RULES: &'static [AccessRule];
}

/// The authenticated caller, additionally authorized for `R::RULES`.
///
/// Conditional grants do not satisfy these checks; handlers that load an
/// instance check ownership themselves.
pub struct Authorized<R: AccessRules> {
    /// The caller.
    pub user: ContextUser,
    _rules: PhantomData<R>,
}

impl<R: AccessRules> std::ops::Deref for Authorized<R> {
    type Target = ContextUser;
    fn deref(&self) -> &Self::Target {
        &self.user
    }
}

impl<R: AccessRules> FromRequestParts<AppState> for Authorized<R> {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        state.guard.authorize(&user, R::RULES)?;
        Ok(Authorized {
            user,
            _rules: PhantomData,
        })
    }
}
