//! User handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use chathub_auth::AccessRule;
use chathub_core::types::pagination::PageResponse;
use chathub_entity::User;
use chathub_entity::resource::USER;

use crate::dto::request::{CreateUserRequest, UpdateUserRequest};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::path::parse_uuid;
use crate::extractors::{AccessRules, AuthUser, Authorized, PaginationParams, ValidJson};
use crate::state::AppState;

/// `User:read` on every user.
pub struct ReadUsers;

impl AccessRules for ReadUsers {
    const RULES: &'static [AccessRule] = &[AccessRule::new(USER, "read")];
}

/// `User:create`.
pub struct CreateUsers;

impl AccessRules for CreateUsers {
    const RULES: &'static [AccessRule] = &[AccessRule::new(USER, "create")];
}

/// `User:delete`.
pub struct DeleteUsers;

impl AccessRules for DeleteUsers {
    const RULES: &'static [AccessRule] = &[AccessRule::new(USER, "delete")];
}

/// GET /api/users/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<User>>> {
    let user = state.user_service.me(&auth).await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    _auth: Authorized<ReadUsers>,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<User>>>> {
    let page = state
        .user_service
        .list(&params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<User>>> {
    let user = state.user_service.get(&auth, parse_uuid(&id)?).await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    auth: Authorized<CreateUsers>,
    ValidJson(req): ValidJson<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<User>>)> {
    let user = state.user_service.create(&auth, req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(user))))
}

/// PUT /api/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidJson(req): ValidJson<UpdateUserRequest>,
) -> ApiResult<Json<ApiResponse<User>>> {
    let user = state
        .user_service
        .update(&auth, parse_uuid(&id)?, req.into())
        .await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// DELETE /api/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    auth: Authorized<DeleteUsers>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.user_service.delete(&auth, parse_uuid(&id)?).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("User deleted"))))
}
