//! User handlers (register, login, me, all, change-password, refresh-token)

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use kanban_types::{
    ChangePasswordRequest, IssuedTokens, LoginRequest, RefreshRequest, RegisterRequest,
    UserProfile,
};

use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/users/register
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<IssuedTokens>)> {
    let Json(req) = payload?;
    let issued = state.auth.register(req).await?;
    Ok((StatusCode::CREATED, Json(issued)))
}

/// POST /api/users/login
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<IssuedTokens>> {
    let Json(req) = payload?;
    let issued = state.auth.login(req).await?;
    Ok(Json(issued))
}

/// GET /api/users/me
pub async fn me(State(state): State<AppState>, AuthUser(principal): AuthUser) -> ApiResult<Json<UserProfile>> {
    let profile = state.auth.profile(&principal).await?;
    Ok(Json(profile))
}

/// GET /api/users/all
pub async fn list_all(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> ApiResult<Json<Vec<UserProfile>>> {
    let profiles = state.auth.list_users(&principal).await?;
    Ok(Json(profiles))
}

/// POST /api/users/change-password
pub async fn change_password(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    payload: Result<Json<ChangePasswordRequest>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(req) = payload?;
    state.auth.change_password(&principal, req).await?;
    Ok(StatusCode::OK)
}

/// POST /api/users/refresh-token
pub async fn refresh(
    State(state): State<AppState>,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<IssuedTokens>)> {
    let Json(req) = payload?;
    let issued = state.auth.refresh(&req.refresh_token).await?;
    Ok((StatusCode::CREATED, Json(issued)))
}
