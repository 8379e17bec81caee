//! Authentication endpoints: login, refresh, logout, profile

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use forge_auth::permissions::CurrentUser;
use forge_core::error::ValidationErrors;
use forge_db::UserAccountRepository;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::extractors::AuthenticatedUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Employee code (the account username)
    pub employee_code: Option<String>,
    /// Accepted as an alias for employee_code
    pub username: Option<String>,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
    pub user: CurrentUser,
}

/// POST /api/v1/auth/login/
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let employee_code = request
        .employee_code
        .or(request.username)
        .filter(|code| !code.is_empty())
        .ok_or_else(|| ApiError::bad_request("employee_code or username is required"))?;

    let authenticated = state
        .auth_backend
        .authenticate(&employee_code, &request.password)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials provided"))?;

    let account = &authenticated.account;
    let pair = state.jwt.issue_pair(
        account.account_id,
        Some(&account.username),
        account.email.as_deref(),
    )?;

    info!(username = %account.username, "successful login");

    Ok(Json(LoginResponse {
        access: pair.access,
        refresh: pair.refresh,
        user: CurrentUser::from_account(account),
    }))
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh: Option<String>,
}

/// POST /api/v1/auth/refresh/
///
/// Rotation is on: the submitted refresh token is consumed and a fresh
/// pair is returned.
pub async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> ApiResult<impl IntoResponse> {
    let token = request
        .refresh
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::bad_request("Refresh token is required"))?;

    let (_, pair) = state.jwt.rotate(&token, &state.blacklist)?;

    Ok(Json(json!({
        "access": pair.access,
        "refresh": pair.refresh,
    })))
}

/// POST /api/v1/auth/logout/
pub async fn logout(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<RefreshRequest>,
) -> ApiResult<impl IntoResponse> {
    if let Some(ref token) = request.refresh {
        state.jwt.revoke(token, &state.blacklist);
    }

    info!(username = %user.username, "user logged out");
    Ok(Json(json!({ "message": "Successfully logged out" })))
}

/// GET /api/v1/auth/profile/
pub async fn profile(user: AuthenticatedUser) -> ApiResult<impl IntoResponse> {
    Ok(Json(user.0))
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

/// PUT /api/v1/auth/profile/
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<UpdateProfileRequest>,
) -> ApiResult<impl IntoResponse> {
    if let Some(ref email) = request.email {
        let mut errors = ValidationErrors::new();
        if !email.contains('@') {
            errors.add("email", "Enter a valid email address");
        }
        if !errors.is_empty() {
            return Err(errors.into());
        }
    }

    let account = UserAccountRepository::new(state.pool.clone())
        .update_profile(
            user.user_id,
            request.first_name.as_deref(),
            request.last_name.as_deref(),
            request.email.as_deref(),
        )
        .await?;

    Ok(Json(CurrentUser::from_account(&account)))
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// POST /api/v1/auth/change-password/
pub async fn change_password(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<ChangePasswordRequest>,
) -> ApiResult<impl IntoResponse> {
    let accounts = UserAccountRepository::new(state.pool.clone());
    let account = accounts
        .find_by_id(user.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Account", user.user_id))?;

    let changed = state
        .auth_backend
        .change_password(
            &account,
            &request.old_password,
            &request.new_password,
            state.config.auth.password_min_length,
        )
        .await?;

    if !changed {
        return Err(ApiError::bad_request("Current password is incorrect"));
    }

    info!(username = %user.username, "password changed");
    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Password changed successfully" })),
    ))
}

/// GET /api/v1/auth/permissions/
pub async fn permissions(user: AuthenticatedUser) -> ApiResult<impl IntoResponse> {
    Ok(Json(json!({
        "role": user.role,
        "permissions": user.permissions,
    })))
}
