//! Axum route handlers for accounts and profiles.

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::accounts::profile;
use crate::accounts::service::{self, LoginRequest, RegisterRequest, UpdateUserRequest};
use crate::auth::CallerIdentity;
use crate::errors::AppError;
use crate::extract::{ApiJson, ApiPath};
use crate::models::user::ProfilePatch;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    #[serde(rename = "newPassword", alias = "new_password")]
    pub new_password: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Accounts
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/register
pub async fn handle_register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let auth = service::register(state.store.as_ref(), state.identity.as_ref(), request).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "User registered successfully",
            "user": auth.user,
            "token": auth.token,
        })),
    ))
}

/// POST /api/login
pub async fn handle_login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    let auth = service::login(state.store.as_ref(), state.identity.as_ref(), request).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Login successful",
        "user": auth.user,
        "token": auth.token,
    })))
}

/// GET /api/get-users
pub async fn handle_list_users(
    State(state): State<AppState>,
    _caller: CallerIdentity,
) -> Result<Json<Value>, AppError> {
    let users = service::list_users(state.store.as_ref()).await?;
    Ok(Json(json!({ "success": true, "users": users })))
}

/// PATCH /api/update-user
pub async fn handle_update_user(
    State(state): State<AppState>,
    caller: CallerIdentity,
    ApiJson(request): ApiJson<UpdateUserRequest>,
) -> Result<Json<Value>, AppError> {
    let auth = service::update_user(
        state.store.as_ref(),
        state.identity.as_ref(),
        &caller,
        request,
    )
    .await?;
    Ok(Json(json!({
        "success": true,
        "message": "User updated successfully",
        "user": auth.user,
        "token": auth.token,
    })))
}

/// DELETE /api/delete-user/:id
pub async fn handle_delete_user(
    State(state): State<AppState>,
    caller: CallerIdentity,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Value>, AppError> {
    service::delete_user(state.store.as_ref(), state.blobs.as_ref(), &caller, id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "User deleted successfully",
    })))
}

/// POST /api/forgot-password
///
/// The reset link itself only goes to the delivery hook, never the response.
pub async fn handle_forgot_password(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ForgotPasswordRequest>,
) -> Result<Json<Value>, AppError> {
    service::request_password_reset(
        state.store.as_ref(),
        request.email,
        &state.config.reset_link_base,
    )
    .await?;
    Ok(Json(json!({
        "success": true,
        "message": "Password reset link sent to your email.",
    })))
}

/// POST /api/reset-password/:token
pub async fn handle_reset_password(
    State(state): State<AppState>,
    ApiPath(token): ApiPath<String>,
    ApiJson(request): ApiJson<ResetPasswordRequest>,
) -> Result<Json<Value>, AppError> {
    service::reset_password(state.store.as_ref(), &token, request.new_password).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Password has been reset successfully.",
    })))
}

// ────────────────────────────────────────────────────────────────────────────
// Profile
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/getprofile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    caller: CallerIdentity,
) -> Result<Json<Value>, AppError> {
    let profile = profile::get_profile(state.store.as_ref(), caller.id).await?;
    Ok(Json(json!({ "success": true, "profile": profile })))
}

/// PATCH /api/updateprofile
pub async fn handle_update_profile(
    State(state): State<AppState>,
    caller: CallerIdentity,
    ApiJson(patch): ApiJson<ProfilePatch>,
) -> Result<Json<Value>, AppError> {
    let profile = profile::update_profile(state.store.as_ref(), caller.id, patch).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Profile updated successfully",
        "profile": profile,
    })))
}
