//! Axum route handlers for likes and comments.

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::CallerIdentity;
use crate::engagement::{comments, likes};
use crate::errors::AppError;
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub content: Option<String>,
    pub job_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCommentRequest {
    pub content: Option<String>,
}

/// POST /api/toggle/:jobId
///
/// 201 when the call creates the like, 200 when it removes it.
pub async fn handle_toggle_like(
    State(state): State<AppState>,
    caller: CallerIdentity,
    ApiPath(post_id): ApiPath<Uuid>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let toggle = likes::toggle_like(state.store.as_ref(), &caller, post_id).await?;
    let (status, message) = if toggle.liked {
        (StatusCode::CREATED, "Post liked")
    } else {
        (StatusCode::OK, "Post unliked")
    };
    Ok((
        status,
        Json(json!({
            "success": true,
            "message": message,
            "liked": toggle.liked,
            "likes": toggle.likes,
        })),
    ))
}

/// POST /api/createcomment
pub async fn handle_create_comment(
    State(state): State<AppState>,
    caller: CallerIdentity,
    ApiJson(request): ApiJson<CreateCommentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let comment =
        comments::create_comment(state.store.as_ref(), &caller, request.job_id, request.content)
            .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "comment": comment })),
    ))
}

/// GET /api/postcomment/:postId
pub async fn handle_list_comments(
    State(state): State<AppState>,
    ApiPath(post_id): ApiPath<Uuid>,
) -> Result<Json<Value>, AppError> {
    let comments = comments::list_comments(state.store.as_ref(), post_id).await?;
    Ok(Json(json!({ "success": true, "comments": comments })))
}

/// PATCH /api/updatecomment/:id
pub async fn handle_update_comment(
    State(state): State<AppState>,
    caller: CallerIdentity,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<UpdateCommentRequest>,
) -> Result<Json<Value>, AppError> {
    let comment = comments::update_comment(state.store.as_ref(), &caller, id, request.content).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Comment updated successfully",
        "comment": comment,
    })))
}

/// DELETE /api/deletecomment/:id
pub async fn handle_delete_comment(
    State(state): State<AppState>,
    caller: CallerIdentity,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Value>, AppError> {
    comments::delete_comment(state.store.as_ref(), &caller, id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Comment deleted successfully",
    })))
}
