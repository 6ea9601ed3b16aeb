//! Axum route handlers for posts and job posts.

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::CallerIdentity;
use crate::content::job_posts::{self, JobPostFields};
use crate::content::posts;
use crate::errors::AppError;
use crate::extract::{ApiJson, ApiPath};
use crate::models::post::PostChanges;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub content: Option<String>,
    pub media_url: Option<String>,
    pub media_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub id: Option<Uuid>,
    #[serde(flatten)]
    pub changes: PostChanges,
}

#[derive(Debug, Deserialize)]
pub struct UpdateJobPostRequest {
    pub id: Option<Uuid>,
    #[serde(flatten)]
    pub fields: JobPostFields,
}

fn require_id(id: Option<Uuid>, what: &str) -> Result<Uuid, AppError> {
    id.ok_or_else(|| AppError::Validation(format!("{what} id is required")))
}

// ────────────────────────────────────────────────────────────────────────────
// Posts
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/getposts
pub async fn handle_list_posts(
    State(state): State<AppState>,
    _caller: CallerIdentity,
) -> Result<Json<Value>, AppError> {
    let posts = posts::list_posts(state.store.as_ref()).await?;
    Ok(Json(json!({ "success": true, "posts": posts })))
}

/// GET /api/myposts
pub async fn handle_my_posts(
    State(state): State<AppState>,
    caller: CallerIdentity,
) -> Result<Json<Value>, AppError> {
    let posts = posts::my_posts(state.store.as_ref(), &caller).await?;
    Ok(Json(json!({ "success": true, "posts": posts })))
}

/// POST /api/createpost
pub async fn handle_create_post(
    State(state): State<AppState>,
    caller: CallerIdentity,
    ApiJson(request): ApiJson<CreatePostRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let post = posts::create_post(
        state.store.as_ref(),
        &caller,
        request.content,
        request.media_url,
        request.media_type,
    )
    .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Post created successfully",
            "post": post,
        })),
    ))
}

/// PATCH /api/update
pub async fn handle_update_post(
    State(state): State<AppState>,
    caller: CallerIdentity,
    ApiJson(request): ApiJson<UpdatePostRequest>,
) -> Result<Json<Value>, AppError> {
    let id = require_id(request.id, "Post")?;
    let post = posts::update_post(state.store.as_ref(), &caller, id, request.changes).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Post updated successfully",
        "post": post,
    })))
}

/// DELETE /api/delete/:id
pub async fn handle_delete_post(
    State(state): State<AppState>,
    caller: CallerIdentity,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Value>, AppError> {
    posts::delete_post(state.store.as_ref(), &caller, id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Post deleted successfully",
    })))
}

// ────────────────────────────────────────────────────────────────────────────
// Job posts
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/getalljobposts
pub async fn handle_list_job_posts(
    State(state): State<AppState>,
    _caller: CallerIdentity,
) -> Result<Json<Value>, AppError> {
    let jobs = job_posts::list_job_posts(state.store.as_ref()).await?;
    Ok(Json(json!({ "success": true, "jobPosts": jobs })))
}

/// GET /api/myjobposts
pub async fn handle_my_job_posts(
    State(state): State<AppState>,
    caller: CallerIdentity,
) -> Result<Json<Value>, AppError> {
    let jobs = job_posts::my_job_posts(state.store.as_ref(), &caller).await?;
    Ok(Json(json!({ "success": true, "jobPosts": jobs })))
}

/// POST /api/createjobpost
pub async fn handle_create_job_post(
    State(state): State<AppState>,
    caller: CallerIdentity,
    ApiJson(fields): ApiJson<JobPostFields>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let job = job_posts::create_job_post(state.store.as_ref(), &caller, fields).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Job post created successfully",
            "jobPost": job,
        })),
    ))
}

/// PATCH /api/updatejobpost
pub async fn handle_update_job_post(
    State(state): State<AppState>,
    caller: CallerIdentity,
    ApiJson(request): ApiJson<UpdateJobPostRequest>,
) -> Result<Json<Value>, AppError> {
    let id = require_id(request.id, "Job post")?;
    let job = job_posts::update_job_post(state.store.as_ref(), &caller, id, request.fields).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Job post updated successfully",
        "jobPost": job,
    })))
}

/// DELETE /api/deletejobpost/:id
pub async fn handle_delete_job_post(
    State(state): State<AppState>,
    caller: CallerIdentity,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Value>, AppError> {
    job_posts::delete_job_post(state.store.as_ref(), &caller, id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Job post deleted successfully",
    })))
}
