//! Axum route handlers for resumes and saved cover letters.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::CallerIdentity;
use crate::documents::resumes::{self, UploadedFile};
use crate::errors::AppError;
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;

const RESUME_FIELD: &str = "resume";

#[derive(Debug, Deserialize)]
pub struct SaveCoverLetterRequest {
    pub content: Option<String>,
}

/// Reads the `resume` part of the form; other parts are skipped.
async fn read_resume_field(mut multipart: Multipart) -> Result<Option<UploadedFile>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or("resume").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
        return Ok(Some(UploadedFile {
            file_name,
            content_type,
            bytes,
        }));
    }
    Ok(None)
}

/// POST /api/uploadresume
///
/// Multipart form with the file under `resume`.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    caller: CallerIdentity,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let file = read_resume_field(multipart?).await?;
    let resume = resumes::upload_resume(
        state.store.as_ref(),
        state.blobs.as_ref(),
        &caller,
        file,
    )
    .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Resume uploaded successfully",
            "resume": resume,
        })),
    ))
}

/// GET /api/myresumes
pub async fn handle_my_resumes(
    State(state): State<AppState>,
    caller: CallerIdentity,
) -> Result<Json<Value>, AppError> {
    let resumes = resumes::my_resumes(state.store.as_ref(), &caller).await?;
    Ok(Json(json!({ "success": true, "resumes": resumes })))
}

/// DELETE /api/deleteresume/:id
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    caller: CallerIdentity,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Value>, AppError> {
    resumes::delete_resume(state.store.as_ref(), state.blobs.as_ref(), &caller, id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Resume deleted successfully",
    })))
}

/// POST /api/savecoverletter
pub async fn handle_save_cover_letter(
    State(state): State<AppState>,
    caller: CallerIdentity,
    ApiJson(request): ApiJson<SaveCoverLetterRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let letter = resumes::save_cover_letter(
        state.store.as_ref(),
        state.blobs.as_ref(),
        &caller,
        request.content,
    )
    .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Cover letter saved successfully",
            "coverLetter": letter,
        })),
    ))
}

/// GET /api/mycoverletters
pub async fn handle_my_cover_letters(
    State(state): State<AppState>,
    caller: CallerIdentity,
) -> Result<Json<Value>, AppError> {
    let letters = resumes::my_cover_letters(state.store.as_ref(), &caller).await?;
    Ok(Json(json!({ "success": true, "coverLetters": letters })))
}
