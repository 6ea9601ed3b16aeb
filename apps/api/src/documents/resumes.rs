use bytes::Bytes;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::auth::ownership::owned_by;
use crate::auth::CallerIdentity;
use crate::documents::storage::{sanitize_filename, BlobStore};
use crate::errors::AppError;
use crate::models::resume::{CoverLetterRow, ResumeRow};
use crate::store::{DocumentStore, Store};
use crate::validation::non_blank;

/// A file pulled out of a multipart upload.
#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

fn resume_key(user_id: Uuid, file_name: &str) -> String {
    format!(
        "resumes/{}/{}-{}-{}",
        user_id,
        Utc::now().timestamp_millis(),
        Uuid::new_v4().simple(),
        sanitize_filename(file_name)
    )
}

fn cover_letter_key(user_id: Uuid) -> String {
    format!(
        "cover-letters/{}/{}-{}.txt",
        user_id,
        Utc::now().timestamp_millis(),
        Uuid::new_v4().simple()
    )
}

pub async fn upload_resume(
    store: &dyn Store,
    blobs: &dyn BlobStore,
    caller: &CallerIdentity,
    file: Option<UploadedFile>,
) -> Result<ResumeRow, AppError> {
    let file = file
        .filter(|f| !f.bytes.is_empty())
        .ok_or_else(|| AppError::Validation("No file uploaded".into()))?;

    let key = resume_key(caller.id, &file.file_name);
    blobs.put(&key, file.bytes, &file.content_type).await?;

    let resume = store.create_resume(caller.id, &key).await?;
    info!("Resume {} uploaded by {}", resume.id, caller.id);
    Ok(resume)
}

pub async fn my_resumes(
    store: &dyn Store,
    caller: &CallerIdentity,
) -> Result<Vec<ResumeRow>, AppError> {
    Ok(store.resumes_for_user(caller.id).await?)
}

/// Removes the blob first, then the row, so a storage failure leaves the
/// resume listed and retryable.
pub async fn delete_resume(
    store: &dyn Store,
    blobs: &dyn BlobStore,
    caller: &CallerIdentity,
    id: Uuid,
) -> Result<(), AppError> {
    let resume = owned_by(store.find_resume(id).await?, caller)?;
    blobs.delete(&resume.file_url).await?;
    store.delete_resume(id).await?;
    info!("Resume {} deleted by {}", id, caller.id);
    Ok(())
}

pub async fn save_cover_letter(
    store: &dyn Store,
    blobs: &dyn BlobStore,
    caller: &CallerIdentity,
    content: Option<String>,
) -> Result<CoverLetterRow, AppError> {
    let content =
        non_blank(content).ok_or_else(|| AppError::Validation("Content is required".into()))?;

    let key = cover_letter_key(caller.id);
    blobs
        .put(&key, Bytes::from(content), "text/plain; charset=utf-8")
        .await?;

    let letter = store.create_cover_letter(caller.id, &key).await?;
    info!("Cover letter {} saved by {}", letter.id, caller.id);
    Ok(letter)
}

pub async fn my_cover_letters(
    store: &dyn Store,
    caller: &CallerIdentity,
) -> Result<Vec<CoverLetterRow>, AppError> {
    Ok(store.cover_letters_for_user(caller.id).await?)
}
