use tracing::info;
use uuid::Uuid;

use crate::auth::ownership::owned_by;
use crate::auth::CallerIdentity;
use crate::content::author_map;
use crate::errors::AppError;
use crate::models::engagement::{CommentRow, CommentWithAuthor, NewComment};
use crate::models::user::AuthorView;
use crate::store::{EngagementStore, Store};
use crate::validation::non_blank;

/// Stores a comment and bumps the post's `comments_count`. A comment on a
/// post that no longer exists is still stored, with no counter change.
pub async fn create_comment(
    store: &dyn Store,
    caller: &CallerIdentity,
    post_id: Option<Uuid>,
    content: Option<String>,
) -> Result<CommentRow, AppError> {
    let content = non_blank(content);
    let missing: Vec<&str> = [
        ("content", content.is_none()),
        ("job_id", post_id.is_none()),
    ]
    .into_iter()
    .filter_map(|(name, absent)| absent.then_some(name))
    .collect();
    let (Some(content), Some(job_id)) = (content, post_id) else {
        return Err(AppError::Validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    };

    let comment = store
        .create_comment(NewComment {
            content,
            job_id,
            author_id: caller.id,
        })
        .await?;
    info!("Comment {} on post {} by {}", comment.id, job_id, caller.id);
    Ok(comment)
}

/// Oldest first, each with `{id, name}` of its author. Authors are fetched
/// in one batch for the whole thread.
pub async fn list_comments(
    store: &dyn Store,
    post_id: Uuid,
) -> Result<Vec<CommentWithAuthor>, AppError> {
    let comments = store.comments_for_post(post_id).await?;
    let authors = author_map(store, comments.iter().map(|c| c.author_id)).await?;

    Ok(comments
        .into_iter()
        .map(|comment| CommentWithAuthor {
            author: authors.get(&comment.author_id).map(AuthorView::from),
            comment,
        })
        .collect())
}

pub async fn update_comment(
    store: &dyn Store,
    caller: &CallerIdentity,
    id: Uuid,
    content: Option<String>,
) -> Result<CommentRow, AppError> {
    let content =
        non_blank(content).ok_or_else(|| AppError::Validation("Content is required".into()))?;
    owned_by(store.find_comment(id).await?, caller)?;
    Ok(store.update_comment(id, &content).await?)
}

/// Hard delete. Leaves `comments_count` on the post as it was, so the
/// counter can run ahead of the stored comments.
pub async fn delete_comment(
    store: &dyn Store,
    caller: &CallerIdentity,
    id: Uuid,
) -> Result<(), AppError> {
    owned_by(store.find_comment(id).await?, caller)?;
    store.delete_comment(id).await?;
    info!("Comment {} deleted by {}", id, caller.id);
    Ok(())
}
