use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::user::AuthorView;

/// A like marker. Its existence is the liked state; there is no flag.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LikeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub job_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Result of a like toggle: the new state and the post's counter after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LikeToggle {
    pub liked: bool,
    pub likes: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CommentRow {
    pub id: Uuid,
    pub content: String,
    pub job_id: Uuid,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentWithAuthor {
    #[serde(flatten)]
    pub comment: CommentRow,
    pub author: Option<AuthorView>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub content: String,
    pub job_id: Uuid,
    pub author_id: Uuid,
}
