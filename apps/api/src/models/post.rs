use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::user::UserSummary;

/// Social-feed post. `likes` and `comments_count` are denormalized counters
/// maintained by the engagement store in the same transaction as the rows
/// they count.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PostRow {
    pub id: Uuid,
    pub content: String,
    pub media_url: Option<String>,
    pub media_type: Option<String>,
    pub author_id: Uuid,
    pub likes: i32,
    pub comments_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostWithAuthor {
    #[serde(flatten)]
    pub post: PostRow,
    pub author: Option<UserSummary>,
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub content: String,
    pub media_url: Option<String>,
    pub media_type: Option<String>,
    pub author_id: Uuid,
}

/// Partial post update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostChanges {
    pub content: Option<String>,
    pub media_url: Option<String>,
    pub media_type: Option<String>,
}
