//! Storage seam.
//!
//! Every read and write the API performs goes through these traits. The
//! Postgres implementation is the only one compiled into the service; the
//! in-memory one backs the test suite.
//!
//! Operations that touch more than one row (account + profile, like marker +
//! counter, comment + counter, post + its engagement rows) are single units
//! of work: an implementation must apply all of their writes or none.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::engagement::{CommentRow, LikeToggle, NewComment};
use crate::models::job_post::{JobPostChanges, JobPostRow, NewJobPost};
use crate::models::post::{NewPost, PostChanges, PostRow};
use crate::models::resume::{CoverLetterRow, ResumeRow};
use crate::models::user::{ProfilePatch, ProfileRow, UserRow, UserSummary};

#[cfg(test)]
pub mod memory;
pub mod postgres;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0} already exists")]
    Duplicate(&'static str),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Partial account update. `password_hash` is already hashed.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Creates the account and its default profile together.
    async fn create_user_with_profile(&self, user: NewUser) -> Result<UserRow, StoreError>;
    async fn find_user(&self, id: Uuid) -> Result<Option<UserRow>, StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRow>, StoreError>;
    async fn list_users(&self) -> Result<Vec<UserSummary>, StoreError>;
    /// One lookup for a whole batch of ids. Unknown ids are skipped.
    async fn users_by_ids(&self, ids: &[Uuid]) -> Result<Vec<UserSummary>, StoreError>;
    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<UserRow, StoreError>;
    /// Removes the account and everything it owns.
    async fn delete_user(&self, id: Uuid) -> Result<(), StoreError>;
    async fn set_reset_token(
        &self,
        id: Uuid,
        token: &str,
        expiry: DateTime<Utc>,
    ) -> Result<(), StoreError>;
    async fn find_user_by_reset_token(&self, token: &str) -> Result<Option<UserRow>, StoreError>;
    /// Stores the new hash and clears any reset token.
    async fn reset_password(&self, id: Uuid, password_hash: &str) -> Result<(), StoreError>;
    async fn find_profile(&self, user_id: Uuid) -> Result<Option<ProfileRow>, StoreError>;
    async fn update_profile(
        &self,
        user_id: Uuid,
        patch: &ProfilePatch,
    ) -> Result<ProfileRow, StoreError>;
}

#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn create_post(&self, post: NewPost) -> Result<PostRow, StoreError>;
    async fn find_post(&self, id: Uuid) -> Result<Option<PostRow>, StoreError>;
    /// Newest first.
    async fn list_posts(&self) -> Result<Vec<PostRow>, StoreError>;
    async fn posts_by_author(&self, author_id: Uuid) -> Result<Vec<PostRow>, StoreError>;
    async fn update_post(&self, id: Uuid, changes: &PostChanges) -> Result<PostRow, StoreError>;
    /// Removes the post with its likes and comments.
    async fn delete_post(&self, id: Uuid) -> Result<(), StoreError>;

    async fn create_job_post(&self, job: NewJobPost) -> Result<JobPostRow, StoreError>;
    async fn find_job_post(&self, id: Uuid) -> Result<Option<JobPostRow>, StoreError>;
    /// Newest first.
    async fn list_job_posts(&self) -> Result<Vec<JobPostRow>, StoreError>;
    async fn job_posts_by_author(&self, author_id: Uuid) -> Result<Vec<JobPostRow>, StoreError>;
    async fn update_job_post(
        &self,
        id: Uuid,
        changes: &JobPostChanges,
    ) -> Result<JobPostRow, StoreError>;
    async fn delete_job_post(&self, id: Uuid) -> Result<(), StoreError>;
}

#[async_trait]
pub trait EngagementStore: Send + Sync {
    /// Flips the (user, post) like marker and adjusts `posts.likes` by ±1 in
    /// the same unit of work. Fails with `NotFound` if the post is missing.
    async fn toggle_like(&self, user_id: Uuid, post_id: Uuid) -> Result<LikeToggle, StoreError>;

    /// Stores the comment and, if the post exists, bumps `comments_count`.
    async fn create_comment(&self, comment: NewComment) -> Result<CommentRow, StoreError>;
    async fn find_comment(&self, id: Uuid) -> Result<Option<CommentRow>, StoreError>;
    /// Oldest first.
    async fn comments_for_post(&self, post_id: Uuid) -> Result<Vec<CommentRow>, StoreError>;
    async fn update_comment(&self, id: Uuid, content: &str) -> Result<CommentRow, StoreError>;
    /// Hard delete. Leaves `comments_count` as it is.
    async fn delete_comment(&self, id: Uuid) -> Result<(), StoreError>;
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn create_resume(&self, user_id: Uuid, file_url: &str) -> Result<ResumeRow, StoreError>;
    async fn resumes_for_user(&self, user_id: Uuid) -> Result<Vec<ResumeRow>, StoreError>;
    async fn find_resume(&self, id: Uuid) -> Result<Option<ResumeRow>, StoreError>;
    async fn delete_resume(&self, id: Uuid) -> Result<(), StoreError>;

    async fn create_cover_letter(
        &self,
        user_id: Uuid,
        file_url: &str,
    ) -> Result<CoverLetterRow, StoreError>;
    async fn cover_letters_for_user(&self, user_id: Uuid)
        -> Result<Vec<CoverLetterRow>, StoreError>;
}

/// Everything the API needs from storage. Carried in `AppState` as
/// `Arc<dyn Store>`.
pub trait Store: UserStore + ContentStore + EngagementStore + DocumentStore {}

impl<T> Store for T where T: UserStore + ContentStore + EngagementStore + DocumentStore {}
