use async_trait::async_trait;
use tracing::{debug, info};
use uuid::Uuid;

use super::PgStore;
use crate::models::engagement::{CommentRow, LikeRow, LikeToggle, NewComment};
use crate::store::{EngagementStore, StoreError};

#[async_trait]
impl EngagementStore for PgStore {
    async fn toggle_like(&self, user_id: Uuid, post_id: Uuid) -> Result<LikeToggle, StoreError> {
        let mut tx = self.pool.begin().await?;

        // Row lock on the post serializes toggles against it and doubles as
        // the existence check.
        let locked: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM posts WHERE id = $1 FOR UPDATE")
                .bind(post_id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Err(StoreError::NotFound("Post"));
        }

        let removed = sqlx::query_as::<_, LikeRow>(
            "DELETE FROM likes WHERE user_id = $1 AND job_id = $2 RETURNING *",
        )
        .bind(user_id)
        .bind(post_id)
        .fetch_optional(&mut *tx)
        .await?;

        let (liked, delta) = match removed {
            Some(like) => {
                debug!("Removed like {} on post {post_id}", like.id);
                (false, -1)
            }
            None => {
                // ON CONFLICT keeps the pair unique even if the lock above is
                // ever bypassed; a no-op insert leaves the counter alone.
                let inserted: Option<Uuid> = sqlx::query_scalar(
                    r#"
                    INSERT INTO likes (id, user_id, job_id)
                    VALUES ($1, $2, $3)
                    ON CONFLICT (user_id, job_id) DO NOTHING
                    RETURNING id
                    "#,
                )
                .bind(Uuid::new_v4())
                .bind(user_id)
                .bind(post_id)
                .fetch_optional(&mut *tx)
                .await?;
                (true, if inserted.is_some() { 1 } else { 0 })
            }
        };

        let likes: i32 = sqlx::query_scalar(
            "UPDATE posts SET likes = GREATEST(likes + $2, 0) WHERE id = $1 RETURNING likes",
        )
        .bind(post_id)
        .bind(delta)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(LikeToggle { liked, likes })
    }

    async fn create_comment(&self, comment: NewComment) -> Result<CommentRow, StoreError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            INSERT INTO comments (id, content, job_id, author_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&comment.content)
        .bind(comment.job_id)
        .bind(comment.author_id)
        .fetch_one(&mut *tx)
        .await?;

        let bumped = sqlx::query("UPDATE posts SET comments_count = comments_count + 1 WHERE id = $1")
            .bind(comment.job_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if bumped == 0 {
            info!(
                "Comment {} stored for missing post {}; no counter to update",
                row.id, comment.job_id
            );
        }

        tx.commit().await?;
        Ok(row)
    }

    async fn find_comment(&self, id: Uuid) -> Result<Option<CommentRow>, StoreError> {
        Ok(
            sqlx::query_as::<_, CommentRow>("SELECT * FROM comments WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn comments_for_post(&self, post_id: Uuid) -> Result<Vec<CommentRow>, StoreError> {
        Ok(sqlx::query_as::<_, CommentRow>(
            "SELECT * FROM comments WHERE job_id = $1 ORDER BY created_at ASC, id ASC",
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn update_comment(&self, id: Uuid, content: &str) -> Result<CommentRow, StoreError> {
        sqlx::query_as::<_, CommentRow>(
            "UPDATE comments SET content = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(content)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound("Comment"))
    }

    async fn delete_comment(&self, id: Uuid) -> Result<(), StoreError> {
        let deleted = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        if deleted == 0 {
            return Err(StoreError::NotFound("Comment"));
        }
        Ok(())
    }
}
