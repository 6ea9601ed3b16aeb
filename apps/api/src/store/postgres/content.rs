use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use super::PgStore;
use crate::models::job_post::{JobPostChanges, JobPostRow, NewJobPost};
use crate::models::post::{NewPost, PostChanges, PostRow};
use crate::store::{ContentStore, StoreError};

#[async_trait]
impl ContentStore for PgStore {
    async fn create_post(&self, post: NewPost) -> Result<PostRow, StoreError> {
        Ok(sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO posts (id, content, media_url, media_type, author_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&post.content)
        .bind(&post.media_url)
        .bind(&post.media_type)
        .bind(post.author_id)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<PostRow>, StoreError> {
        Ok(
            sqlx::query_as::<_, PostRow>("SELECT * FROM posts WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn list_posts(&self) -> Result<Vec<PostRow>, StoreError> {
        Ok(
            sqlx::query_as::<_, PostRow>("SELECT * FROM posts ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn posts_by_author(&self, author_id: Uuid) -> Result<Vec<PostRow>, StoreError> {
        Ok(sqlx::query_as::<_, PostRow>(
            "SELECT * FROM posts WHERE author_id = $1 ORDER BY created_at DESC",
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn update_post(&self, id: Uuid, changes: &PostChanges) -> Result<PostRow, StoreError> {
        sqlx::query_as::<_, PostRow>(
            r#"
            UPDATE posts
            SET content = COALESCE($2, content),
                media_url = COALESCE($3, media_url),
                media_type = COALESCE($4, media_type),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.content)
        .bind(&changes.media_url)
        .bind(&changes.media_type)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound("Post"))
    }

    async fn delete_post(&self, id: Uuid) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        // Likes cascade with the post; comments carry no foreign key.
        sqlx::query("DELETE FROM comments WHERE job_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let deleted = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if deleted == 0 {
            return Err(StoreError::NotFound("Post"));
        }

        tx.commit().await?;
        info!("Deleted post {id}");
        Ok(())
    }

    async fn create_job_post(&self, job: NewJobPost) -> Result<JobPostRow, StoreError> {
        Ok(sqlx::query_as::<_, JobPostRow>(
            r#"
            INSERT INTO job_posts
                (id, title, company, description, location, work_type, experience_level, author_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&job.title)
        .bind(&job.company)
        .bind(&job.description)
        .bind(&job.location)
        .bind(job.work_type)
        .bind(job.experience_level)
        .bind(job.author_id)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn find_job_post(&self, id: Uuid) -> Result<Option<JobPostRow>, StoreError> {
        Ok(
            sqlx::query_as::<_, JobPostRow>("SELECT * FROM job_posts WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn list_job_posts(&self) -> Result<Vec<JobPostRow>, StoreError> {
        Ok(
            sqlx::query_as::<_, JobPostRow>("SELECT * FROM job_posts ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn job_posts_by_author(&self, author_id: Uuid) -> Result<Vec<JobPostRow>, StoreError> {
        Ok(sqlx::query_as::<_, JobPostRow>(
            "SELECT * FROM job_posts WHERE author_id = $1 ORDER BY created_at DESC",
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn update_job_post(
        &self,
        id: Uuid,
        changes: &JobPostChanges,
    ) -> Result<JobPostRow, StoreError> {
        sqlx::query_as::<_, JobPostRow>(
            r#"
            UPDATE job_posts
            SET title = COALESCE($2, title),
                company = COALESCE($3, company),
                description = COALESCE($4, description),
                location = COALESCE($5, location),
                work_type = COALESCE($6, work_type),
                experience_level = COALESCE($7, experience_level),
                is_active = COALESCE($8, is_active),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.company)
        .bind(&changes.description)
        .bind(&changes.location)
        .bind(changes.work_type)
        .bind(changes.experience_level)
        .bind(changes.is_active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound("Job post"))
    }

    async fn delete_job_post(&self, id: Uuid) -> Result<(), StoreError> {
        let deleted = sqlx::query("DELETE FROM job_posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        if deleted == 0 {
            return Err(StoreError::NotFound("Job post"));
        }
        info!("Deleted job post {id}");
        Ok(())
    }
}
