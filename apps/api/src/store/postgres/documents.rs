use async_trait::async_trait;
use uuid::Uuid;

use super::PgStore;
use crate::models::resume::{CoverLetterRow, ResumeRow};
use crate::store::{DocumentStore, StoreError};

#[async_trait]
impl DocumentStore for PgStore {
    async fn create_resume(&self, user_id: Uuid, file_url: &str) -> Result<ResumeRow, StoreError> {
        Ok(sqlx::query_as::<_, ResumeRow>(
            "INSERT INTO resumes (id, user_id, file_url) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(file_url)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn resumes_for_user(&self, user_id: Uuid) -> Result<Vec<ResumeRow>, StoreError> {
        Ok(sqlx::query_as::<_, ResumeRow>(
            "SELECT * FROM resumes WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn find_resume(&self, id: Uuid) -> Result<Option<ResumeRow>, StoreError> {
        Ok(
            sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn delete_resume(&self, id: Uuid) -> Result<(), StoreError> {
        let deleted = sqlx::query("DELETE FROM resumes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        if deleted == 0 {
            return Err(StoreError::NotFound("Resume"));
        }
        Ok(())
    }

    async fn create_cover_letter(
        &self,
        user_id: Uuid,
        file_url: &str,
    ) -> Result<CoverLetterRow, StoreError> {
        Ok(sqlx::query_as::<_, CoverLetterRow>(
            "INSERT INTO cover_letters (id, user_id, file_url) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(file_url)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn cover_letters_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<CoverLetterRow>, StoreError> {
        Ok(sqlx::query_as::<_, CoverLetterRow>(
            "SELECT * FROM cover_letters WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }
}
