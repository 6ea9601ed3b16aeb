use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use super::{map_unique, PgStore};
use crate::models::user::{ProfilePatch, ProfileRow, UserRow, UserSummary};
use crate::store::{NewUser, StoreError, UserChanges, UserStore};

const PROFILE_SELECT: &str = r#"
    SELECT p.id, p.user_id, u.email, p.full_name, p.bio, p.location, p.company,
           p.contact_email, p.age, p.skills, p.interests, p.loc_preference,
           p.working_experience, p.professional_headline, p.profile_pic_id,
           p.github_link, p.linkedin_link, p.twitter_link, p.website_link
    FROM profiles p
    JOIN users u ON u.id = p.user_id
    WHERE p.user_id = $1
"#;

#[async_trait]
impl UserStore for PgStore {
    async fn create_user_with_profile(&self, user: NewUser) -> Result<UserRow, StoreError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, name, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_unique(e, "Email"))?;

        // Default profile: everything empty except the name and contact email.
        sqlx::query(
            r#"
            INSERT INTO profiles (id, user_id, full_name, contact_email)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(row.id)
        .bind(&row.name)
        .bind(&row.email)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        info!("Created user {} with default profile", row.id);
        Ok(row)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<UserRow>, StoreError> {
        Ok(
            sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRow>, StoreError> {
        Ok(
            sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn list_users(&self) -> Result<Vec<UserSummary>, StoreError> {
        Ok(sqlx::query_as::<_, UserSummary>(
            "SELECT id, name, email FROM users ORDER BY created_at ASC",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn users_by_ids(&self, ids: &[Uuid]) -> Result<Vec<UserSummary>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(sqlx::query_as::<_, UserSummary>(
            "SELECT id, name, email FROM users WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<UserRow, StoreError> {
        sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                password_hash = COALESCE($4, password_hash),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.name)
        .bind(changes.email)
        .bind(changes.password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_unique(e, "Email"))?
        .ok_or(StoreError::NotFound("User"))
    }

    async fn delete_user(&self, id: Uuid) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        // Comments reference posts without a foreign key, so comments left by
        // other users on this user's posts are removed by hand.
        sqlx::query("DELETE FROM comments WHERE job_id IN (SELECT id FROM posts WHERE author_id = $1)")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        // Likes cascade with the account; keep the counters they fed in step.
        sqlx::query(
            r#"
            UPDATE posts SET likes = GREATEST(likes - 1, 0)
            WHERE id IN (SELECT job_id FROM likes WHERE user_id = $1)
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if deleted == 0 {
            return Err(StoreError::NotFound("User"));
        }

        tx.commit().await?;
        info!("Deleted user {id}");
        Ok(())
    }

    async fn set_reset_token(
        &self,
        id: Uuid,
        token: &str,
        expiry: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "UPDATE users SET reset_token = $2, reset_token_expiry = $3, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(token)
        .bind(expiry)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_user_by_reset_token(&self, token: &str) -> Result<Option<UserRow>, StoreError> {
        Ok(
            sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE reset_token = $1")
                .bind(token)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn reset_password(&self, id: Uuid, password_hash: &str) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2, reset_token = NULL, reset_token_expiry = NULL, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_profile(&self, user_id: Uuid) -> Result<Option<ProfileRow>, StoreError> {
        Ok(sqlx::query_as::<_, ProfileRow>(PROFILE_SELECT)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        patch: &ProfilePatch,
    ) -> Result<ProfileRow, StoreError> {
        let updated = sqlx::query(
            r#"
            UPDATE profiles
            SET full_name = COALESCE($2, full_name),
                bio = COALESCE($3, bio),
                location = COALESCE($4, location),
                company = COALESCE($5, company),
                contact_email = COALESCE($6, contact_email),
                age = COALESCE($7, age),
                skills = COALESCE($8, skills),
                interests = COALESCE($9, interests),
                loc_preference = COALESCE($10, loc_preference),
                working_experience = COALESCE($11, working_experience),
                professional_headline = COALESCE($12, professional_headline),
                profile_pic_id = COALESCE($13, profile_pic_id),
                github_link = COALESCE($14, github_link),
                linkedin_link = COALESCE($15, linkedin_link),
                twitter_link = COALESCE($16, twitter_link),
                website_link = COALESCE($17, website_link)
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .bind(&patch.full_name)
        .bind(&patch.bio)
        .bind(&patch.location)
        .bind(&patch.company)
        .bind(&patch.contact_email)
        .bind(patch.age)
        .bind(&patch.skills)
        .bind(&patch.interests)
        .bind(&patch.loc_preference)
        .bind(patch.working_experience)
        .bind(&patch.professional_headline)
        .bind(&patch.profile_pic_id)
        .bind(&patch.github_link)
        .bind(&patch.linkedin_link)
        .bind(&patch.twitter_link)
        .bind(&patch.website_link)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if updated == 0 {
            return Err(StoreError::NotFound("Profile"));
        }

        self.find_profile(user_id)
            .await?
            .ok_or(StoreError::NotFound("Profile"))
    }
}
