use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Account row. Carries the password hash, so it is never serialized.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub reset_token: Option<String>,
    pub reset_token_expiry: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRow {
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// Public account view: `{id, name, email}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Minimal author view attached to comments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorView {
    pub id: Uuid,
    pub name: String,
}

impl From<&UserSummary> for AuthorView {
    fn from(user: &UserSummary) -> Self {
        AuthorView {
            id: user.id,
            name: user.name.clone(),
        }
    }
}

/// Profile joined with the owning account's email.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub email: String,
    pub full_name: String,
    pub bio: String,
    pub location: String,
    pub company: String,
    pub contact_email: String,
    pub age: i32,
    pub skills: Vec<String>,
    pub interests: Vec<String>,
    pub loc_preference: Option<String>,
    pub working_experience: i32,
    pub professional_headline: String,
    pub profile_pic_id: Option<String>,
    pub github_link: Option<String>,
    pub linkedin_link: Option<String>,
    pub twitter_link: Option<String>,
    pub website_link: Option<String>,
}

/// Allow-listed profile fields. Anything else in the request body is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfilePatch {
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub company: Option<String>,
    pub contact_email: Option<String>,
    pub age: Option<i32>,
    pub skills: Option<Vec<String>>,
    pub interests: Option<Vec<String>>,
    pub loc_preference: Option<String>,
    pub working_experience: Option<i32>,
    pub professional_headline: Option<String>,
    pub profile_pic_id: Option<String>,
    pub github_link: Option<String>,
    pub linkedin_link: Option<String>,
    pub twitter_link: Option<String>,
    pub website_link: Option<String>,
}

pub const LOCATION_PREFERENCES: &[&str] = &["remote", "on-site"];
