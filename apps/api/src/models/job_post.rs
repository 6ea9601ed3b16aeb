use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::user::UserSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "kebab-case")]
#[sqlx(type_name = "work_type", rename_all = "kebab-case")]
pub enum WorkType {
    OnSite,
    Remote,
    Hybrid,
}

impl FromStr for WorkType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "on-site" => Ok(WorkType::OnSite),
            "remote" => Ok(WorkType::Remote),
            "hybrid" => Ok(WorkType::Hybrid),
            other => Err(format!(
                "work_type must be one of on-site, remote, hybrid (got '{other}')"
            )),
        }
    }
}

impl fmt::Display for WorkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WorkType::OnSite => "on-site",
            WorkType::Remote => "remote",
            WorkType::Hybrid => "hybrid",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "experience_level", rename_all = "lowercase")]
pub enum ExperienceLevel {
    Entry,
    Mid,
    Expert,
}

impl FromStr for ExperienceLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "entry" => Ok(ExperienceLevel::Entry),
            "mid" => Ok(ExperienceLevel::Mid),
            "expert" => Ok(ExperienceLevel::Expert),
            other => Err(format!(
                "experience_level must be one of entry, mid, expert (got '{other}')"
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobPostRow {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub description: String,
    pub location: String,
    pub work_type: WorkType,
    pub experience_level: ExperienceLevel,
    pub is_active: bool,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobPostWithAuthor {
    #[serde(flatten)]
    pub job: JobPostRow,
    pub author: Option<UserSummary>,
}

#[derive(Debug, Clone)]
pub struct NewJobPost {
    pub title: String,
    pub company: String,
    pub description: String,
    pub location: String,
    pub work_type: WorkType,
    pub experience_level: ExperienceLevel,
    pub author_id: Uuid,
}

#[derive(Debug, Clone, Default)]
pub struct JobPostChanges {
    pub title: Option<String>,
    pub company: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub work_type: Option<WorkType>,
    pub experience_level: Option<ExperienceLevel>,
    pub is_active: Option<bool>,
}
