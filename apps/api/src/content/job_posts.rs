use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::auth::ownership::owned_by;
use crate::auth::CallerIdentity;
use crate::content::author_map;
use crate::errors::AppError;
use crate::models::job_post::{
    ExperienceLevel, JobPostChanges, JobPostRow, JobPostWithAuthor, NewJobPost, WorkType,
};
use crate::store::{ContentStore, Store};
use crate::validation::{non_blank, require_fields};

/// Job fields as they arrive on the wire. Enums stay strings until parsed
/// so an unknown value is a 400 with a readable message.
#[derive(Debug, Default, Deserialize)]
pub struct JobPostFields {
    pub title: Option<String>,
    pub company: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub work_type: Option<String>,
    pub experience_level: Option<String>,
    pub is_active: Option<bool>,
}

fn parse_work_type(raw: &str) -> Result<WorkType, AppError> {
    raw.trim().parse().map_err(AppError::Validation)
}

fn parse_experience_level(raw: &str) -> Result<ExperienceLevel, AppError> {
    raw.trim().parse().map_err(AppError::Validation)
}

async fn with_authors(
    store: &dyn Store,
    jobs: Vec<JobPostRow>,
) -> Result<Vec<JobPostWithAuthor>, AppError> {
    let authors = author_map(store, jobs.iter().map(|j| j.author_id)).await?;
    Ok(jobs
        .into_iter()
        .map(|job| JobPostWithAuthor {
            author: authors.get(&job.author_id).cloned(),
            job,
        })
        .collect())
}

pub async fn create_job_post(
    store: &dyn Store,
    caller: &CallerIdentity,
    fields: JobPostFields,
) -> Result<JobPostRow, AppError> {
    require_fields(&[
        ("title", fields.title.as_deref()),
        ("company", fields.company.as_deref()),
        ("description", fields.description.as_deref()),
        ("location", fields.location.as_deref()),
        ("work_type", fields.work_type.as_deref()),
        ("experience_level", fields.experience_level.as_deref()),
    ])?;

    let work_type = parse_work_type(fields.work_type.as_deref().unwrap_or_default())?;
    let experience_level =
        parse_experience_level(fields.experience_level.as_deref().unwrap_or_default())?;

    let job = store
        .create_job_post(NewJobPost {
            title: fields.title.unwrap_or_default().trim().to_string(),
            company: fields.company.unwrap_or_default().trim().to_string(),
            description: fields.description.unwrap_or_default().trim().to_string(),
            location: fields.location.unwrap_or_default().trim().to_string(),
            work_type,
            experience_level,
            author_id: caller.id,
        })
        .await?;
    info!("Job post {} created by {}", job.id, caller.id);
    Ok(job)
}

/// Every job post, newest first.
pub async fn list_job_posts(store: &dyn Store) -> Result<Vec<JobPostWithAuthor>, AppError> {
    let jobs = store.list_job_posts().await?;
    with_authors(store, jobs).await
}

pub async fn my_job_posts(
    store: &dyn Store,
    caller: &CallerIdentity,
) -> Result<Vec<JobPostRow>, AppError> {
    Ok(store.job_posts_by_author(caller.id).await?)
}

fn job_changes(fields: JobPostFields) -> Result<JobPostChanges, AppError> {
    let blank = [
        ("title", &fields.title),
        ("company", &fields.company),
        ("description", &fields.description),
        ("location", &fields.location),
    ]
    .into_iter()
    .find(|(_, v)| v.as_deref().is_some_and(|s| s.trim().is_empty()));
    if let Some((name, _)) = blank {
        return Err(AppError::Validation(format!("{name} cannot be empty")));
    }

    Ok(JobPostChanges {
        work_type: fields.work_type.as_deref().map(parse_work_type).transpose()?,
        experience_level: fields
            .experience_level
            .as_deref()
            .map(parse_experience_level)
            .transpose()?,
        title: non_blank(fields.title),
        company: non_blank(fields.company),
        description: non_blank(fields.description),
        location: non_blank(fields.location),
        is_active: fields.is_active,
    })
}

pub async fn update_job_post(
    store: &dyn Store,
    caller: &CallerIdentity,
    id: Uuid,
    fields: JobPostFields,
) -> Result<JobPostRow, AppError> {
    let changes = job_changes(fields)?;
    owned_by(store.find_job_post(id).await?, caller)?;
    Ok(store.update_job_post(id, &changes).await?)
}

pub async fn delete_job_post(
    store: &dyn Store,
    caller: &CallerIdentity,
    id: Uuid,
) -> Result<(), AppError> {
    owned_by(store.find_job_post(id).await?, caller)?;
    store.delete_job_post(id).await?;
    info!("Job post {} deleted by {}", id, caller.id);
    Ok(())
}
