//! Ownership guard applied before every mutation of an owned resource.
//!
//! Order matters: a missing resource is reported as 404 before the owner is
//! compared, so a 403 never confirms that an id exists for someone else.

use uuid::Uuid;

use crate::auth::CallerIdentity;
use crate::errors::AppError;
use crate::models::engagement::CommentRow;
use crate::models::job_post::JobPostRow;
use crate::models::post::PostRow;
use crate::models::resume::ResumeRow;

pub trait Owned {
    const KIND: &'static str;
    fn owner_id(&self) -> Uuid;
}

impl Owned for PostRow {
    const KIND: &'static str = "Post";
    fn owner_id(&self) -> Uuid {
        self.author_id
    }
}

impl Owned for JobPostRow {
    const KIND: &'static str = "Job post";
    fn owner_id(&self) -> Uuid {
        self.author_id
    }
}

impl Owned for CommentRow {
    const KIND: &'static str = "Comment";
    fn owner_id(&self) -> Uuid {
        self.author_id
    }
}

impl Owned for ResumeRow {
    const KIND: &'static str = "Resume";
    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

pub fn assert_owner<R: Owned>(resource: &R, caller: &CallerIdentity) -> Result<(), AppError> {
    if resource.owner_id() == caller.id {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// 404 if the lookup came back empty, then 403 unless `caller` owns it.
pub fn owned_by<R: Owned>(resource: Option<R>, caller: &CallerIdentity) -> Result<R, AppError> {
    let resource = resource.ok_or_else(|| AppError::NotFound(format!("{} not found", R::KIND)))?;
    assert_owner(&resource, caller)?;
    Ok(resource)
}
