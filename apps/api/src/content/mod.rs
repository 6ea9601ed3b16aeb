//! Posts and job posts: creation, listing with author hydration, and
//! ownership-guarded updates and deletes.

use std::collections::HashMap;

use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::UserSummary;
use crate::store::{Store, UserStore};

pub mod handlers;
pub mod job_posts;
pub mod posts;

/// Resolves every distinct author in `author_ids` with a single store lookup.
pub async fn author_map(
    store: &dyn Store,
    author_ids: impl IntoIterator<Item = Uuid>,
) -> Result<HashMap<Uuid, UserSummary>, AppError> {
    let mut ids: Vec<Uuid> = author_ids.into_iter().collect();
    ids.sort_unstable();
    ids.dedup();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let users = store.users_by_ids(&ids).await?;
    Ok(users.into_iter().map(|u| (u.id, u)).collect())
}
