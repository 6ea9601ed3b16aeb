use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::{ProfilePatch, ProfileRow, LOCATION_PREFERENCES};
use crate::store::{Store, UserStore};

pub async fn get_profile(store: &dyn Store, user_id: Uuid) -> Result<ProfileRow, AppError> {
    store
        .find_profile(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".into()))
}

fn check_patch(patch: &ProfilePatch) -> Result<(), AppError> {
    if let Some(pref) = patch.loc_preference.as_deref() {
        if !LOCATION_PREFERENCES.contains(&pref) {
            return Err(AppError::Validation(format!(
                "loc_preference must be one of {}",
                LOCATION_PREFERENCES.join(", ")
            )));
        }
    }
    if patch.age.is_some_and(|age| age < 0) {
        return Err(AppError::Validation("age cannot be negative".into()));
    }
    if patch.working_experience.is_some_and(|years| years < 0) {
        return Err(AppError::Validation(
            "working_experience cannot be negative".into(),
        ));
    }
    Ok(())
}

/// Applies the allow-listed fields to the caller's profile.
pub async fn update_profile(
    store: &dyn Store,
    user_id: Uuid,
    patch: ProfilePatch,
) -> Result<ProfileRow, AppError> {
    check_patch(&patch)?;
    if store.find_profile(user_id).await?.is_none() {
        return Err(AppError::NotFound("Profile not found".into()));
    }
    Ok(store.update_profile(user_id, &patch).await?)
}
