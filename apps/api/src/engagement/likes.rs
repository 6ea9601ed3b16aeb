use tracing::info;
use uuid::Uuid;

use crate::auth::CallerIdentity;
use crate::errors::AppError;
use crate::models::engagement::LikeToggle;
use crate::store::{EngagementStore, Store};

/// Flips the caller's like on a post. Any caller may like any post,
/// including their own.
pub async fn toggle_like(
    store: &dyn Store,
    caller: &CallerIdentity,
    post_id: Uuid,
) -> Result<LikeToggle, AppError> {
    let toggle = store.toggle_like(caller.id, post_id).await?;
    info!(
        "User {} {} post {} (likes now {})",
        caller.id,
        if toggle.liked { "liked" } else { "unliked" },
        post_id,
        toggle.likes
    );
    Ok(toggle)
}
