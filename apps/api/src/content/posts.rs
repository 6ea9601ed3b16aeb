use tracing::info;
use uuid::Uuid;

use crate::auth::ownership::owned_by;
use crate::auth::CallerIdentity;
use crate::content::author_map;
use crate::errors::AppError;
use crate::models::post::{NewPost, PostChanges, PostRow, PostWithAuthor};
use crate::store::{ContentStore, Store};
use crate::validation::non_blank;

async fn with_authors(
    store: &dyn Store,
    posts: Vec<PostRow>,
) -> Result<Vec<PostWithAuthor>, AppError> {
    let authors = author_map(store, posts.iter().map(|p| p.author_id)).await?;
    Ok(posts
        .into_iter()
        .map(|post| PostWithAuthor {
            author: authors.get(&post.author_id).cloned(),
            post,
        })
        .collect())
}

pub async fn create_post(
    store: &dyn Store,
    caller: &CallerIdentity,
    content: Option<String>,
    media_url: Option<String>,
    media_type: Option<String>,
) -> Result<PostWithAuthor, AppError> {
    let content =
        non_blank(content).ok_or_else(|| AppError::Validation("Content is required".into()))?;

    let post = store
        .create_post(NewPost {
            content,
            media_url: non_blank(media_url),
            media_type: non_blank(media_type),
            author_id: caller.id,
        })
        .await?;
    info!("Post {} created by {}", post.id, caller.id);

    let authors = author_map(store, [post.author_id]).await?;
    Ok(PostWithAuthor {
        author: authors.get(&post.author_id).cloned(),
        post,
    })
}

/// Every post, newest first.
pub async fn list_posts(store: &dyn Store) -> Result<Vec<PostWithAuthor>, AppError> {
    let posts = store.list_posts().await?;
    with_authors(store, posts).await
}

pub async fn my_posts(
    store: &dyn Store,
    caller: &CallerIdentity,
) -> Result<Vec<PostWithAuthor>, AppError> {
    let posts = store.posts_by_author(caller.id).await?;
    with_authors(store, posts).await
}

pub async fn update_post(
    store: &dyn Store,
    caller: &CallerIdentity,
    id: Uuid,
    changes: PostChanges,
) -> Result<PostRow, AppError> {
    if changes
        .content
        .as_deref()
        .is_some_and(|c| c.trim().is_empty())
    {
        return Err(AppError::Validation("Content cannot be empty".into()));
    }

    owned_by(store.find_post(id).await?, caller)?;
    Ok(store.update_post(id, &changes).await?)
}

pub async fn delete_post(
    store: &dyn Store,
    caller: &CallerIdentity,
    id: Uuid,
) -> Result<(), AppError> {
    owned_by(store.find_post(id).await?, caller)?;
    store.delete_post(id).await?;
    info!("Post {} deleted by {}", id, caller.id);
    Ok(())
}
