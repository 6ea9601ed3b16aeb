//! Account lifecycle: register, login, self-service updates, password reset.

use chrono::{Duration, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::auth::password::{hash_password, verify_password, MIN_PASSWORD_LEN};
use crate::auth::{CallerIdentity, IdentityExtractor};
use crate::documents::storage::BlobStore;
use crate::errors::AppError;
use crate::models::user::UserSummary;
use crate::store::{DocumentStore, NewUser, Store, StoreError, UserChanges, UserStore};
use crate::validation::{non_blank, require_fields};

const RESET_TOKEN_TTL_MINUTES: i64 = 60;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthSuccess {
    pub user: UserSummary,
    pub token: String,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn check_password_length(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long."
        )));
    }
    Ok(())
}

/// Creates the account and its default profile, then issues a credential.
pub async fn register(
    store: &dyn Store,
    identity: &dyn IdentityExtractor,
    req: RegisterRequest,
) -> Result<AuthSuccess, AppError> {
    require_fields(&[
        ("name", req.name.as_deref()),
        ("email", req.email.as_deref()),
        ("password", req.password.as_deref()),
    ])?;
    let name = req.name.unwrap_or_default();
    let email = req.email.unwrap_or_default();
    let password = req.password.unwrap_or_default();
    check_password_length(&password)?;

    let email = normalize_email(&email);
    if store.find_user_by_email(&email).await?.is_some() {
        warn!("Registration rejected: email already registered");
        return Err(AppError::Validation(
            "Email already registered. Try another email.".into(),
        ));
    }

    let user = store
        .create_user_with_profile(NewUser {
            name: name.trim().to_string(),
            email,
            password_hash: hash_password(&password).await?,
        })
        .await
        .map_err(|e| match e {
            StoreError::Duplicate(_) => {
                AppError::Validation("Email already registered. Try another email.".into())
            }
            other => other.into(),
        })?;

    let token = identity.issue(&CallerIdentity::from(&user))?;
    info!("Registered user {}", user.id);
    Ok(AuthSuccess {
        user: user.summary(),
        token,
    })
}

pub async fn login(
    store: &dyn Store,
    identity: &dyn IdentityExtractor,
    req: LoginRequest,
) -> Result<AuthSuccess, AppError> {
    let (Some(email), Some(password)) = (non_blank(req.email), req.password.filter(|p| !p.is_empty()))
    else {
        return Err(AppError::Validation(
            "Please provide email and password".into(),
        ));
    };

    let user = store
        .find_user_by_email(&normalize_email(&email))
        .await?
        .ok_or_else(|| AppError::NotFound("No user found with this email".into()))?;

    if !verify_password(&password, &user.password_hash).await? {
        return Err(AppError::Unauthorized("Invalid password".into()));
    }

    let token = identity.issue(&CallerIdentity::from(&user))?;
    Ok(AuthSuccess {
        user: user.summary(),
        token,
    })
}

pub async fn list_users(store: &dyn Store) -> Result<Vec<UserSummary>, AppError> {
    Ok(store.list_users().await?)
}

/// Updates the caller's own account and re-issues a credential carrying the
/// new name/email.
pub async fn update_user(
    store: &dyn Store,
    identity: &dyn IdentityExtractor,
    caller: &CallerIdentity,
    req: UpdateUserRequest,
) -> Result<AuthSuccess, AppError> {
    let blank = |v: &Option<String>| v.as_deref().is_some_and(|s| s.trim().is_empty());
    if blank(&req.name) || blank(&req.email) || blank(&req.password) {
        return Err(AppError::Validation("Fields cannot be empty".into()));
    }

    let password_hash = match req.password.as_deref() {
        Some(password) => {
            check_password_length(password)?;
            Some(hash_password(password).await?)
        }
        None => None,
    };

    if store.find_user(caller.id).await?.is_none() {
        return Err(AppError::NotFound("No user found with this ID".into()));
    }

    let user = store
        .update_user(
            caller.id,
            UserChanges {
                name: req.name.map(|n| n.trim().to_string()),
                email: req.email.as_deref().map(normalize_email),
                password_hash,
            },
        )
        .await
        .map_err(|e| match e {
            StoreError::Duplicate(_) => {
                AppError::Validation("Email already registered. Try another email.".into())
            }
            other => other.into(),
        })?;

    let token = identity.issue(&CallerIdentity::from(&user))?;
    Ok(AuthSuccess {
        user: user.summary(),
        token,
    })
}

/// Deletes an account. Only the account itself may do this.
///
/// Resume and cover-letter rows go with the user; their blobs are removed
/// afterwards. A blob that fails to delete is logged and left behind.
pub async fn delete_user(
    store: &dyn Store,
    blobs: &dyn BlobStore,
    caller: &CallerIdentity,
    user_id: Uuid,
) -> Result<(), AppError> {
    if store.find_user(user_id).await?.is_none() {
        return Err(AppError::NotFound("No user found with this ID".into()));
    }
    if user_id != caller.id {
        return Err(AppError::Forbidden);
    }

    let mut keys: Vec<String> = store
        .resumes_for_user(user_id)
        .await?
        .into_iter()
        .map(|r| r.file_url)
        .collect();
    keys.extend(
        store
            .cover_letters_for_user(user_id)
            .await?
            .into_iter()
            .map(|c| c.file_url),
    );

    store.delete_user(user_id).await?;

    for key in &keys {
        if let Err(e) = blobs.delete(key).await {
            warn!(%key, "Orphaned blob after deleting user {user_id}: {e}");
        }
    }
    info!("Deleted user {user_id} and {} stored document(s)", keys.len());
    Ok(())
}

/// Where reset links go. The bundled hook only logs; swapping in mail
/// delivery does not touch the reset flow.
pub fn deliver_reset_link(email: &str, link: &str) {
    debug!(%email, %link, "Password reset link issued");
}

fn reset_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

pub async fn request_password_reset(
    store: &dyn Store,
    email: Option<String>,
    reset_link_base: &str,
) -> Result<(), AppError> {
    let email = non_blank(email).ok_or_else(|| AppError::Validation("Email is required".into()))?;
    let user = store
        .find_user_by_email(&normalize_email(&email))
        .await?
        .ok_or_else(|| AppError::NotFound("Email not found.".into()))?;

    let token = reset_token();
    let expiry = Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES);
    store.set_reset_token(user.id, &token, expiry).await?;

    let link = format!("{}/{}", reset_link_base.trim_end_matches('/'), token);
    deliver_reset_link(&user.email, &link);
    info!("Password reset requested for user {}", user.id);
    Ok(())
}

pub async fn reset_password(
    store: &dyn Store,
    token: &str,
    new_password: Option<String>,
) -> Result<(), AppError> {
    let new_password = new_password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::Validation("Missing required fields: newPassword".into()))?;

    let user = store
        .find_user_by_reset_token(token)
        .await?
        .filter(|u| u.reset_token_expiry.is_some_and(|exp| exp > Utc::now()))
        .ok_or_else(|| AppError::Validation("Invalid or expired token.".into()))?;

    check_password_length(&new_password)?;
    store
        .reset_password(user.id, &hash_password(&new_password).await?)
        .await?;
    info!("Password reset completed for user {}", user.id);
    Ok(())
}
