//! Argon2 password hashing. Both operations are CPU-bound and run on the
//! blocking pool.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::errors::AppError;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Hashes a password into a PHC string (argon2id, random salt).
pub async fn hash_password(plain: &str) -> Result<String, AppError> {
    let plain = plain.to_owned();
    tokio::task::spawn_blocking(move || hash_password_sync(&plain))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in hashing: {e}")))?
}

pub async fn verify_password(plain: &str, stored_hash: &str) -> Result<bool, AppError> {
    let plain = plain.to_owned();
    let stored_hash = stored_hash.to_owned();
    tokio::task::spawn_blocking(move || verify_password_sync(&plain, &stored_hash))
        .await
        .map_err(|e| {
            AppError::Internal(anyhow::anyhow!("spawn_blocking failed in verification: {e}"))
        })?
}

fn hash_password_sync(plain: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("password hashing failed: {e}")))
}

fn verify_password_sync(plain: &str, stored_hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("stored password hash unreadable: {e}")))?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}
