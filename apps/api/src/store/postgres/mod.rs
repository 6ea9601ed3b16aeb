//! Postgres-backed store. Multi-row operations run inside one transaction.

use sqlx::PgPool;

use crate::store::StoreError;

mod content;
mod documents;
mod engagement;
mod users;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Maps a unique-constraint violation to `Duplicate`, anything else to `Database`.
fn map_unique(err: sqlx::Error, what: &'static str) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Duplicate(what),
        _ => StoreError::Database(err),
    }
}
