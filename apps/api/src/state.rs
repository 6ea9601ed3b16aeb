use std::sync::Arc;

use crate::auth::IdentityExtractor;
use crate::config::Config;
use crate::cover_letter::CoverLetterGenerator;
use crate::documents::storage::BlobStore;
use crate::store::Store;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    /// One credential strategy per deployment, selected by `AUTH_MODE`.
    pub identity: Arc<dyn IdentityExtractor>,
    /// Resume and cover-letter files. S3/MinIO in production.
    pub blobs: Arc<dyn BlobStore>,
    pub cover_letters: Arc<dyn CoverLetterGenerator>,
    pub config: Config,
}
