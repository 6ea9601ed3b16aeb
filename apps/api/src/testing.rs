//! Shared fixtures for router-level tests: an `AppState` wired to the
//! in-memory store, an in-memory blob store and a canned cover-letter
//! generator, plus request helpers that drive the real router.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
};
use bytes::Bytes;
use serde_json::Value;
use tower::ServiceExt;

use crate::auth::jwt::JwtIdentity;
use crate::auth::{CallerIdentity, IdentityExtractor};
use crate::config::{AuthMode, Config};
use crate::cover_letter::{CoverLetterError, CoverLetterGenerator, CoverLetterRequest};
use crate::documents::storage::BlobStore;
use crate::errors::AppError;
use crate::models::user::UserRow;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::memory::MemoryStore;
use crate::store::{NewUser, UserStore};

pub const TEST_SECRET: &str = "test-secret-do-not-use";
pub const CANNED_LETTER: &str = "Dear Acme hiring team,";
const SEEDED_PASSWORD_HASH: &str = "not-a-real-hash";

#[derive(Default)]
pub struct MemoryBlobStore {
    objects: Mutex<HashMap<String, (Bytes, String)>>,
}

impl MemoryBlobStore {
    pub fn get(&self, key: &str) -> Option<Bytes> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .map(|(bytes, _)| bytes.clone())
    }

    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<(), AppError> {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), (body, content_type.to_string()));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }
}

/// Returns `CANNED_LETTER` and remembers every request it was given.
#[derive(Default)]
pub struct StubGenerator {
    pub requests: Mutex<Vec<CoverLetterRequest>>,
    pub fail: bool,
}

#[async_trait]
impl CoverLetterGenerator for StubGenerator {
    async fn generate(&self, request: &CoverLetterRequest) -> Result<String, CoverLetterError> {
        self.requests.lock().unwrap().push(request.clone());
        if self.fail {
            return Err(CoverLetterError::Api {
                status: 503,
                message: "upstream unavailable".into(),
            });
        }
        Ok(CANNED_LETTER.to_string())
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://unused".into(),
        auth_mode: AuthMode::Jwt,
        jwt_secret: Some(TEST_SECRET.into()),
        token_ttl_hours: 1,
        s3_bucket: "test-bucket".into(),
        s3_endpoint: "http://localhost:9000".into(),
        aws_access_key_id: "test".into(),
        aws_secret_access_key: "test".into(),
        cover_letter_api_url: "http://localhost:0/generate".into(),
        reset_link_base: "http://localhost:5173/reset-password".into(),
        port: 0,
        rust_log: "debug".into(),
    }
}

pub struct TestApp {
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub blobs: Arc<MemoryBlobStore>,
    pub generator: Arc<StubGenerator>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_generator(StubGenerator::default())
    }

    pub fn with_generator(generator: StubGenerator) -> Self {
        let store = Arc::new(MemoryStore::new());
        let blobs = Arc::new(MemoryBlobStore::default());
        let generator = Arc::new(generator);
        let config = test_config();
        let state = AppState {
            store: store.clone(),
            identity: Arc::new(JwtIdentity::new(TEST_SECRET, config.token_ttl_hours)),
            blobs: blobs.clone(),
            cover_letters: generator.clone(),
            config,
        };
        Self {
            state,
            store,
            blobs,
            generator,
        }
    }

    /// Inserts an account directly, skipping password hashing, and returns
    /// it with a valid bearer token.
    pub async fn seed_user(&self, name: &str, email: &str) -> (UserRow, String) {
        let user = self
            .store
            .create_user_with_profile(NewUser {
                name: name.into(),
                email: email.into(),
                password_hash: SEEDED_PASSWORD_HASH.into(),
            })
            .await
            .unwrap();
        let token = self
            .state
            .identity
            .issue(&CallerIdentity::from(&user))
            .unwrap();
        (user, token)
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = build_router(self.state.clone())
            .oneshot(request)
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, body)
    }

    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.call(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.call(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.call(Method::PATCH, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.call(Method::DELETE, uri, Some(token), None).await
    }

    /// Multipart upload with one file part.
    pub async fn upload(
        &self,
        uri: &str,
        token: &str,
        field: &str,
        file_name: &str,
        contents: &[u8],
    ) -> (StatusCode, Value) {
        const BOUNDARY: &str = "raabta-test-boundary";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: application/pdf\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(contents);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }
}
