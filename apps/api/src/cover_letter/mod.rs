/// Cover letter client: the single point of entry for calls to the external
/// cover-letter generation service.
///
/// The service is opaque: it takes a job title, company and candidate
/// profile and returns the letter text. No other module talks to it.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod handlers;

const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum CoverLetterError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("Service returned no letter text")]
    EmptyContent,
}

/// Candidate details sent alongside the role.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CandidateProfile {
    pub name: String,
    pub experience: String,
    pub skills: Vec<String>,
    pub achievements: String,
    pub education: String,
    pub tone: String,
    pub highlight: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CoverLetterRequest {
    pub job_title: String,
    pub company_name: String,
    pub user_profile: CandidateProfile,
}

#[derive(Debug, Deserialize)]
struct ServiceError {
    #[serde(alias = "error")]
    message: String,
}

/// Pluggable generator. Carried in `AppState` as `Arc<dyn CoverLetterGenerator>`.
#[async_trait]
pub trait CoverLetterGenerator: Send + Sync {
    async fn generate(&self, request: &CoverLetterRequest) -> Result<String, CoverLetterError>;
}

/// HTTP client for the deployed generation endpoint.
/// Retries on 429 and 5xx with exponential backoff.
#[derive(Clone)]
pub struct HttpCoverLetterClient {
    client: Client,
    endpoint: String,
}

impl HttpCoverLetterClient {
    pub fn new(endpoint: String) -> anyhow::Result<Self> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()?,
            endpoint,
        })
    }
}

#[async_trait]
impl CoverLetterGenerator for HttpCoverLetterClient {
    async fn generate(&self, request: &CoverLetterRequest) -> Result<String, CoverLetterError> {
        let mut last_error: Option<CoverLetterError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "Cover letter call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self.client.post(&self.endpoint).json(request).send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(CoverLetterError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Cover letter service returned {}: {}", status, body);
                last_error = Some(CoverLetterError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ServiceError>(&body)
                    .map(|e| e.message)
                    .unwrap_or(body);
                return Err(CoverLetterError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let body: Value = response.json().await?;
            debug!("Cover letter generated for {}", request.company_name);
            return letter_text(&body).ok_or(CoverLetterError::EmptyContent);
        }

        Err(last_error.unwrap_or(CoverLetterError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

/// The service answers either with a bare JSON string or with an object
/// carrying the letter under `text` (optionally nested in `output`).
fn letter_text(body: &Value) -> Option<String> {
    let text = match body {
        Value::String(s) => Some(s.as_str()),
        Value::Object(map) => map
            .get("text")
            .and_then(Value::as_str)
            .or_else(|| map.get("output").and_then(|o| o.get("text")).and_then(Value::as_str)),
        _ => None,
    }?;
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
