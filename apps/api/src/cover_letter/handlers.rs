//! Axum route handler for cover-letter generation.

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::accounts::profile::get_profile;
use crate::auth::CallerIdentity;
use crate::cover_letter::{CandidateProfile, CoverLetterRequest};
use crate::errors::AppError;
use crate::extract::ApiJson;
use crate::models::user::ProfileRow;
use crate::state::AppState;
use crate::validation::{non_blank, require_fields};

const DEFAULT_TONE: &str = "professional";

#[derive(Debug, Deserialize)]
pub struct GenerateCoverLetterRequest {
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub tone: Option<String>,
    pub highlight: Option<String>,
    pub achievements: Option<String>,
    pub education: Option<String>,
}

fn experience_summary(years: i32) -> String {
    match years {
        0 => "No prior professional experience".to_string(),
        1 => "1 year of professional experience".to_string(),
        n => format!("{n} years of professional experience"),
    }
}

fn candidate_profile(
    caller: &CallerIdentity,
    profile: &ProfileRow,
    request: &GenerateCoverLetterRequest,
) -> CandidateProfile {
    let optional = |v: &Option<String>| non_blank(v.clone()).unwrap_or_default();
    CandidateProfile {
        name: non_blank(Some(profile.full_name.clone())).unwrap_or_else(|| caller.name.clone()),
        experience: experience_summary(profile.working_experience),
        skills: profile.skills.clone(),
        achievements: optional(&request.achievements),
        education: optional(&request.education),
        tone: non_blank(request.tone.clone()).unwrap_or_else(|| DEFAULT_TONE.to_string()),
        highlight: optional(&request.highlight),
    }
}

/// POST /api/generatecoverletter
///
/// Combines the role with the caller's profile and forwards it to the
/// generation service.
pub async fn handle_generate_cover_letter(
    State(state): State<AppState>,
    caller: CallerIdentity,
    ApiJson(request): ApiJson<GenerateCoverLetterRequest>,
) -> Result<Json<Value>, AppError> {
    require_fields(&[
        ("job_title", request.job_title.as_deref()),
        ("company_name", request.company_name.as_deref()),
    ])?;

    let profile = get_profile(state.store.as_ref(), caller.id).await?;
    let payload = CoverLetterRequest {
        job_title: request.job_title.as_deref().unwrap_or_default().trim().to_string(),
        company_name: request
            .company_name
            .as_deref()
            .unwrap_or_default()
            .trim()
            .to_string(),
        user_profile: candidate_profile(&caller, &profile, &request),
    };

    let letter = state
        .cover_letters
        .generate(&payload)
        .await
        .map_err(|e| AppError::CoverLetter(e.to_string()))?;
    info!(
        "Cover letter generated for {} ({} at {})",
        caller.id, payload.job_title, payload.company_name
    );

    Ok(Json(json!({ "success": true, "cover_letter": letter })))
}
