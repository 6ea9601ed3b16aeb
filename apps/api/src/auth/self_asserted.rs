use crate::auth::{CallerIdentity, IdentityExtractor};
use crate::errors::AppError;

/// Trusts `{id, name, email}` JSON placed straight in the bearer slot.
/// Provides no authentication guarantee; only for local development.
pub struct SelfAssertedIdentity;

impl IdentityExtractor for SelfAssertedIdentity {
    fn issue(&self, identity: &CallerIdentity) -> Result<String, AppError> {
        serde_json::to_string(identity)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("identity encoding failed: {e}")))
    }

    fn extract(&self, credential: &str) -> Result<CallerIdentity, AppError> {
        serde_json::from_str(credential)
            .map_err(|_| AppError::Validation("Invalid JSON in Bearer payload".into()))
    }
}
