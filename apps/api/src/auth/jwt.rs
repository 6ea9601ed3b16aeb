use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{CallerIdentity, IdentityExtractor};
use crate::errors::AppError;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// HS256 tokens signed with the server secret.
pub struct JwtIdentity {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtIdentity {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours),
        }
    }

    fn sign(&self, claims: &Claims) -> Result<String, AppError> {
        encode(&Header::default(), claims, &self.encoding)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT generation failed: {e}")))
    }
}

impl IdentityExtractor for JwtIdentity {
    fn issue(&self, identity: &CallerIdentity) -> Result<String, AppError> {
        let now = Utc::now();
        self.sign(&Claims {
            id: identity.id,
            name: identity.name.clone(),
            email: identity.email.clone(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        })
    }

    fn extract(&self, credential: &str) -> Result<CallerIdentity, AppError> {
        let data = decode::<Claims>(credential, &self.decoding, &Validation::default()).map_err(
            |e| match e.kind() {
                ErrorKind::ExpiredSignature => AppError::Unauthorized("Token expired".into()),
                _ => AppError::Unauthorized("Invalid token".into()),
            },
        )?;

        Ok(CallerIdentity {
            id: data.claims.id,
            name: data.claims.name,
            email: data.claims.email,
        })
    }
}
