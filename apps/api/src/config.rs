use anyhow::{bail, Context, Result};

/// How bearer credentials are turned into a caller identity.
/// Exactly one mode is active per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// HS256 token signed with `JWT_SECRET`, carrying `{id, name, email}`.
    Jwt,
    /// The bearer slot holds the raw `{id, name, email}` JSON. No signature.
    SelfAsserted,
}

impl AuthMode {
    fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "jwt" => Ok(AuthMode::Jwt),
            "self_asserted" | "self-asserted" => Ok(AuthMode::SelfAsserted),
            other => bail!("AUTH_MODE must be 'jwt' or 'self_asserted', got '{other}'"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub auth_mode: AuthMode,
    pub jwt_secret: Option<String>,
    pub token_ttl_hours: i64,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub cover_letter_api_url: String,
    pub reset_link_base: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let auth_mode = match std::env::var("AUTH_MODE") {
            Ok(raw) => AuthMode::parse(&raw)?,
            Err(_) => AuthMode::Jwt,
        };
        let jwt_secret = match auth_mode {
            AuthMode::Jwt => Some(require_env("JWT_SECRET")?),
            AuthMode::SelfAsserted => std::env::var("JWT_SECRET").ok(),
        };

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            auth_mode,
            jwt_secret,
            token_ttl_hours: std::env::var("TOKEN_TTL_HOURS")
                .unwrap_or_else(|_| "1".to_string())
                .parse::<i64>()
                .context("TOKEN_TTL_HOURS must be a whole number of hours")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            cover_letter_api_url: require_env("COVER_LETTER_API_URL")?,
            reset_link_base: std::env::var("RESET_LINK_BASE")
                .unwrap_or_else(|_| "http://localhost:5173/reset-password".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
