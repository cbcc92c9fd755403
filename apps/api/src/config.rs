use anyhow::{Context, Result};

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub identity_url: String,
    pub identity_public_key: String,
    /// Tailoring workflow endpoint. Optional at startup; tailoring requests
    /// fail with a configuration error while neither backend is configured.
    pub tailor_webhook_url: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            identity_url: require_env("IDENTITY_URL")?,
            identity_public_key: require_env("IDENTITY_PUBLIC_KEY")?,
            tailor_webhook_url: optional_env("TAILOR_WEBHOOK_URL"),
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            max_upload_bytes: match optional_env("MAX_UPLOAD_BYTES") {
                Some(raw) => raw
                    .parse::<usize>()
                    .context("MAX_UPLOAD_BYTES must be a positive integer")?,
                None => DEFAULT_MAX_UPLOAD_BYTES,
            },
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

/// Blank values count as unset so an empty `.env` entry does not enable a backend.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Config {
            database_url: "postgres://localhost/jobfit_test".to_string(),
            identity_url: "http://identity.test".to_string(),
            identity_public_key: "public-test-key".to_string(),
            tailor_webhook_url: None,
            anthropic_api_key: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}
