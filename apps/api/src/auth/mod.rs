//! Bearer-token authentication boundary.
//!
//! Every protected handler takes an [`AuthUser`] extractor. The token is
//! verified against the identity service on each request; nothing is cached
//! and any failure is reported as 401 with no partial trust.

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing or malformed bearer credential")]
    MalformedCredential,

    #[error("identity service rejected the token (status {0})")]
    Rejected(u16),

    #[error("identity service unreachable: {0}")]
    Http(#[from] reqwest::Error),
}

/// Identity as reported by the identity service.
#[derive(Debug, Clone, Deserialize)]
pub struct ExternalIdentity {
    /// Stable subject id; the key for the internal user record.
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn resolve(&self, token: &str) -> Result<ExternalIdentity, AuthError>;
}

/// Verifies tokens with a GoTrue-compatible identity service
/// (`GET {base}/auth/v1/user`).
#[derive(Clone)]
pub struct HttpIdentityVerifier {
    client: Client,
    user_endpoint: String,
    public_key: String,
}

impl HttpIdentityVerifier {
    pub fn new(client: Client, base_url: &str, public_key: String) -> Self {
        Self {
            client,
            user_endpoint: format!("{}/auth/v1/user", base_url.trim_end_matches('/')),
            public_key,
        }
    }
}

#[async_trait]
impl IdentityVerifier for HttpIdentityVerifier {
    async fn resolve(&self, token: &str) -> Result<ExternalIdentity, AuthError> {
        let response = self
            .client
            .get(&self.user_endpoint)
            .header("apikey", &self.public_key)
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::Rejected(status.as_u16()));
        }

        Ok(response.json::<ExternalIdentity>().await?)
    }
}

/// Pulls the token out of an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: &str) -> Result<&str, AuthError> {
    let token = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or(AuthError::MalformedCredential)?;
    if token.is_empty() || token.contains(char::is_whitespace) {
        return Err(AuthError::MalformedCredential);
    }
    Ok(token)
}

/// The verified caller of a request.
#[derive(Debug, Clone)]
pub struct AuthUser(pub ExternalIdentity);

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let token = bearer_token(header).map_err(|e| {
            debug!("Rejecting request: {e}");
            AppError::Unauthorized
        })?;

        match state.verifier.resolve(token).await {
            Ok(identity) => Ok(AuthUser(identity)),
            Err(e) => {
                warn!("Token verification failed: {e}");
                Err(AppError::Unauthorized)
            }
        }
    }
}
