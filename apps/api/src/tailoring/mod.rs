//! Tailoring invoker: a one-shot call to an external AI backend that rewrites a
//! resume for a job description.
//!
//! Two backends implement [`Tailor`]: the workflow webhook (preferred) and a
//! direct LLM call. Both must produce the same validated payload; a response
//! missing either field is an upstream failure and nothing is persisted.

pub mod llm;
mod prompts;
pub mod webhook;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::Config;
use crate::llm_client::{LlmClient, LlmError};

pub use llm::LlmTailor;
pub use webhook::WebhookTailor;

/// Field names shared by both backends.
pub const TAILORED_FIELD: &str = "tailoredResume";
pub const ANALYSIS_FIELD: &str = "analysis";

#[derive(Debug, Error)]
pub enum TailorError {
    #[error("upstream returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("upstream request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("LLM call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("invalid upstream response: {0}")]
    InvalidResponse(String),
}

/// Validated tailoring result.
#[derive(Debug, Clone, PartialEq)]
pub struct TailoringOutcome {
    pub tailored: String,
    /// Structure is owned by the upstream workflow; stored as opaque JSON.
    pub analysis: Value,
}

impl TailoringOutcome {
    pub fn from_payload(payload: &Value) -> Result<Self, TailorError> {
        let object = payload
            .as_object()
            .ok_or_else(|| TailorError::InvalidResponse("expected a JSON object".to_string()))?;

        let tailored = object
            .get(TAILORED_FIELD)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| {
                TailorError::InvalidResponse(format!("missing or empty '{TAILORED_FIELD}'"))
            })?;

        let analysis = object
            .get(ANALYSIS_FIELD)
            .filter(|v| !v.is_null())
            .ok_or_else(|| TailorError::InvalidResponse(format!("missing '{ANALYSIS_FIELD}'")))?;

        Ok(TailoringOutcome {
            tailored: tailored.to_string(),
            analysis: analysis.clone(),
        })
    }
}

#[async_trait]
pub trait Tailor: Send + Sync {
    async fn tailor(
        &self,
        job_description: &str,
        resume_text: &str,
    ) -> Result<TailoringOutcome, TailorError>;
}

/// Picks the configured backend: webhook if set, else direct LLM, else none.
/// With none, tailoring requests fail with a configuration error.
pub fn from_config(config: &Config, client: reqwest::Client) -> Option<Arc<dyn Tailor>> {
    if let Some(url) = &config.tailor_webhook_url {
        info!("Tailoring backend: workflow webhook");
        return Some(Arc::new(WebhookTailor::new(client, url.clone())));
    }
    if let Some(key) = &config.anthropic_api_key {
        info!("Tailoring backend: direct LLM");
        return Some(Arc::new(LlmTailor::new(LlmClient::new(client, key.clone()))));
    }
    warn!("No tailoring backend configured; set TAILOR_WEBHOOK_URL or ANTHROPIC_API_KEY");
    None
}
