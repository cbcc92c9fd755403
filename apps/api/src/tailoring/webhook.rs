use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::{Tailor, TailorError, TailoringOutcome};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WorkflowRequest<'a> {
    job_description: &'a str,
    resume_text: &'a str,
}

/// Posts both texts to the workflow webhook. One attempt, transport-default
/// timeouts.
#[derive(Clone)]
pub struct WebhookTailor {
    client: Client,
    url: String,
}

impl WebhookTailor {
    pub fn new(client: Client, url: String) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl Tailor for WebhookTailor {
    async fn tailor(
        &self,
        job_description: &str,
        resume_text: &str,
    ) -> Result<TailoringOutcome, TailorError> {
        let response = self
            .client
            .post(&self.url)
            .json(&WorkflowRequest {
                job_description,
                resume_text,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TailorError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| TailorError::InvalidResponse(format!("body is not JSON: {e}")))?;
        debug!("Workflow responded with {status}");

        TailoringOutcome::from_payload(&payload)
    }
}
