use async_trait::async_trait;
use serde_json::Value;

use super::prompts::{TAILOR_PROMPT_TEMPLATE, TAILOR_SYSTEM};
use super::{Tailor, TailorError, TailoringOutcome};
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::LlmClient;

/// Tailors through a single direct LLM call. The model's JSON is held to the
/// same schema as the workflow webhook's response.
#[derive(Clone)]
pub struct LlmTailor {
    llm: LlmClient,
}

impl LlmTailor {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

pub(super) fn build_prompt(job_description: &str, resume_text: &str) -> String {
    TAILOR_PROMPT_TEMPLATE
        .replace("{job_description}", job_description)
        .replace("{resume_text}", resume_text)
}

#[async_trait]
impl Tailor for LlmTailor {
    async fn tailor(
        &self,
        job_description: &str,
        resume_text: &str,
    ) -> Result<TailoringOutcome, TailorError> {
        let prompt = build_prompt(job_description, resume_text);
        let system = format!("{TAILOR_SYSTEM} {JSON_ONLY_SYSTEM}");
        let payload: Value = self.llm.call_json(&prompt, &system).await?;
        TailoringOutcome::from_payload(&payload)
    }
}
