use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::job::Job;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Resume {
    pub id: Uuid,
    pub user_id: Uuid,
    pub job_id: Uuid,
    pub original: String,
    pub tailored: Option<String>,
    /// Opaque analysis payload returned by the tailoring workflow.
    pub analysis: Option<Value>,
    pub file_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewResume {
    pub user_id: Uuid,
    pub job_id: Uuid,
    pub original: String,
    pub file_name: Option<String>,
}

/// A resume loaded together with its linked job in a single fetch.
/// `job` is `None` when the link is dangling.
#[derive(Debug, Clone)]
pub struct ResumeWithJob {
    pub resume: Resume,
    pub job: Option<Job>,
}
