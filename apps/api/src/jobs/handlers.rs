//! Axum route handlers for the Jobs API.
//!
//! Every handler resolves the caller, then re-checks ownership of the job it
//! touches. Missing jobs are 404, foreign jobs are 403.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::access::require_owner;
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::extractors::ApiJson;
use crate::models::job::{Job, JobChanges, NewJob};
use crate::models::resume::Resume;
use crate::state::AppState;
use crate::users::current_user;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub company: Option<String>,
    pub skills: Option<Vec<String>>,
}

impl CreateJobRequest {
    fn validate(self) -> Result<NewJob, AppError> {
        Ok(NewJob {
            title: required("title", self.title)?,
            description: required("description", self.description)?,
            company: optional_text(self.company),
            skills: normalize_skills(self.skills.unwrap_or_default()),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub company: Option<String>,
    pub skills: Option<Vec<String>>,
}

impl UpdateJobRequest {
    fn validate(self) -> Result<JobChanges, AppError> {
        Ok(JobChanges {
            title: self.title.map(|t| required("title", Some(t))).transpose()?,
            description: self
                .description
                .map(|d| required("description", Some(d)))
                .transpose()?,
            company: self.company.map(|c| optional_text(Some(c))),
            skills: self.skills.map(normalize_skills),
        })
    }
}

fn required(field: &str, value: Option<String>) -> Result<String, AppError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Validation(format!("{field} is required")))
}

/// Trimmed text, or `None` when blank.
fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Trims entries and drops blanks; order is preserved.
fn normalize_skills(skills: Vec<String>) -> Vec<String> {
    skills
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ApiJson(request): ApiJson<CreateJobRequest>,
) -> Result<(StatusCode, Json<Job>), AppError> {
    let user = current_user(state.store.as_ref(), &identity).await?;
    let new_job = request.validate()?;

    let job = state.store.create_job(user.id, new_job).await?;
    info!(job_id = %job.id, user_id = %user.id, "Job created");
    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /api/v1/jobs
///
/// The caller's jobs, newest first.
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<Vec<Job>>, AppError> {
    let user = current_user(state.store.as_ref(), &identity).await?;
    Ok(Json(state.store.list_jobs(user.id).await?))
}

/// GET /api/v1/jobs/:job_id
pub async fn handle_get_job(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Job>, AppError> {
    let user = current_user(state.store.as_ref(), &identity).await?;
    let job = require_owner(state.store.find_job(job_id).await?, job_id, &user)?;
    Ok(Json(job))
}

/// PUT /api/v1/jobs/:job_id
///
/// Partial update: fields absent from the body keep their stored value.
pub async fn handle_update_job(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(job_id): Path<Uuid>,
    ApiJson(request): ApiJson<UpdateJobRequest>,
) -> Result<Json<Job>, AppError> {
    let user = current_user(state.store.as_ref(), &identity).await?;
    require_owner(state.store.find_job(job_id).await?, job_id, &user)?;
    let changes = request.validate()?;

    // The job can vanish between the check and the write.
    let job = state
        .store
        .update_job(job_id, changes)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;
    info!(job_id = %job.id, "Job updated");
    Ok(Json(job))
}

/// DELETE /api/v1/jobs/:job_id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let user = current_user(state.store.as_ref(), &identity).await?;
    require_owner(state.store.find_job(job_id).await?, job_id, &user)?;

    if !state.store.delete_job(job_id).await? {
        return Err(AppError::NotFound(format!("Job {job_id} not found")));
    }
    info!(%job_id, "Job deleted");
    Ok(Json(json!({ "message": "Job deleted successfully" })))
}

/// GET /api/v1/jobs/:job_id/resumes
///
/// Resumes uploaded against an owned job, newest first.
pub async fn handle_list_job_resumes(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Vec<Resume>>, AppError> {
    let user = current_user(state.store.as_ref(), &identity).await?;
    require_owner(state.store.find_job(job_id).await?, job_id, &user)?;
    Ok(Json(state.store.list_resumes_for_job(job_id).await?))
}
