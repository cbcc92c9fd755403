//! Axum route handlers for the Resumes API.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::access::require_owner;
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::extractors::ApiJson;
use crate::models::resume::Resume;
use crate::resumes::ingest::{ingest_resume, IngestRequest, ResumeUpload};
use crate::resumes::tailor::tailor_resume;
use crate::state::AppState;
use crate::users::current_user;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TailorRequest {
    pub resume_id: Option<Uuid>,
}

/// POST /api/v1/resumes/create-from-file
///
/// Multipart form with `file` (PDF or DOCX) and `jobId`.
pub async fn handle_create_from_file(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    multipart: Multipart,
) -> Result<Json<Resume>, AppError> {
    let request = read_upload_form(multipart).await?;
    let resume = ingest_resume(state.store.as_ref(), &identity, request).await?;
    Ok(Json(resume))
}

/// POST /api/v1/resumes/tailor
pub async fn handle_tailor(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ApiJson(request): ApiJson<TailorRequest>,
) -> Result<Json<Resume>, AppError> {
    let resume_id = request
        .resume_id
        .ok_or_else(|| AppError::Validation("resumeId is required".to_string()))?;

    let resume = tailor_resume(
        state.store.as_ref(),
        state.tailor.as_deref(),
        &identity,
        resume_id,
    )
    .await?;
    Ok(Json(resume))
}

/// GET /api/v1/resumes/:resume_id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(resume_id): Path<Uuid>,
) -> Result<Json<Resume>, AppError> {
    let user = current_user(state.store.as_ref(), &identity).await?;
    let resume = require_owner(state.store.find_resume(resume_id).await?, resume_id, &user)?;
    Ok(Json(resume))
}

/// Collects the `file` and `jobId` fields; unknown fields are ignored.
async fn read_upload_form(mut multipart: Multipart) -> Result<IngestRequest, AppError> {
    let mut request = IngestRequest::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read file: {e}")))?;
                request.file = Some(ResumeUpload {
                    file_name,
                    content_type,
                    data,
                });
            }
            Some("jobId") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read jobId: {e}")))?;
                request.job_id = Some(text);
            }
            _ => {}
        }
    }

    Ok(request)
}
