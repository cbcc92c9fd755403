use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use crate::access::require_owner;
use crate::auth::ExternalIdentity;
use crate::errors::AppError;
use crate::extract::extract_text;
use crate::models::resume::{NewResume, Resume};
use crate::store::Store;
use crate::users::current_user;

/// An uploaded file as received from the multipart form.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Form fields of `POST /resumes/create-from-file`; either may be absent.
#[derive(Debug, Default)]
pub struct IngestRequest {
    pub file: Option<ResumeUpload>,
    pub job_id: Option<String>,
}

/// Creates a resume from an uploaded PDF/DOCX for one of the caller's jobs.
///
/// Order: required fields → text extraction → user lookup → job ownership →
/// insert. The resume row is only written once every step has passed.
pub async fn ingest_resume(
    store: &dyn Store,
    identity: &ExternalIdentity,
    request: IngestRequest,
) -> Result<Resume, AppError> {
    let (file, job_id) = match (request.file, request.job_id) {
        (Some(file), Some(job_id)) if !job_id.trim().is_empty() => (file, job_id),
        _ => return Err(AppError::Validation("File and jobId are required".to_string())),
    };
    let job_id = Uuid::parse_str(job_id.trim())
        .map_err(|_| AppError::Validation("jobId must be a valid UUID".to_string()))?;

    let original = extract_upload(&file).await?;

    let user = current_user(store, identity).await?;
    require_owner(store.find_job(job_id).await?, job_id, &user)?;

    let resume = store
        .create_resume(NewResume {
            user_id: user.id,
            job_id,
            original,
            file_name: Some(file.file_name),
        })
        .await?;

    info!(resume_id = %resume.id, %job_id, "Resume created from upload");
    Ok(resume)
}

async fn extract_upload(upload: &ResumeUpload) -> Result<String, AppError> {
    let data = upload.data.clone();
    let content_type = upload.content_type.clone();
    let file_name = upload.file_name.clone();

    let text = tokio::task::spawn_blocking(move || {
        extract_text(&data, content_type.as_deref(), &file_name)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("text extraction task failed: {e}")))??;
    Ok(text)
}
