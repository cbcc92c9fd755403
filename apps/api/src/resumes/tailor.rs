use tracing::{info, warn};
use uuid::Uuid;

use crate::access::require_owner;
use crate::auth::ExternalIdentity;
use crate::errors::AppError;
use crate::models::resume::{Resume, ResumeWithJob};
use crate::store::Store;
use crate::tailoring::Tailor;
use crate::users::current_user;

/// Tailors an owned resume against its job's description and stores the result
/// in place. On any upstream failure the resume row is left untouched.
pub async fn tailor_resume(
    store: &dyn Store,
    tailor: Option<&dyn Tailor>,
    identity: &ExternalIdentity,
    resume_id: Uuid,
) -> Result<Resume, AppError> {
    let not_found = || AppError::NotFound("Resume or associated job not found".to_string());

    let ResumeWithJob { resume, job } = store
        .find_resume_with_job(resume_id)
        .await?
        .ok_or_else(not_found)?;
    let job = job.ok_or_else(not_found)?;

    let user = current_user(store, identity).await?;
    let resume = require_owner(Some(resume), resume_id, &user)?;

    let tailor = tailor.ok_or_else(|| {
        AppError::Misconfigured("Tailoring workflow is not configured".to_string())
    })?;

    let outcome = tailor
        .tailor(&job.description, &resume.original)
        .await
        .map_err(|e| {
            warn!(%resume_id, "Tailoring failed: {e}");
            AppError::from(e)
        })?;

    let updated = store
        .save_tailoring(resume.id, &outcome.tailored, &outcome.analysis)
        .await?
        .ok_or_else(not_found)?;

    info!(%resume_id, job_id = %job.id, "Resume tailored");
    Ok(updated)
}
