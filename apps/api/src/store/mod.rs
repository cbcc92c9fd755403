//! Persistence seam. Handlers and flows only talk to `dyn Store`;
//! `PgStore` is the production backend.

pub mod postgres;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job::{Job, JobChanges, NewJob};
use crate::models::resume::{NewResume, Resume, ResumeWithJob};
use crate::models::user::User;

pub use postgres::PgStore;

#[async_trait]
pub trait Store: Send + Sync {
    /// Creates the user on first contact, otherwise refreshes the email.
    async fn upsert_user(&self, external_id: &str, email: &str) -> Result<User, AppError>;

    async fn find_user_by_external_id(&self, external_id: &str) -> Result<Option<User>, AppError>;

    async fn create_job(&self, user_id: Uuid, job: NewJob) -> Result<Job, AppError>;

    /// The user's jobs, newest first.
    async fn list_jobs(&self, user_id: Uuid) -> Result<Vec<Job>, AppError>;

    async fn find_job(&self, job_id: Uuid) -> Result<Option<Job>, AppError>;

    async fn update_job(&self, job_id: Uuid, changes: JobChanges) -> Result<Option<Job>, AppError>;

    /// Returns `false` if no row was deleted. Resumes of the job go with it.
    async fn delete_job(&self, job_id: Uuid) -> Result<bool, AppError>;

    async fn create_resume(&self, resume: NewResume) -> Result<Resume, AppError>;

    async fn find_resume(&self, resume_id: Uuid) -> Result<Option<Resume>, AppError>;

    async fn find_resume_with_job(&self, resume_id: Uuid) -> Result<Option<ResumeWithJob>, AppError>;

    /// Resumes created for a job, newest first.
    async fn list_resumes_for_job(&self, job_id: Uuid) -> Result<Vec<Resume>, AppError>;

    async fn save_tailoring(
        &self,
        resume_id: Uuid,
        tailored: &str,
        analysis: &Value,
    ) -> Result<Option<Resume>, AppError>;
}
