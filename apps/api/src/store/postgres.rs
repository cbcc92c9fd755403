use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job::{Job, JobChanges, NewJob};
use crate::models::resume::{NewResume, Resume, ResumeWithJob};
use crate::models::user::User;
use crate::store::Store;

/// PostgreSQL-backed store. Each call is a single statement, so row-level
/// atomicity comes from Postgres; concurrent tailoring writes are last-write-wins.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Flat row for the resume ⟕ job join; `j_*` columns are NULL for a dangling link.
#[derive(FromRow)]
struct ResumeJobRow {
    id: Uuid,
    user_id: Uuid,
    job_id: Uuid,
    original: String,
    tailored: Option<String>,
    analysis: Option<Value>,
    file_name: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    j_id: Option<Uuid>,
    j_user_id: Option<Uuid>,
    j_title: Option<String>,
    j_description: Option<String>,
    j_company: Option<String>,
    j_skills: Option<Vec<String>>,
    j_created_at: Option<DateTime<Utc>>,
    j_updated_at: Option<DateTime<Utc>>,
}

impl From<ResumeJobRow> for ResumeWithJob {
    fn from(row: ResumeJobRow) -> Self {
        let job = match (
            row.j_id,
            row.j_user_id,
            row.j_title,
            row.j_description,
            row.j_created_at,
            row.j_updated_at,
        ) {
            (Some(id), Some(user_id), Some(title), Some(description), Some(created_at), Some(updated_at)) => {
                Some(Job {
                    id,
                    user_id,
                    title,
                    description,
                    company: row.j_company,
                    skills: row.j_skills.unwrap_or_default(),
                    created_at,
                    updated_at,
                })
            }
            _ => None,
        };

        ResumeWithJob {
            resume: Resume {
                id: row.id,
                user_id: row.user_id,
                job_id: row.job_id,
                original: row.original,
                tailored: row.tailored,
                analysis: row.analysis,
                file_name: row.file_name,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            job,
        }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn upsert_user(&self, external_id: &str, email: &str) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, external_id, email)
            VALUES ($1, $2, $3)
            ON CONFLICT (external_id) DO UPDATE SET email = EXCLUDED.email
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(external_id)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_user_by_external_id(&self, external_id: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE external_id = $1")
            .bind(external_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn create_job(&self, user_id: Uuid, job: NewJob) -> Result<Job, AppError> {
        let job = sqlx::query_as::<_, Job>(
            r#"
            INSERT INTO jobs (id, user_id, title, description, company, skills)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&job.title)
        .bind(&job.description)
        .bind(&job.company)
        .bind(&job.skills)
        .fetch_one(&self.pool)
        .await?;
        Ok(job)
    }

    async fn list_jobs(&self, user_id: Uuid) -> Result<Vec<Job>, AppError> {
        let jobs = sqlx::query_as::<_, Job>(
            "SELECT * FROM jobs WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(jobs)
    }

    async fn find_job(&self, job_id: Uuid) -> Result<Option<Job>, AppError> {
        let job = sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = $1")
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(job)
    }

    async fn update_job(&self, job_id: Uuid, changes: JobChanges) -> Result<Option<Job>, AppError> {
        let job = sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs SET
                title       = COALESCE($2, title),
                description = COALESCE($3, description),
                company     = CASE WHEN $4 THEN $5 ELSE company END,
                skills      = COALESCE($6, skills),
                updated_at  = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(job_id)
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.company.is_some())
        .bind(changes.company.flatten())
        .bind(changes.skills)
        .fetch_optional(&self.pool)
        .await?;
        Ok(job)
    }

    async fn delete_job(&self, job_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(job_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_resume(&self, resume: NewResume) -> Result<Resume, AppError> {
        let resume = sqlx::query_as::<_, Resume>(
            r#"
            INSERT INTO resumes (id, user_id, job_id, original, file_name)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(resume.user_id)
        .bind(resume.job_id)
        .bind(&resume.original)
        .bind(&resume.file_name)
        .fetch_one(&self.pool)
        .await?;
        Ok(resume)
    }

    async fn find_resume(&self, resume_id: Uuid) -> Result<Option<Resume>, AppError> {
        let resume = sqlx::query_as::<_, Resume>("SELECT * FROM resumes WHERE id = $1")
            .bind(resume_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(resume)
    }

    async fn find_resume_with_job(&self, resume_id: Uuid) -> Result<Option<ResumeWithJob>, AppError> {
        let row = sqlx::query_as::<_, ResumeJobRow>(
            r#"
            SELECT r.id, r.user_id, r.job_id, r.original, r.tailored, r.analysis,
                   r.file_name, r.created_at, r.updated_at,
                   j.id AS j_id, j.user_id AS j_user_id, j.title AS j_title,
                   j.description AS j_description, j.company AS j_company,
                   j.skills AS j_skills, j.created_at AS j_created_at,
                   j.updated_at AS j_updated_at
            FROM resumes r
            LEFT JOIN jobs j ON j.id = r.job_id
            WHERE r.id = $1
            "#,
        )
        .bind(resume_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(ResumeWithJob::from))
    }

    async fn list_resumes_for_job(&self, job_id: Uuid) -> Result<Vec<Resume>, AppError> {
        let resumes = sqlx::query_as::<_, Resume>(
            "SELECT * FROM resumes WHERE job_id = $1 ORDER BY created_at DESC",
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(resumes)
    }

    async fn save_tailoring(
        &self,
        resume_id: Uuid,
        tailored: &str,
        analysis: &Value,
    ) -> Result<Option<Resume>, AppError> {
        let resume = sqlx::query_as::<_, Resume>(
            r#"
            UPDATE resumes
            SET tailored = $2, analysis = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(resume_id)
        .bind(tailored)
        .bind(analysis)
        .fetch_optional(&self.pool)
        .await?;
        Ok(resume)
    }
}
