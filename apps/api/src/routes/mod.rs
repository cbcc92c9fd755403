pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::jobs::handlers as jobs;
use crate::resumes::handlers as resumes;
use crate::state::AppState;
use crate::users::handlers as users;

pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/users", post(users::handle_upsert_user))
        .route(
            "/api/v1/jobs",
            get(jobs::handle_list_jobs).post(jobs::handle_create_job),
        )
        .route(
            "/api/v1/jobs/:job_id",
            get(jobs::handle_get_job)
                .put(jobs::handle_update_job)
                .delete(jobs::handle_delete_job),
        )
        .route(
            "/api/v1/jobs/:job_id/resumes",
            get(jobs::handle_list_job_resumes),
        )
        .route(
            "/api/v1/resumes/create-from-file",
            post(resumes::handle_create_from_file),
        )
        .route("/api/v1/resumes/tailor", post(resumes::handle_tailor))
        .route("/api/v1/resumes/:resume_id", get(resumes::handle_get_resume))
        .layer(body_limit)
        .with_state(state)
}
