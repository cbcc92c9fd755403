use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::info;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::extractors::ApiJson;
use crate::models::user::User;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct UpsertUserRequest {
    pub email: Option<String>,
}

/// POST /api/v1/users
///
/// Creates or refreshes the caller's user record, keyed by the verified
/// identity. The email falls back to the one the identity service reports.
pub async fn handle_upsert_user(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ApiJson(request): ApiJson<UpsertUserRequest>,
) -> Result<Json<User>, AppError> {
    let email = non_blank(request.email)
        .or_else(|| non_blank(identity.email))
        .ok_or_else(|| AppError::Validation("email is required".to_string()))?;

    let user = state.store.upsert_user(&identity.id, &email).await?;
    info!(user_id = %user.id, "User upserted");
    Ok(Json(user))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
