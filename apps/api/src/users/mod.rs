pub mod handlers;

use crate::auth::ExternalIdentity;
use crate::errors::AppError;
use crate::models::user::User;
use crate::store::Store;

/// Looks up the caller's internal record. Users are created through
/// `POST /users`, never implicitly here.
pub async fn current_user(store: &dyn Store, identity: &ExternalIdentity) -> Result<User, AppError> {
    store
        .find_user_by_external_id(&identity.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}
