//! Ownership checks shared by every job and resume endpoint.
//!
//! Ownership is re-checked on each request against freshly loaded rows.

use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job::Job;
use crate::models::resume::Resume;
use crate::models::user::User;

/// A stored resource that belongs to exactly one user.
pub trait Owned {
    /// Human-readable kind used in NotFound messages.
    const KIND: &'static str;

    fn id(&self) -> Uuid;
    fn owner_id(&self) -> Uuid;
}

impl Owned for Job {
    const KIND: &'static str = "Job";

    fn id(&self) -> Uuid {
        self.id
    }

    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

impl Owned for Resume {
    const KIND: &'static str = "Resume";

    fn id(&self) -> Uuid {
        self.id
    }

    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

/// Missing → `NotFound`, owned by someone else → `Forbidden`, otherwise the
/// resource is handed back.
pub fn require_owner<T: Owned>(resource: Option<T>, id: Uuid, user: &User) -> Result<T, AppError> {
    let resource = resource.ok_or_else(|| AppError::NotFound(format!("{} {id} not found", T::KIND)))?;
    if resource.owner_id() != user.id {
        tracing::warn!(
            kind = T::KIND,
            resource_id = %resource.id(),
            user_id = %user.id,
            "Ownership check failed"
        );
        return Err(AppError::Forbidden);
    }
    Ok(resource)
}
