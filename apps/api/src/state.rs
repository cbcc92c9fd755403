use std::sync::Arc;

use crate::auth::IdentityVerifier;
use crate::config::Config;
use crate::store::Store;
use crate::tailoring::Tailor;

/// Shared application state injected into all route handlers via Axum extractors.
/// Every collaborator is constructed once in `main` and swapped for fakes in tests.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub verifier: Arc<dyn IdentityVerifier>,
    /// `None` when no tailoring backend is configured.
    pub tailor: Option<Arc<dyn Tailor>>,
    pub config: Config,
}
