use std::sync::Arc;

use crate::auth::IdentityVerifier;
use crate::config::AppConfig;
use crate::database::Database;

/// Collaborators shared by every handler. Built once in the composition root
/// and never mutated afterwards.
pub struct AppState {
    pub config: &'static AppConfig,
    pub db: Database,
    pub verifier: Arc<dyn IdentityVerifier>,
}

pub type Ctx = Arc<AppState>;
