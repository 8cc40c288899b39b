//! Application state

use std::sync::Arc;

use kanban_auth_core::AuthService;
use kanban_db::{CredentialRepository, DbPool};

use crate::config::Config;

/// Auth service over whichever credential store was configured
pub type AuthServiceImpl = AuthService<dyn CredentialRepository>;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Credential flows and request authorization
    pub auth: Arc<AuthServiceImpl>,
    /// Database pool, when backed by PostgreSQL
    pub pool: Option<DbPool>,
    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state
    pub fn new(auth: AuthServiceImpl, pool: Option<DbPool>, config: Config) -> Self {
        Self {
            auth: Arc::new(auth),
            pool,
            config: Arc::new(config),
        }
    }

    /// Get request timeout from config
    pub fn request_timeout(&self) -> std::time::Duration {
        self.config.request_timeout
    }
}
