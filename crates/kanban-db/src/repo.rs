//! Repository traits
//!
//! Define async repository interfaces for database operations.

use async_trait::async_trait;
use kanban_types::UserProfile;
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::CredentialRow;

/// Credential repository trait
///
/// Implementations must enforce login uniqueness atomically and report a
/// duplicate through [`crate::DbError::AlreadyExists`].
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// Store a new credential record
    async fn create(&self, credential: CreateCredential) -> DbResult<CredentialRow>;

    /// Find a credential by login
    async fn find_by_login(&self, login: &str) -> DbResult<Option<CredentialRow>>;

    /// Find a credential by user ID
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<CredentialRow>>;

    /// Public profiles of every stored user, ordered by login
    async fn list_all(&self) -> DbResult<Vec<UserProfile>>;

    /// Replace the stored password hash. Fails with `NotFound` for an unknown user.
    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> DbResult<()>;
}

/// Create credential input
#[derive(Clone)]
pub struct CreateCredential {
    pub id: Uuid,
    pub login: String,
    pub password_hash: String,
}

impl std::fmt::Debug for CreateCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateCredential")
            .field("id", &self.id)
            .field("login", &self.login)
            .finish_non_exhaustive()
    }
}
