//! Mock repositories for testing

use async_trait::async_trait;
use kanban_db::{CreateCredential, CredentialRepository, CredentialRow, DbError, DbResult};
use kanban_types::UserProfile;
use uuid::Uuid;

/// Repository whose every call fails like a lost database connection
#[derive(Default, Clone)]
pub struct FailingRepository;

fn unavailable() -> DbError {
    DbError::Sqlx(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl CredentialRepository for FailingRepository {
    async fn create(&self, _credential: CreateCredential) -> DbResult<CredentialRow> {
        Err(unavailable())
    }

    async fn find_by_login(&self, _login: &str) -> DbResult<Option<CredentialRow>> {
        Err(unavailable())
    }

    async fn find_by_id(&self, _id: Uuid) -> DbResult<Option<CredentialRow>> {
        Err(unavailable())
    }

    async fn list_all(&self) -> DbResult<Vec<UserProfile>> {
        Err(unavailable())
    }

    async fn update_password_hash(&self, _id: Uuid, _password_hash: &str) -> DbResult<()> {
        Err(unavailable())
    }
}
