//! Database row models
//!
//! These types map directly to database rows using SQLx's FromRow derive.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Credential row from the `users` table
#[derive(Clone, FromRow)]
pub struct CredentialRow {
    pub id: Uuid,
    pub login: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CredentialRow {
    /// Convert to domain UserId
    pub fn user_id(&self) -> kanban_types::UserId {
        kanban_types::UserId(self.id)
    }

    /// Public profile view (drops the hash)
    pub fn profile(&self) -> kanban_types::UserProfile {
        kanban_types::UserProfile {
            id: self.user_id(),
            login: self.login.clone(),
        }
    }
}

// Keeps the hash out of logs even when a row is printed with `?`.
impl std::fmt::Debug for CredentialRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialRow")
            .field("id", &self.id)
            .field("login", &self.login)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish_non_exhaustive()
    }
}
