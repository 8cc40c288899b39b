//! In-memory credential repository

use async_trait::async_trait;
use chrono::Utc;
use kanban_types::UserProfile;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::models::CredentialRow;
use crate::repo::{CreateCredential, CredentialRepository};

/// In-memory credential repository backed by concurrent maps.
///
/// Cloning shares the underlying storage.
#[derive(Default, Clone)]
pub struct MemoryCredentialRepository {
    users: Arc<DashMap<Uuid, CredentialRow>>,
    by_login: Arc<DashMap<String, Uuid>>,
}

impl MemoryCredentialRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored credentials
    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl CredentialRepository for MemoryCredentialRepository {
    async fn create(&self, credential: CreateCredential) -> DbResult<CredentialRow> {
        // The login entry stays locked until the row is in place.
        match self.by_login.entry(credential.login.clone()) {
            Entry::Occupied(_) => Err(DbError::AlreadyExists),
            Entry::Vacant(slot) => {
                let now = Utc::now();
                let row = CredentialRow {
                    id: credential.id,
                    login: credential.login,
                    password_hash: credential.password_hash,
                    created_at: now,
                    updated_at: now,
                };
                self.users.insert(row.id, row.clone());
                slot.insert(row.id);
                Ok(row)
            }
        }
    }

    async fn find_by_login(&self, login: &str) -> DbResult<Option<CredentialRow>> {
        Ok(self
            .by_login
            .get(login)
            .and_then(|id| self.users.get(id.value()).map(|r| r.value().clone())))
    }

    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<CredentialRow>> {
        Ok(self.users.get(&id).map(|r| r.value().clone()))
    }

    async fn list_all(&self) -> DbResult<Vec<UserProfile>> {
        let mut profiles: Vec<UserProfile> =
            self.users.iter().map(|entry| entry.value().profile()).collect();
        profiles.sort_by(|a, b| a.login.cmp(&b.login));
        Ok(profiles)
    }

    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> DbResult<()> {
        let mut user = self.users.get_mut(&id).ok_or(DbError::NotFound)?;
        user.password_hash = password_hash.to_string();
        user.updated_at = Utc::now();
        Ok(())
    }
}

impl std::fmt::Debug for MemoryCredentialRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCredentialRepository")
            .field("users", &self.users.len())
            .finish_non_exhaustive()
    }
}
