//! Argon2id password hashing
//!
//! Hashes are self-describing PHC strings, so verification uses the salt and
//! cost embedded in the stored hash rather than the current configuration.

use std::sync::Arc;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher as _, PasswordVerifier, Version};

use crate::{AuthError, HasherConfig};

const DUMMY_PASSWORD: &str = "kanban-auth-dummy-password";

/// Salted, memory-hard password hasher
///
/// Cheap to clone, so calls can be moved onto a blocking thread.
#[derive(Clone)]
pub struct PasswordHasher {
    params: Params,
    /// Hash checked when there is no real one, keeping the rejection path
    /// about as slow as a real mismatch.
    dummy_hash: Arc<str>,
}

impl PasswordHasher {
    pub fn new(config: &HasherConfig) -> Result<Self, AuthError> {
        let params = config.params()?;
        let mut hasher = Self {
            params,
            dummy_hash: Arc::from(""),
        };
        hasher.dummy_hash = Arc::from(hasher.hash(DUMMY_PASSWORD)?);
        Ok(hasher)
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a plaintext password with a fresh random salt
    pub fn hash(&self, plaintext: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| {
                tracing::error!("Password hashing failed: {}", e);
                AuthError::HashingFailure(e.to_string())
            })
    }

    /// Check a candidate password against a stored hash
    ///
    /// A mismatch and an unparseable stored hash both yield
    /// [`AuthError::VerificationFailure`].
    pub fn verify(&self, candidate: &str, stored_hash: &str) -> Result<(), AuthError> {
        match PasswordHash::new(stored_hash) {
            Ok(parsed) => self
                .argon2()
                .verify_password(candidate.as_bytes(), &parsed)
                .map_err(|_| AuthError::VerificationFailure),
            Err(e) => {
                tracing::warn!("Stored password hash is unparseable: {}", e);
                self.verify_dummy(candidate);
                Err(AuthError::VerificationFailure)
            }
        }
    }

    /// Burn one verification's worth of work against the dummy hash
    pub fn verify_dummy(&self, candidate: &str) {
        if let Ok(parsed) = PasswordHash::new(&self.dummy_hash) {
            let _ = self.argon2().verify_password(candidate.as_bytes(), &parsed);
        }
    }
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("m_cost", &self.params.m_cost())
            .field("t_cost", &self.params.t_cost())
            .field("p_cost", &self.params.p_cost())
            .finish_non_exhaustive()
    }
}
