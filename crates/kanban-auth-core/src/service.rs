//! Auth service - ties together credential storage, password hashing and tokens

use std::sync::Arc;

use http::HeaderMap;
use kanban_db::{CreateCredential, CredentialRepository};
use kanban_types::{
    ChangePasswordRequest, IssuedTokens, LoginRequest, Principal, RegisterRequest, UserId,
    UserProfile,
};

use crate::{
    AuthConfig, AuthError, AuthorizationGate, KeyPair, PasswordHasher, TokenIssuer, TokenVerifier,
};

/// Longest accepted login
pub const MAX_LOGIN_LEN: usize = 254;
/// Longest login accepted without an `@`; anything longer must be an email
pub const MAX_PLAIN_LOGIN_LEN: usize = 7;

/// Shortest accepted password
pub const MIN_PASSWORD_LEN: usize = 7;

/// Authentication service
///
/// Provides the user-facing credential flows:
/// - Registration and login (token pair on success)
/// - Password change for an authorized principal
/// - Token pair renewal from a refresh token
pub struct AuthService<R: CredentialRepository + ?Sized> {
    config: AuthConfig,
    hasher: PasswordHasher,
    issuer: TokenIssuer,
    gate: AuthorizationGate,
    repo: Arc<R>,
}

impl<R: CredentialRepository + ?Sized> AuthService<R> {
    /// Create a new auth service, loading the key pair named in `config`
    pub fn new(config: AuthConfig, repo: Arc<R>) -> Result<Self, AuthError> {
        let keys = KeyPair::load(&config.private_key_path, &config.public_key_path)?;
        Self::with_keys(config, Arc::new(keys), repo)
    }

    /// Create a new auth service around an already loaded key pair
    pub fn with_keys(config: AuthConfig, keys: Arc<KeyPair>, repo: Arc<R>) -> Result<Self, AuthError> {
        config.validate()?;

        Ok(Self {
            hasher: PasswordHasher::new(&config.hasher)?,
            issuer: TokenIssuer::new(Arc::clone(&keys), &config),
            gate: AuthorizationGate::new(TokenVerifier::new(keys, &config)),
            repo,
            config,
        })
    }

    pub fn gate(&self) -> &AuthorizationGate {
        &self.gate
    }

    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Authorize a request from its headers
    pub fn authorize(&self, headers: &HeaderMap, require_access: bool) -> Result<Principal, AuthError> {
        self.gate.authorize(headers, require_access)
    }

    // =========================================================================
    // Credential flows
    // =========================================================================

    /// Register a new user and issue its first token pair
    pub async fn register(&self, request: RegisterRequest) -> Result<IssuedTokens, AuthError> {
        validate_login(&request.login)?;
        validate_password(&request.password)?;

        let password_hash = self.hash_password(request.password).await?;
        let user_id = UserId::new();

        let row = self
            .repo
            .create(CreateCredential {
                id: user_id.0,
                login: request.login,
                password_hash,
            })
            .await
            .map_err(|e| {
                if matches!(e, kanban_db::DbError::AlreadyExists) {
                    tracing::debug!("Registration rejected: login already taken");
                }
                AuthError::from(e)
            })?;

        tracing::info!(user_id = %row.id, "Registered user");
        self.issue(row.user_id())
    }

    /// Check a login/password and issue a token pair
    ///
    /// Unknown logins and wrong passwords fail identically.
    pub async fn login(&self, request: LoginRequest) -> Result<IssuedTokens, AuthError> {
        let Some(row) = self.repo.find_by_login(&request.login).await? else {
            self.verify_unknown(request.password).await?;
            tracing::debug!("Login rejected: unknown login");
            return Err(AuthError::InvalidCredentials);
        };

        self.verify_password(request.password, row.password_hash.clone())
            .await
            .map_err(|e| match e {
                AuthError::VerificationFailure => {
                    tracing::debug!(user_id = %row.id, "Login rejected: wrong password");
                    AuthError::InvalidCredentials
                }
                other => other,
            })?;

        tracing::info!(user_id = %row.id, "User logged in");
        self.issue(row.user_id())
    }

    /// Replace the password of an authorized user
    pub async fn change_password(
        &self,
        principal: &Principal,
        request: ChangePasswordRequest,
    ) -> Result<(), AuthError> {
        if !principal.is_access {
            return Err(AuthError::WrongTokenClass);
        }

        let row = self
            .repo
            .find_by_id(principal.user_id.0)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        self.verify_password(request.old_password, row.password_hash)
            .await
            .map_err(|e| match e {
                AuthError::VerificationFailure => AuthError::InvalidCredentials,
                other => other,
            })?;

        if request.new_password != request.new_password_again {
            return Err(AuthError::PasswordMismatch);
        }
        validate_password(&request.new_password)?;

        let password_hash = self.hash_password(request.new_password).await?;
        self.repo.update_password_hash(row.id, &password_hash).await?;

        tracing::info!(user_id = %row.id, "Password changed");
        Ok(())
    }

    /// Exchange a refresh token for a new token pair
    ///
    /// The presented refresh token stays valid until it expires.
    pub async fn refresh(&self, refresh_token: &str) -> Result<IssuedTokens, AuthError> {
        let principal = self.gate.verifier().verify(refresh_token)?;
        if principal.is_access {
            tracing::debug!(user_id = %principal.user_id, "Access token presented for refresh");
            return Err(AuthError::WrongTokenClass);
        }

        let row = self
            .repo
            .find_by_id(principal.user_id.0)
            .await?
            .ok_or_else(|| {
                tracing::debug!(user_id = %principal.user_id, "Refresh for unknown user");
                AuthError::InvalidCredentials
            })?;

        tracing::debug!(user_id = %row.id, "Refreshed token pair");
        self.issue(row.user_id())
    }

    /// Look up the profile of an authorized user
    pub async fn profile(&self, principal: &Principal) -> Result<UserProfile, AuthError> {
        let row = self
            .repo
            .find_by_id(principal.user_id.0)
            .await?
            .ok_or(AuthError::UserNotFound)?;
        Ok(row.profile())
    }

    /// List the public profiles of every user
    pub async fn list_users(&self, principal: &Principal) -> Result<Vec<UserProfile>, AuthError> {
        if !principal.is_access {
            return Err(AuthError::WrongTokenClass);
        }
        let profiles = self.repo.list_all().await?;
        tracing::debug!(user_id = %principal.user_id, count = profiles.len(), "Listed users");
        Ok(profiles)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn issue(&self, user_id: UserId) -> Result<IssuedTokens, AuthError> {
        Ok(IssuedTokens {
            id: user_id,
            tokens: self.issuer.issue_pair(user_id)?,
        })
    }

    // Argon2 is CPU and memory bound; keep it off the async workers.
    async fn hash_password(&self, password: String) -> Result<String, AuthError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::Internal(format!("hashing task failed: {e}")))?
    }

    async fn verify_password(&self, candidate: String, stored_hash: String) -> Result<(), AuthError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&candidate, &stored_hash))
            .await
            .map_err(|e| AuthError::Internal(format!("verification task failed: {e}")))?
    }

    async fn verify_unknown(&self, candidate: String) -> Result<(), AuthError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.verify_dummy(&candidate))
            .await
            .map_err(|e| AuthError::Internal(format!("verification task failed: {e}")))
    }
}

impl<R: CredentialRepository + ?Sized> std::fmt::Debug for AuthService<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("config", &self.config)
            .finish()
    }
}

/// Check a login before registration
pub fn validate_login(login: &str) -> Result<(), AuthError> {
    if login.is_empty() {
        return Err(AuthError::InvalidRequest("login must not be empty".to_string()));
    }
    if login.chars().count() > MAX_LOGIN_LEN {
        return Err(AuthError::InvalidRequest(format!(
            "login must be at most {MAX_LOGIN_LEN} characters"
        )));
    }
    if !login.contains('@') && login.chars().count() > MAX_PLAIN_LOGIN_LEN {
        return Err(AuthError::InvalidRequest("wrong email address".to_string()));
    }
    if login.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(AuthError::InvalidRequest(
            "login must not contain whitespace".to_string(),
        ));
    }
    Ok(())
}

/// Check a new password
pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::InvalidRequest(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}
