//! Configuration types for the auth core

use std::path::PathBuf;
use std::time::Duration;

use crate::AuthError;

/// Default access token lifetime (20 minutes)
pub const DEFAULT_ACCESS_TOKEN_LIFETIME: Duration = Duration::from_secs(20 * 60);

/// Default refresh token lifetime (10000 minutes)
pub const DEFAULT_REFRESH_TOKEN_LIFETIME: Duration = Duration::from_secs(10_000 * 60);

/// Longest accepted token lifetime (ten years)
pub const MAX_TOKEN_LIFETIME: Duration = Duration::from_secs(10 * 365 * 24 * 60 * 60);

/// Argon2id work factor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HasherConfig {
    /// Memory cost in KiB
    pub memory_cost_kib: u32,
    /// Number of iterations
    pub time_cost: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl HasherConfig {
    /// Build Argon2 parameters, rejecting out-of-range values
    pub fn params(&self) -> Result<argon2::Params, AuthError> {
        argon2::Params::new(self.memory_cost_kib, self.time_cost, self.parallelism, None)
            .map_err(|e| AuthError::Configuration(format!("invalid argon2 parameters: {e}")))
    }
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self {
            memory_cost_kib: argon2::Params::DEFAULT_M_COST,
            time_cost: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

/// Auth core configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// PEM-encoded RSA private key used for signing
    pub private_key_path: PathBuf,
    /// PEM-encoded RSA public key used for verification
    pub public_key_path: PathBuf,
    /// Access token lifetime
    pub access_token_lifetime: Duration,
    /// Refresh token lifetime
    pub refresh_token_lifetime: Duration,
    /// Clock skew tolerated on `exp`/`nbf`
    pub leeway: Duration,
    /// Password hashing work factor
    pub hasher: HasherConfig,
}

impl AuthConfig {
    /// Create a new auth config with default lifetimes
    pub fn new(private_key_path: impl Into<PathBuf>, public_key_path: impl Into<PathBuf>) -> Self {
        Self {
            private_key_path: private_key_path.into(),
            public_key_path: public_key_path.into(),
            access_token_lifetime: DEFAULT_ACCESS_TOKEN_LIFETIME,
            refresh_token_lifetime: DEFAULT_REFRESH_TOKEN_LIFETIME,
            leeway: Duration::ZERO,
            hasher: HasherConfig::default(),
        }
    }

    /// Set access token lifetime
    pub fn with_access_token_lifetime(mut self, lifetime: Duration) -> Self {
        self.access_token_lifetime = lifetime;
        self
    }

    /// Set refresh token lifetime
    pub fn with_refresh_token_lifetime(mut self, lifetime: Duration) -> Self {
        self.refresh_token_lifetime = lifetime;
        self
    }

    /// Set verification leeway
    pub fn with_leeway(mut self, leeway: Duration) -> Self {
        self.leeway = leeway;
        self
    }

    /// Set password hashing work factor
    pub fn with_hasher(mut self, hasher: HasherConfig) -> Self {
        self.hasher = hasher;
        self
    }

    /// Check lifetimes and hashing parameters
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.access_token_lifetime.as_secs() == 0 {
            return Err(AuthError::Configuration(
                "access token lifetime must be at least one second".to_string(),
            ));
        }
        if self.refresh_token_lifetime > MAX_TOKEN_LIFETIME || self.leeway > MAX_TOKEN_LIFETIME {
            return Err(AuthError::Configuration(format!(
                "token lifetimes and leeway must not exceed {} seconds",
                MAX_TOKEN_LIFETIME.as_secs()
            )));
        }
        if self.refresh_token_lifetime <= self.access_token_lifetime {
            return Err(AuthError::Configuration(
                "refresh token lifetime must exceed access token lifetime".to_string(),
            ));
        }
        self.hasher.params()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuthConfig::new("certs/private.pem", "certs/public.pem");
        assert_eq!(config.access_token_lifetime, Duration::from_secs(1200));
        assert_eq!(config.refresh_token_lifetime, Duration::from_secs(600_000));
        assert_eq!(config.leeway, Duration::ZERO);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_refresh_must_outlive_access() {
        let config = AuthConfig::new("a", "b")
            .with_access_token_lifetime(Duration::from_secs(600))
            .with_refresh_token_lifetime(Duration::from_secs(600));
        assert!(matches!(config.validate(), Err(AuthError::Configuration(_))));
    }

    #[test]
    fn test_oversized_lifetime_rejected() {
        let config = AuthConfig::new("a", "b")
            .with_refresh_token_lifetime(Duration::from_secs(u64::MAX.saturating_mul(60)));
        assert!(matches!(config.validate(), Err(AuthError::Configuration(_))));

        let config = AuthConfig::new("a", "b")
            .with_refresh_token_lifetime(MAX_TOKEN_LIFETIME + Duration::from_secs(1));
        assert!(config.validate().is_err());

        let config = AuthConfig::new("a", "b").with_refresh_token_lifetime(MAX_TOKEN_LIFETIME);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_oversized_leeway_rejected() {
        let config = AuthConfig::new("a", "b").with_leeway(Duration::from_secs(u64::MAX));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_access_lifetime_rejected() {
        let config = AuthConfig::new("a", "b").with_access_token_lifetime(Duration::ZERO);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_hasher_params_rejected() {
        let config = AuthConfig::new("a", "b").with_hasher(HasherConfig {
            memory_cost_kib: 1,
            time_cost: 0,
            parallelism: 1,
        });
        assert!(matches!(config.validate(), Err(AuthError::Configuration(_))));
    }
}
