//! Configuration for the Auth API service.

use std::net::IpAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use kanban_auth_core::{AuthConfig, HasherConfig};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Auth API configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP bind address
    pub http_host: IpAddr,

    /// HTTP server port
    pub http_port: u16,

    /// PostgreSQL URL; in-memory storage when absent
    pub database_url: Option<String>,

    /// Auth core configuration
    pub auth: AuthConfig,

    /// Request timeout
    pub request_timeout: Duration,

    /// Log output format
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        // Server
        let http_host = parse_or(&lookup, "HTTP_HOST", IpAddr::from([127, 0, 0, 1]))?;
        let http_port = parse_or(&lookup, "HTTP_PORT", 8080u16)?;

        // Database (optional)
        let database_url = lookup("DATABASE_URL").filter(|url| !url.is_empty());

        // Keys
        let private_key_path = path_or(&lookup, "JWT_PRIVATE_KEY_PATH", "certs/private.pem")?;
        let public_key_path = path_or(&lookup, "JWT_PUBLIC_KEY_PATH", "certs/public.pem")?;

        // Token lifetimes
        let access_minutes: u64 = parse_or(&lookup, "ACCESS_TOKEN_LIFETIME_MINUTES", 20)?;
        let refresh_minutes: u64 = parse_or(&lookup, "REFRESH_TOKEN_LIFETIME_MINUTES", 10_000)?;
        let leeway_secs: u64 = parse_or(&lookup, "TOKEN_LEEWAY_SECS", 0)?;

        // Password hashing
        let defaults = HasherConfig::default();
        let hasher = HasherConfig {
            memory_cost_kib: parse_or(&lookup, "ARGON2_M_COST", defaults.memory_cost_kib)?,
            time_cost: parse_or(&lookup, "ARGON2_T_COST", defaults.time_cost)?,
            parallelism: parse_or(&lookup, "ARGON2_P_COST", defaults.parallelism)?,
        };

        // Request timeout (default 30 seconds)
        let request_timeout_secs: u64 = parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30)?;

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(_) => return Err(ConfigError::Invalid("LOG_FORMAT")),
        };

        // Build auth config
        let auth = AuthConfig::new(private_key_path, public_key_path)
            .with_access_token_lifetime(Duration::from_secs(access_minutes.saturating_mul(60)))
            .with_refresh_token_lifetime(Duration::from_secs(refresh_minutes.saturating_mul(60)))
            .with_leeway(Duration::from_secs(leeway_secs))
            .with_hasher(hasher);
        auth.validate()
            .map_err(|e| ConfigError::AuthConfig(e.to_string()))?;

        Ok(Self {
            http_host,
            http_port,
            database_url,
            auth,
            request_timeout: Duration::from_secs(request_timeout_secs),
            log_format,
        })
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

fn path_or(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: &str,
) -> Result<PathBuf, ConfigError> {
    match lookup(key) {
        Some(value) if value.trim().is_empty() => Err(ConfigError::Missing(key)),
        Some(value) => Ok(PathBuf::from(value)),
        None => Ok(PathBuf::from(default)),
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),

    #[error("Auth config error: {0}")]
    AuthConfig(String),
}
