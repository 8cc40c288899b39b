//! Auth errors

use std::path::PathBuf;
use thiserror::Error;

/// Authentication errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// Key file could not be read
    #[error("failed to read key file {}: {source}", .path.display())]
    KeyLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Key material is not a usable RSA key
    #[error("failed to parse {key}: {reason}")]
    KeyParse { key: String, reason: String },

    /// Password hashing failed (RNG or algorithm error)
    #[error("password hashing failed: {0}")]
    HashingFailure(String),

    /// Candidate password does not match the stored hash
    #[error("password verification failed")]
    VerificationFailure,

    /// Private key operation failed while signing a token
    #[error("token signing failed: {0}")]
    SigningFailure(String),

    /// Token is not a three-part compact JWS
    #[error("malformed token")]
    MalformedToken,

    /// Token header names an algorithm outside the RSA family
    #[error("unsupported token algorithm")]
    UnsupportedAlgorithm,

    /// Signature does not match the public key
    #[error("invalid token signature")]
    InvalidSignature,

    /// Token has expired
    #[error("token expired")]
    TokenExpired,

    /// Token `nbf` is in the future
    #[error("token not yet valid")]
    TokenNotYetValid,

    /// Token issuer is not a user ID
    #[error("invalid token issuer")]
    InvalidIssuer,

    /// Authorization header missing or not `Bearer <token>`
    #[error("malformed authorization header")]
    MalformedAuthorizationHeader,

    /// Refresh token used where an access token is required, or vice versa
    #[error("wrong token class")]
    WrongTokenClass,

    /// Invalid credentials (unknown login or wrong password)
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Login already registered
    #[error("user already exists")]
    AlreadyExists,

    /// New password and its confirmation differ
    #[error("new passwords do not match")]
    PasswordMismatch,

    /// User not found
    #[error("user not found")]
    UserNotFound,

    /// Request payload failed validation
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Database error
    #[error("database error: {0}")]
    Database(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Whether this error rejects a presented token or authorization header
    pub fn is_token_rejection(&self) -> bool {
        matches!(
            self,
            Self::MalformedToken
                | Self::UnsupportedAlgorithm
                | Self::InvalidSignature
                | Self::TokenExpired
                | Self::TokenNotYetValid
                | Self::InvalidIssuer
                | Self::MalformedAuthorizationHeader
                | Self::WrongTokenClass
        )
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MalformedToken
            | Self::UnsupportedAlgorithm
            | Self::InvalidSignature
            | Self::TokenExpired
            | Self::TokenNotYetValid
            | Self::InvalidIssuer
            | Self::MalformedAuthorizationHeader
            | Self::WrongTokenClass
            | Self::InvalidCredentials
            | Self::VerificationFailure => 401,
            Self::PasswordMismatch | Self::InvalidRequest(_) => 400,
            Self::UserNotFound => 404,
            Self::AlreadyExists => 409,
            Self::KeyLoad { .. }
            | Self::KeyParse { .. }
            | Self::HashingFailure(_)
            | Self::SigningFailure(_)
            | Self::Database(_)
            | Self::Configuration(_)
            | Self::Internal(_) => 500,
        }
    }

    /// Get error code for API responses
    ///
    /// Every token rejection except expiry shares `INVALID_TOKEN`, so a
    /// client cannot tell a bad format from a bad signature.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::TokenExpired => "TOKEN_EXPIRED",
            e if e.is_token_rejection() => "INVALID_TOKEN",
            Self::InvalidCredentials | Self::VerificationFailure => "INVALID_CREDENTIALS",
            Self::AlreadyExists => "ALREADY_EXISTS",
            Self::PasswordMismatch => "PASSWORD_MISMATCH",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::InvalidRequest(_) => "BAD_REQUEST",
            Self::Database(_) => "DATABASE_ERROR",
            Self::KeyLoad { .. } | Self::KeyParse { .. } | Self::Configuration(_) => {
                "CONFIGURATION_ERROR"
            }
            _ => "INTERNAL_ERROR",
        }
    }

    /// Message safe to return to a client
    pub fn public_message(&self) -> String {
        match self.status_code() {
            500 => "internal error".to_string(),
            _ if self.is_token_rejection() && !matches!(self, Self::TokenExpired) => {
                "invalid token".to_string()
            }
            _ if matches!(self, Self::VerificationFailure) => "invalid credentials".to_string(),
            _ => self.to_string(),
        }
    }
}

impl From<kanban_db::DbError> for AuthError {
    fn from(err: kanban_db::DbError) -> Self {
        match err {
            kanban_db::DbError::AlreadyExists => Self::AlreadyExists,
            kanban_db::DbError::NotFound => Self::UserNotFound,
            kanban_db::DbError::Sqlx(e) => {
                tracing::error!("Database error: {}", e);
                Self::Database(e.to_string())
            }
        }
    }
}
