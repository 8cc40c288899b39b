//! Database errors

use thiserror::Error;

/// Database errors
#[derive(Error, Debug)]
pub enum DbError {
    /// SQLx error
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Record not found
    #[error("record not found")]
    NotFound,

    /// Unique constraint violated (login already taken)
    #[error("record already exists")]
    AlreadyExists,
}

/// Result alias for repository operations
pub type DbResult<T> = Result<T, DbError>;

impl DbError {
    /// Map a SQLx error, turning unique violations into [`DbError::AlreadyExists`]
    pub(crate) fn from_insert(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => Self::AlreadyExists,
            other => Self::Sqlx(other),
        }
    }
}
