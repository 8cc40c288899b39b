//! Kanban DB - Credential storage
//!
//! The auth core only talks to storage through [`CredentialRepository`].
//! Two implementations are provided: PostgreSQL via SQLx and an in-memory
//! map for tests and local runs.
//!
//! # Example
//!
//! ```rust,ignore
//! use kanban_db::{create_pool, run_migrations, PgCredentialRepository};
//!
//! let pool = create_pool("postgres://localhost/kanban").await?;
//! run_migrations(&pool).await?;
//! let users = PgCredentialRepository::new(pool);
//! ```

pub mod error;
pub mod memory;
pub mod models;
pub mod pg;
pub mod pool;
pub mod repo;

pub use error::{DbError, DbResult};
pub use memory::MemoryCredentialRepository;
pub use models::*;
pub use pg::PgCredentialRepository;
pub use pool::{create_pool, run_migrations, DbPool};
pub use repo::*;
