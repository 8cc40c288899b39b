//! Kanban Types - Shared domain types
//!
//! This crate contains domain types used across kanban services:
//! - User identity
//! - Verified principals and token pairs
//! - Credential request/response payloads

pub mod auth;
pub mod user;

pub use auth::*;
pub use user::*;
