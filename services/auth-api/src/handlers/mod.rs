//! HTTP handlers

mod auth;
mod health;

pub use auth::{change_password, list_all, login, me, refresh, register};
pub use health::{health, ready};
