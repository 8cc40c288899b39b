//! Kanban Auth Core - Identity and authorization
//!
//! Stateless RS256 session tokens and the request-time gate in front of
//! every protected route:
//! - RSA key pair loading ([`KeyPair`])
//! - Argon2id password hashing ([`PasswordHasher`])
//! - Access/refresh token issuance and verification ([`TokenIssuer`], [`TokenVerifier`])
//! - Bearer header authorization ([`AuthorizationGate`])
//! - Register/login/change-password/refresh flows ([`AuthService`])

pub mod config;
pub mod error;
pub mod gate;
pub mod keys;
pub mod password;
pub mod service;
pub mod token;

pub use config::*;
pub use error::*;
pub use gate::*;
pub use keys::*;
pub use password::*;
pub use service::*;
pub use token::*;
