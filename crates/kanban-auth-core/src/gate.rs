//! Request authorization
//!
//! Turns an `Authorization: Bearer <token>` header into a [`Principal`].
//! Header shape is checked before any cryptographic work.

use http::header::AUTHORIZATION;
use http::HeaderMap;
use kanban_types::Principal;

use crate::{AuthError, TokenVerifier};

/// Required scheme prefix, including the separating space
pub const BEARER_PREFIX: &str = "Bearer ";

/// Extract the token from a `Bearer <token>` header value
pub fn bearer_token(header_value: &str) -> Result<&str, AuthError> {
    let token = header_value
        .strip_prefix(BEARER_PREFIX)
        .ok_or(AuthError::MalformedAuthorizationHeader)?;
    if token.is_empty() || token.chars().any(char::is_whitespace) {
        return Err(AuthError::MalformedAuthorizationHeader);
    }
    Ok(token)
}

/// Authorization gate in front of protected routes
#[derive(Debug, Clone)]
pub struct AuthorizationGate {
    verifier: TokenVerifier,
}

impl AuthorizationGate {
    pub fn new(verifier: TokenVerifier) -> Self {
        Self { verifier }
    }

    pub fn verifier(&self) -> &TokenVerifier {
        &self.verifier
    }

    /// Authorize a request from its headers
    ///
    /// Exactly one `Authorization` header must be present.
    pub fn authorize(&self, headers: &HeaderMap, require_access: bool) -> Result<Principal, AuthError> {
        let mut values = headers.get_all(AUTHORIZATION).iter();
        let (Some(value), None) = (values.next(), values.next()) else {
            tracing::debug!("Missing or repeated authorization header");
            return Err(AuthError::MalformedAuthorizationHeader);
        };
        let value = value
            .to_str()
            .map_err(|_| AuthError::MalformedAuthorizationHeader)?;
        self.authorize_header(value, require_access)
    }

    /// Authorize a raw header value
    pub fn authorize_header(&self, header_value: &str, require_access: bool) -> Result<Principal, AuthError> {
        let token = bearer_token(header_value)?;
        let principal = self.verifier.verify(token)?;

        if require_access && !principal.is_access {
            tracing::debug!(
                user_id = %principal.user_id,
                token_class = principal.token_class(),
                "Refresh token presented where access token required"
            );
            return Err(AuthError::WrongTokenClass);
        }

        Ok(principal)
    }
}
