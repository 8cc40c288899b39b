//! Axum extractors for authentication

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use kanban_types::Principal;

use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated user extracted from request
///
/// Requires an access token; refresh tokens are rejected.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Principal);

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let principal = app_state.auth.authorize(&parts.headers, true).map_err(|e| {
            tracing::debug!(error = %e, "Request authorization failed");
            ApiError::from(e)
        })?;

        Ok(Self(principal))
    }
}
