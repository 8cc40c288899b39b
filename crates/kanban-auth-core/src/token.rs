//! Session token issuance and verification
//!
//! Tokens are compact RS256 JWS strings. The issuer claim carries the user
//! ID and a boolean `access` claim separates access from refresh tokens.

use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, Header, Validation};
use kanban_types::{Principal, TokenPair, UserId};
use serde::{Deserialize, Serialize};

use crate::{AuthConfig, AuthError, KeyPair};

/// Algorithm used to sign new tokens
pub const SIGNING_ALGORITHM: Algorithm = Algorithm::RS256;

/// Algorithms accepted on verification
pub const ACCEPTED_ALGORITHMS: [Algorithm; 3] =
    [Algorithm::RS256, Algorithm::RS384, Algorithm::RS512];

/// Claims carried by every session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User ID
    pub iss: String,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Not before (unix seconds)
    pub nbf: i64,
    /// Expiration (unix seconds)
    pub exp: i64,
    /// `true` for access tokens, `false` for refresh tokens
    pub access: bool,
}

impl TokenClaims {
    pub fn new(user_id: UserId, is_access: bool, issued_at: DateTime<Utc>, lifetime: Duration) -> Self {
        let iat = issued_at.timestamp();
        let lifetime = i64::try_from(lifetime.as_secs()).unwrap_or(i64::MAX);
        Self {
            iss: user_id.to_string(),
            iat,
            nbf: iat,
            exp: iat.saturating_add(lifetime),
            access: is_access,
        }
    }

    /// Check if the token is expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// Signs access and refresh tokens
#[derive(Clone)]
pub struct TokenIssuer {
    keys: Arc<KeyPair>,
    access_lifetime: Duration,
    refresh_lifetime: Duration,
}

impl TokenIssuer {
    pub fn new(keys: Arc<KeyPair>, config: &AuthConfig) -> Self {
        Self {
            keys,
            access_lifetime: config.access_token_lifetime,
            refresh_lifetime: config.refresh_token_lifetime,
        }
    }

    /// Lifetime of the given token class
    pub fn lifetime(&self, is_access: bool) -> Duration {
        if is_access {
            self.access_lifetime
        } else {
            self.refresh_lifetime
        }
    }

    /// Issue a token valid from now
    pub fn issue(&self, user_id: UserId, is_access: bool) -> Result<String, AuthError> {
        self.issue_at(user_id, is_access, Utc::now())
    }

    /// Issue a token as if signed at `issued_at`
    pub fn issue_at(
        &self,
        user_id: UserId,
        is_access: bool,
        issued_at: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let claims = TokenClaims::new(user_id, is_access, issued_at, self.lifetime(is_access));
        encode(&Header::new(SIGNING_ALGORITHM), &claims, self.keys.encoding_key()).map_err(|e| {
            tracing::error!(user_id = %user_id, "Token signing failed: {}", e);
            AuthError::SigningFailure(e.to_string())
        })
    }

    /// Issue an access/refresh pair
    pub fn issue_pair(&self, user_id: UserId) -> Result<TokenPair, AuthError> {
        let issued_at = Utc::now();
        let access_token = self.issue_at(user_id, true, issued_at)?;
        let refresh_token = self.issue_at(user_id, false, issued_at)?;
        Ok(TokenPair::bearer(
            access_token,
            refresh_token,
            self.access_lifetime.as_secs(),
        ))
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("access_lifetime", &self.access_lifetime)
            .field("refresh_lifetime", &self.refresh_lifetime)
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
struct RawHeader {
    alg: String,
}

/// Verifies tokens and resolves them to a [`Principal`]
#[derive(Clone)]
pub struct TokenVerifier {
    keys: Arc<KeyPair>,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(keys: Arc<KeyPair>, config: &AuthConfig) -> Self {
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.algorithms = ACCEPTED_ALGORITHMS.to_vec();
        validation.leeway = config.leeway.as_secs();
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "nbf", "iss"]);

        Self { keys, validation }
    }

    /// Verify a compact token string
    pub fn verify(&self, token: &str) -> Result<Principal, AuthError> {
        check_header(token)?;

        let data = decode::<TokenClaims>(token, self.keys.decoding_key(), &self.validation)
            .map_err(|e| {
                tracing::debug!("Token validation failed: {}", e);
                map_jwt_error(e.kind())
            })?;

        let user_id = UserId::parse(&data.claims.iss).map_err(|_| {
            tracing::debug!("Token issuer is not a user ID");
            AuthError::InvalidIssuer
        })?;

        Ok(Principal::new(user_id, data.claims.access))
    }
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("leeway", &self.validation.leeway)
            .finish_non_exhaustive()
    }
}

// Checked before any signature work, so `none` and HMAC headers are
// refused outright instead of reaching key selection.
fn check_header(token: &str) -> Result<(), AuthError> {
    let mut parts = token.split('.');
    let (Some(header), Some(claims), Some(_signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        tracing::debug!("Token is not three dot-separated segments");
        return Err(AuthError::MalformedToken);
    };
    if header.is_empty() || claims.is_empty() {
        return Err(AuthError::MalformedToken);
    }

    let header = URL_SAFE_NO_PAD
        .decode(header)
        .map_err(|_| AuthError::MalformedToken)?;
    let header: RawHeader =
        serde_json::from_slice(&header).map_err(|_| AuthError::MalformedToken)?;

    match header.alg.parse::<Algorithm>() {
        Ok(alg) if ACCEPTED_ALGORITHMS.contains(&alg) => Ok(()),
        _ => {
            tracing::debug!(alg = %header.alg, "Rejected token algorithm");
            Err(AuthError::UnsupportedAlgorithm)
        }
    }
}

fn map_jwt_error(kind: &ErrorKind) -> AuthError {
    match kind {
        // The header already decoded, so a base64 failure here is the signature.
        ErrorKind::InvalidSignature | ErrorKind::Base64(_) => AuthError::InvalidSignature,
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        ErrorKind::ImmatureSignature => AuthError::TokenNotYetValid,
        ErrorKind::InvalidAlgorithm => AuthError::UnsupportedAlgorithm,
        ErrorKind::InvalidIssuer => AuthError::InvalidIssuer,
        _ => AuthError::MalformedToken,
    }
}
