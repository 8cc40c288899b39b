//! Authentication types

use serde::{Deserialize, Serialize};

use crate::UserId;

/// Verified identity resolved from a token.
///
/// Only produced by successful token verification; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    /// User the token was issued to
    pub user_id: UserId,
    /// Whether the token was an access token (`false` for refresh tokens)
    pub is_access: bool,
}

impl Principal {
    pub fn new(user_id: UserId, is_access: bool) -> Self {
        Self { user_id, is_access }
    }

    /// Human readable token class, for logs
    pub fn token_class(&self) -> &'static str {
        if self.is_access {
            "access"
        } else {
            "refresh"
        }
    }
}

/// Token pair returned after authentication
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Access token (short-lived)
    pub access_token: String,
    /// Refresh token (long-lived)
    pub refresh_token: String,
    /// Access token lifetime in seconds
    pub expires_in: u64,
    /// Token type (always "Bearer")
    pub token_type: String,
}

impl TokenPair {
    pub fn bearer(access_token: String, refresh_token: String, expires_in: u64) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_in,
            token_type: "Bearer".to_string(),
        }
    }
}

/// Result of register, login and refresh: the user plus a fresh token pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedTokens {
    pub id: UserId,
    #[serde(flatten)]
    pub tokens: TokenPair,
}

/// Registration request
#[derive(Clone, Deserialize, Serialize)]
pub struct RegisterRequest {
    pub login: String,
    pub password: String,
}

/// Login request
#[derive(Clone, Deserialize, Serialize)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

/// Password change request
#[derive(Clone, Deserialize, Serialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
    pub new_password_again: String,
}

/// Token refresh request
#[derive(Clone, Deserialize, Serialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("login", &self.login)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("login", &self.login)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for ChangePasswordRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangePasswordRequest").finish_non_exhaustive()
    }
}

impl std::fmt::Debug for RefreshRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshRequest").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issued_tokens_flattens_pair() {
        let issued = IssuedTokens {
            id: UserId::new(),
            tokens: TokenPair::bearer("a.b.c".into(), "d.e.f".into(), 1200),
        };
        let json = serde_json::to_value(&issued).unwrap();
        assert_eq!(json["access_token"], "a.b.c");
        assert_eq!(json["refresh_token"], "d.e.f");
        assert_eq!(json["expires_in"], 1200);
        assert_eq!(json["token_type"], "Bearer");
        assert_eq!(json["id"], issued.id.to_string());
    }

    #[test]
    fn test_debug_never_prints_passwords() {
        let req = LoginRequest {
            login: "alice@example.com".into(),
            password: "hunter22".into(),
        };
        let printed = format!("{req:?}");
        assert!(printed.contains("alice@example.com"));
        assert!(!printed.contains("hunter22"));

        let change = ChangePasswordRequest {
            old_password: "old-secret".into(),
            new_password: "new-secret".into(),
            new_password_again: "new-secret".into(),
        };
        assert!(!format!("{change:?}").contains("secret"));
    }

    #[test]
    fn test_change_password_request_field_names() {
        let req: ChangePasswordRequest = serde_json::from_str(
            r#"{"old_password":"a","new_password":"b","new_password_again":"c"}"#,
        )
        .unwrap();
        assert_eq!(req.old_password, "a");
        assert_eq!(req.new_password, "b");
        assert_eq!(req.new_password_again, "c");
    }
}
