//! Authentication types for JWT and tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::OwnerId;

/// Distinguishes short-lived access tokens from session refresh tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Authorizes API requests.
    Access,
    /// Exchanged for a new access token while its session is live.
    Refresh,
}

/// JWT claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (owner ID).
    pub sub: Uuid,
    /// Owner email at issue time.
    pub email: String,
    /// Token kind.
    pub kind: TokenKind,
    /// Unique token ID; keeps two tokens issued in the same second distinct.
    pub jti: Uuid,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for an owner.
    #[must_use]
    pub fn new(owner_id: Uuid, email: &str, kind: TokenKind, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: owner_id,
            email: email.to_string(),
            kind,
            jti: Uuid::new_v4(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the owner ID from claims.
    #[must_use]
    pub const fn owner_id(&self) -> OwnerId {
        OwnerId::from_uuid(self.sub)
    }

    /// Returns the expiry as a timestamp.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}

/// Token pair returned after successful authentication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Access token (short-lived).
    pub access_token: String,
    /// Refresh token (long-lived, bound to a session).
    pub refresh_token: String,
    /// Access token expiration in seconds.
    pub expires_in: i64,
}

impl TokenPair {
    /// Creates a new token pair.
    #[must_use]
    pub fn new(access_token: String, refresh_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_in,
        }
    }
}

/// Login request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Owner email.
    pub email: String,
    /// Owner password.
    pub password: String,
}

/// Registration request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    /// Owner email.
    pub email: String,
    /// Password.
    pub password: String,
    /// Password typed a second time.
    pub repeat_password: String,
    /// Display name; derived from the email when absent.
    pub username: Option<String>,
}

/// Login response payload.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// Authenticated owner.
    pub user: UserInfo,
    /// Access and refresh tokens.
    #[serde(flatten)]
    pub tokens: TokenPair,
}

/// Owner info returned in auth responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    /// Owner ID.
    pub id: Uuid,
    /// Email.
    pub email: String,
    /// Display name.
    pub username: String,
}

/// Refresh token request.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshRequest {
    /// The refresh token.
    pub refresh_token: String,
}

/// Logout request.
#[derive(Debug, Clone, Deserialize)]
pub struct LogoutRequest {
    /// The refresh token to invalidate.
    pub refresh_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_claims_new_sets_correct_fields() {
        let owner = Uuid::new_v4();
        let expires_at = Utc::now() + Duration::hours(1);

        let claims = Claims::new(owner, "asha@shop.test", TokenKind::Access, expires_at);

        assert_eq!(claims.sub, owner);
        assert_eq!(claims.owner_id().into_inner(), owner);
        assert_eq!(claims.email, "asha@shop.test");
        assert_eq!(claims.kind, TokenKind::Access);
        assert!(claims.iat <= Utc::now().timestamp());
        assert_eq!(claims.exp, expires_at.timestamp());
        assert_eq!(claims.expires_at().timestamp(), expires_at.timestamp());
    }

    #[test]
    fn test_token_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&TokenKind::Refresh).unwrap(),
            "\"refresh\""
        );
    }

    #[test]
    fn test_login_response_flattens_tokens() {
        let response = LoginResponse {
            user: UserInfo {
                id: Uuid::nil(),
                email: "a@b.test".into(),
                username: "a".into(),
            },
            tokens: TokenPair::new("acc".into(), "ref".into(), 900),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["access_token"], "acc");
        assert_eq!(json["refresh_token"], "ref");
        assert_eq!(json["expires_in"], 900);
        assert_eq!(json["user"]["username"], "a");
    }
}
