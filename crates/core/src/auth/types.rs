//! Identity records: shop owners and their refresh sessions.

use chrono::{DateTime, Utc};

use bahi_shared::auth::UserInfo;
use bahi_shared::types::{OwnerId, SessionId};

/// A registered shop owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Owner ID; every ledger row is scoped by it.
    pub id: OwnerId,
    /// Lowercased email, unique.
    pub email: String,
    /// Display name.
    pub username: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    /// Disabled accounts cannot log in or refresh.
    pub is_active: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Builds a fresh active user.
    #[must_use]
    pub fn new(input: NewUser, now: DateTime<Utc>) -> Self {
        Self {
            id: OwnerId::new(),
            email: input.email,
            username: input.username,
            password_hash: input.password_hash,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Public view of the user.
    #[must_use]
    pub fn info(&self) -> UserInfo {
        UserInfo {
            id: self.id.into_inner(),
            email: self.email.clone(),
            username: self.username.clone(),
        }
    }
}

/// A user ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Lowercased email.
    pub email: String,
    /// Display name.
    pub username: String,
    /// Argon2id PHC string.
    pub password_hash: String,
}

/// A server-side refresh session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Session ID.
    pub id: SessionId,
    /// Owner the session belongs to.
    pub user_id: OwnerId,
    /// SHA-256 hex of the refresh token.
    pub refresh_token_hash: String,
    /// Hard expiry.
    pub expires_at: DateTime<Utc>,
    /// Set on logout.
    pub revoked_at: Option<DateTime<Utc>>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Builds a fresh session.
    #[must_use]
    pub fn new(input: NewSession, now: DateTime<Utc>) -> Self {
        Self {
            id: SessionId::new(),
            user_id: input.user_id,
            refresh_token_hash: input.refresh_token_hash,
            expires_at: input.expires_at,
            revoked_at: None,
            created_at: now,
        }
    }

    /// True while the session is unrevoked and unexpired.
    #[must_use]
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.revoked_at.is_none() && self.expires_at > now
    }
}

/// A session ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSession {
    /// Owner the session belongs to.
    pub user_id: OwnerId,
    /// SHA-256 hex of the refresh token.
    pub refresh_token_hash: String,
    /// Hard expiry.
    pub expires_at: DateTime<Utc>,
}
