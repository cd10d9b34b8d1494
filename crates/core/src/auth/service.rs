//! Registration, login and refresh-session handling.

use std::sync::Arc;

use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{info, warn};

use bahi_shared::auth::{LoginRequest, RegisterRequest, TokenKind, TokenPair};
use bahi_shared::jwt::{IssuedToken, JwtError, JwtService};
use bahi_shared::types::OwnerId;

use super::password::{PasswordError, check_password_policy, hash_password, verify_password};
use super::types::{NewSession, NewUser, User};
use crate::store::{IdentityStore, StoreError};

/// Errors that can occur during authentication.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email is blank, malformed or longer than [`MAX_EMAIL_LEN`].
    #[error("A valid email address is required")]
    InvalidEmail,

    /// Username is longer than [`MAX_USERNAME_LEN`].
    #[error("Username must be at most {max} characters", max = MAX_USERNAME_LEN)]
    UsernameTooLong,

    /// Password violates the sign-up policy, or hashing failed.
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Email already registered.
    #[error("Email is already registered")]
    EmailTaken,

    /// Unknown email or wrong password.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Account has been disabled.
    #[error("This account has been disabled")]
    AccountDisabled,

    /// Token failed validation, or its session is revoked or expired.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// Owner referenced by a valid token no longer exists.
    #[error("User not found")]
    UserNotFound,

    /// Token could not be issued.
    #[error("Token error: {0}")]
    Token(JwtError),

    /// The identity store failed.
    #[error("Storage failure: {0}")]
    Store(#[from] StoreError),
}

/// Longest accepted email address, in characters.
pub const MAX_EMAIL_LEN: usize = 255;

/// Longest accepted username, in characters.
pub const MAX_USERNAME_LEN: usize = 255;

/// Hashes a refresh token for storage.
#[must_use]
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Lowercases and trims an email, rejecting obviously malformed input.
///
/// # Errors
///
/// Returns `AuthError::InvalidEmail` unless the address has a non-empty
/// local part and a domain and fits in [`MAX_EMAIL_LEN`].
pub fn normalize_email(email: &str) -> Result<String, AuthError> {
    let email = email.trim().to_lowercase();
    if email.chars().count() > MAX_EMAIL_LEN {
        return Err(AuthError::InvalidEmail);
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(email)
        }
        _ => Err(AuthError::InvalidEmail),
    }
}

fn default_username(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}

/// Identity service over an [`IdentityStore`] and a [`JwtService`].
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn IdentityStore>,
    jwt: Arc<JwtService>,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("jwt", &self.jwt)
            .finish_non_exhaustive()
    }
}

impl AuthService {
    /// Creates a new auth service.
    #[must_use]
    pub fn new(store: Arc<dyn IdentityStore>, jwt: Arc<JwtService>) -> Self {
        Self { store, jwt }
    }

    /// The JWT service used to issue and check tokens.
    #[must_use]
    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    /// Registers a new owner.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a bad email or password and
    /// `AuthError::EmailTaken` if the email is already registered.
    pub async fn register(&self, request: RegisterRequest) -> Result<User, AuthError> {
        let email = normalize_email(&request.email)?;
        check_password_policy(&request.password, &request.repeat_password)?;

        if self.store.find_user_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let username = request
            .username
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| default_username(&email));
        if username.chars().count() > MAX_USERNAME_LEN {
            return Err(AuthError::UsernameTooLong);
        }
        let password_hash = hash_password(&request.password)?;

        let user = self
            .store
            .create_user(NewUser {
                email,
                username,
                password_hash,
            })
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => AuthError::EmailTaken,
                other => AuthError::Store(other),
            })?;

        info!(owner_id = %user.id, "Owner registered");
        Ok(user)
    }

    /// Verifies credentials and opens a refresh session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for an unknown email or wrong
    /// password and `AuthError::AccountDisabled` for a disabled account.
    pub async fn login(&self, request: LoginRequest) -> Result<(User, TokenPair), AuthError> {
        let email = normalize_email(&request.email).map_err(|_| AuthError::InvalidCredentials)?;

        let Some(user) = self.store.find_user_by_email(&email).await? else {
            info!("Login attempt for unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        if !user.is_active {
            return Err(AuthError::AccountDisabled);
        }

        if !verify_password(&request.password, &user.password_hash)? {
            info!(owner_id = %user.id, "Failed login attempt - invalid password");
            return Err(AuthError::InvalidCredentials);
        }

        let access = self
            .jwt
            .generate_access_token(user.id, &user.email)
            .map_err(AuthError::Token)?;
        let refresh = self
            .jwt
            .generate_refresh_token(user.id, &user.email)
            .map_err(AuthError::Token)?;

        self.store
            .create_session(NewSession {
                user_id: user.id,
                refresh_token_hash: hash_token(&refresh.token),
                expires_at: refresh.expires_at,
            })
            .await?;

        info!(owner_id = %user.id, "Owner logged in");
        let tokens = TokenPair::new(access.token, refresh.token, self.jwt.access_token_expires_in());
        Ok((user, tokens))
    }

    /// Exchanges a refresh token for a new access token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if the token is invalid or its
    /// session has been revoked or has expired.
    pub async fn refresh(&self, refresh_token: &str) -> Result<IssuedToken, AuthError> {
        let claims = self
            .jwt
            .validate_kind(refresh_token, TokenKind::Refresh)
            .map_err(|_| AuthError::InvalidToken)?;

        let Some(session) = self
            .store
            .find_active_session(&hash_token(refresh_token))
            .await?
        else {
            warn!(owner_id = %claims.owner_id(), "Refresh with revoked or unknown session");
            return Err(AuthError::InvalidToken);
        };

        let user = self
            .store
            .find_user_by_id(session.user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;
        if !user.is_active {
            return Err(AuthError::AccountDisabled);
        }

        self.jwt
            .generate_access_token(user.id, &user.email)
            .map_err(AuthError::Token)
    }

    /// Revokes the session behind a refresh token.
    ///
    /// Returns `false` if no live session matched.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Store` if the store fails.
    pub async fn logout(&self, refresh_token: &str) -> Result<bool, AuthError> {
        let Some(session) = self
            .store
            .find_active_session(&hash_token(refresh_token))
            .await?
        else {
            return Ok(false);
        };

        let revoked = self.store.revoke_session(session.id).await?;
        info!(owner_id = %session.user_id, "Owner logged out");
        Ok(revoked)
    }

    /// Revokes every live session of an owner.
    ///
    /// Returns how many sessions were revoked.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Store` if the store fails.
    pub async fn logout_all(&self, owner: OwnerId) -> Result<u64, AuthError> {
        let revoked = self.store.revoke_user_sessions(owner).await?;
        info!(owner_id = %owner, revoked, "Owner logged out everywhere");
        Ok(revoked)
    }

    /// Looks up the owner behind an access token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the owner no longer exists.
    pub async fn current_user(&self, owner: OwnerId) -> Result<User, AuthError> {
        self.store
            .find_user_by_id(owner)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}
