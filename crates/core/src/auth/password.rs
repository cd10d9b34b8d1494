//! Password hashing with Argon2id.
//!
//! Uses the recommended Argon2id variant with secure defaults, plus the
//! sign-up policy applied before a password is ever hashed.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, PasswordHash,
};
use thiserror::Error;

/// Errors that can occur during password operations.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// Failed to hash password.
    #[error("failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password.
    #[error("failed to verify password: {0}")]
    VerifyError(String),

    /// Invalid password hash format.
    #[error("invalid password hash format")]
    InvalidHash,

    /// Password is shorter than the policy minimum.
    #[error("Password must be at least {min} characters")]
    TooShort {
        /// Minimum length in characters.
        min: usize,
    },

    /// Password and its confirmation differ.
    #[error("Passwords do not match")]
    Mismatch,
}

impl PasswordError {
    /// Returns true if the error is a policy violation the caller can fix.
    #[must_use]
    pub const fn is_policy_violation(&self) -> bool {
        matches!(self, Self::TooShort { .. } | Self::Mismatch)
    }
}

/// Minimum password length in characters.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Checks a new password against the sign-up policy.
///
/// # Errors
///
/// Returns `PasswordError::Mismatch` if the confirmation differs and
/// `PasswordError::TooShort` if the password has fewer than
/// [`MIN_PASSWORD_LENGTH`] characters.
///
/// # Example
///
/// ```
/// use bahi_core::auth::check_password_policy;
///
/// assert!(check_password_policy("secret1", "secret1").is_ok());
/// assert!(check_password_policy("secret1", "secret2").is_err());
/// assert!(check_password_policy("abc", "abc").is_err());
/// ```
pub fn check_password_policy(password: &str, repeat_password: &str) -> Result<(), PasswordError> {
    if password != repeat_password {
        return Err(PasswordError::Mismatch);
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(PasswordError::TooShort {
            min: MIN_PASSWORD_LENGTH,
        });
    }
    Ok(())
}

/// Hashes a password using Argon2id.
///
/// # Arguments
///
/// * `password` - The plaintext password to hash.
///
/// # Returns
///
/// The hashed password as a PHC string format.
///
/// # Errors
///
/// Returns `PasswordError::HashError` if hashing fails.
///
/// # Example
///
/// ```
/// use bahi_core::auth::hash_password;
///
/// let hash = hash_password("my_secure_password").unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::HashError(e.to_string()))
}

/// Verifies a password against a hash.
///
/// # Arguments
///
/// * `password` - The plaintext password to verify.
/// * `hash` - The stored password hash (PHC string format).
///
/// # Returns
///
/// `true` if the password matches, `false` otherwise.
///
/// # Errors
///
/// Returns `PasswordError::InvalidHash` if the hash format is invalid.
/// Returns `PasswordError::VerifyError` if verification fails unexpectedly.
///
/// # Example
///
/// ```
/// use bahi_core::auth::{hash_password, verify_password};
///
/// let hash = hash_password("my_password").unwrap();
/// assert!(verify_password("my_password", &hash).unwrap());
/// assert!(!verify_password("wrong_password", &hash).unwrap());
/// ```
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHash)?;

    let argon2 = Argon2::default();

    match argon2.verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(e.to_string())),
    }
}
