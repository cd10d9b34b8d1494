//! Owner authentication.
//!
//! This module provides:
//! - Password hashing with Argon2id and the sign-up password policy
//! - User and session records
//! - The identity service (register, login, refresh, logout)

mod password;
mod service;
mod types;

pub use password::{
    MIN_PASSWORD_LENGTH, PasswordError, check_password_policy, hash_password, verify_password,
};
pub use service::{AuthError, AuthService, hash_token, normalize_email};
pub use types::{NewSession, NewUser, Session, User};
