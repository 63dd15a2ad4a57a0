//! Authentication error types.

use bigbazar_core::{EmailError, PhoneError};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::tokens::TokenError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Invalid phone format.
    #[error("invalid phone: {0}")]
    InvalidPhone(#[from] PhoneError),

    /// Password too weak.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Password and confirmation differ.
    #[error("password and confirmation password do not match")]
    PasswordMismatch,

    /// Invalid credentials (wrong password or user not found - deliberately
    /// not distinguished).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Email already registered.
    #[error("user with this email already exists")]
    EmailTaken,

    /// Phone already registered.
    #[error("user with this phone already exists")]
    PhoneTaken,

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Token issuance error.
    #[error("token error: {0}")]
    Token(#[from] TokenError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
