//! Authentication service.
//!
//! Owns the credential lifecycle: registration with the password/phone
//! policies, login with password verification and token minting, and the
//! password-aware partial update of an account.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use bigbazar_core::{Email, Phone, UserId};

use crate::db::RepositoryError;
use crate::db::users::{UserChanges, UserRepository};
use crate::models::User;
use crate::services::tokens::{TokenIssuer, TokenPair};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Special characters, at least one of which every password must contain.
const PASSWORD_SPECIAL_CHARS: &[char] = &['$', '%', '&', '!', ':'];

/// Registration input as submitted by the client.
#[derive(Debug)]
pub struct Registration<'r> {
    pub name: &'r str,
    pub email: &'r str,
    pub phone: &'r str,
    pub password: &'r str,
    pub confirm_password: &'r str,
}

/// Partial account update; `None` fields are left unchanged. A supplied
/// password is policy-checked and re-hashed.
#[derive(Debug, Default)]
pub struct AccountUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
}

/// Authentication service.
///
/// Handles user registration, login, and account updates.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    tokens: &'a TokenIssuer,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, tokens: &'a TokenIssuer) -> Self {
        Self {
            users: UserRepository::new(pool),
            tokens,
        }
    }

    /// Register a new user.
    ///
    /// Input is validated once here, at the boundary; uniqueness of email and
    /// phone is left to the store so concurrent registrations cannot race
    /// past a pre-check.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail`/`InvalidPhone` on malformed input,
    /// `AuthError::PasswordMismatch` if the confirmation differs,
    /// `AuthError::WeakPassword` if the password fails policy, and
    /// `AuthError::EmailTaken`/`PhoneTaken` on a uniqueness conflict.
    pub async fn register(&self, registration: Registration<'_>) -> Result<User, AuthError> {
        let email = Email::parse(registration.email)?;
        let phone = Phone::parse(registration.phone)?;

        if registration.password != registration.confirm_password {
            return Err(AuthError::PasswordMismatch);
        }
        validate_password(registration.password)?;

        let password_hash = hash_password(registration.password)?;

        let user = self
            .users
            .create(registration.name, &email, &phone, &password_hash)
            .await
            .map_err(map_conflict)?;

        Ok(user)
    }

    /// Login with email and password, minting the token pair on success.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email is unknown or the
    /// password is wrong; the two cases are indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair, AuthError> {
        let email = Email::parse(email)?;

        let (user, password_hash) = self
            .users
            .get_with_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        let pair = self.tokens.issue_pair(user.email.as_str())?;

        Ok(pair)
    }

    /// Partially update an account, re-validating whatever is supplied.
    ///
    /// Returns `None` if no user with that ID exists.
    ///
    /// # Errors
    ///
    /// Same validation errors as [`Self::register`] for the supplied fields;
    /// `AuthError::EmailTaken`/`PhoneTaken` if the new value collides with
    /// another account.
    pub async fn update_account(
        &self,
        id: UserId,
        update: AccountUpdate,
    ) -> Result<Option<User>, AuthError> {
        let email = update.email.as_deref().map(Email::parse).transpose()?;
        let phone = update.phone.as_deref().map(Phone::parse).transpose()?;

        let password_hash = match update.password.as_deref() {
            Some(password) => {
                validate_password(password)?;
                Some(hash_password(password)?)
            }
            None => None,
        };

        let user = self
            .users
            .update(
                id,
                UserChanges {
                    name: update.name,
                    email,
                    phone,
                    password_hash,
                },
            )
            .await
            .map_err(map_conflict)?;

        Ok(user)
    }
}

/// Translate a repository conflict into the taken-field error.
fn map_conflict(e: RepositoryError) -> AuthError {
    match e {
        RepositoryError::Conflict(ref message) if message.contains("phone") => AuthError::PhoneTaken,
        RepositoryError::Conflict(_) => AuthError::EmailTaken,
        other => AuthError::Repository(other),
    }
}

/// Validate password meets policy.
///
/// # Errors
///
/// Returns `AuthError::WeakPassword` naming the unmet rule.
pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(AuthError::WeakPassword(
            "password must contain at least 1 uppercase letter".to_owned(),
        ));
    }

    if !password.chars().any(|c| PASSWORD_SPECIAL_CHARS.contains(&c)) {
        return Err(AuthError::WeakPassword(format!(
            "password must include at least 1 special character ({})",
            PASSWORD_SPECIAL_CHARS.iter().collect::<String>()
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` on any mismatch, including a
/// malformed stored hash.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_password_too_short() {
        let result = validate_password("Ab$1");
        assert!(matches!(result, Err(AuthError::WeakPassword(msg)) if msg.contains("8 characters")));
    }

    #[test]
    fn test_password_missing_uppercase() {
        let result = validate_password("password123!");
        assert!(matches!(result, Err(AuthError::WeakPassword(msg)) if msg.contains("uppercase")));
    }

    #[test]
    fn test_password_missing_special_char() {
        let result = validate_password("Password123");
        assert!(matches!(result, Err(AuthError::WeakPassword(msg)) if msg.contains("special")));
    }

    #[test]
    fn test_password_each_special_char_accepted() {
        for c in PASSWORD_SPECIAL_CHARS {
            let password = format!("Password12{c}");
            assert!(validate_password(&password).is_ok(), "rejected {c}");
        }
    }

    #[test]
    fn test_valid_password() {
        assert!(validate_password("Password123!").is_ok());
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("Password123!").unwrap();

        // The stored hash is never the raw password
        assert_ne!(hash, "Password123!");
        assert!(hash.starts_with("$argon2"));

        // Correct password verifies, anything else does not
        assert!(verify_password("Password123!", &hash).is_ok());
        assert!(matches!(
            verify_password("WrongPassword123!", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("Password123!").unwrap();
        let second = hash_password("Password123!").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_malformed_hash() {
        assert!(matches!(
            verify_password("Password123!", "not-a-phc-string"),
            Err(AuthError::InvalidCredentials)
        ));
    }
}
