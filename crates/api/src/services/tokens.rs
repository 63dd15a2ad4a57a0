//! Token issuance and validation.
//!
//! Mints the signed, time-limited access/refresh token pair returned at login
//! and resolves bearer tokens back to their subject. Tokens are stateless:
//! nothing is persisted server-side and there is no revocation, so possession
//! alone grants the claimed identity until expiry.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AuthConfig;

/// Errors that can occur during token operations.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Signing failed.
    #[error("failed to issue token")]
    Issue(#[source] jsonwebtoken::errors::Error),

    /// The token failed signature, expiry, or claim validation. The cause is
    /// deliberately not distinguished.
    #[error("invalid token")]
    Invalid,
}

/// Claims carried by every issued token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's email address.
    pub sub: String,
    /// Expiry as a unix timestamp, fixed at issuance (no sliding expiration).
    pub exp: i64,
}

/// The token pair returned on successful login.
#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
}

/// Signs and validates tokens with the configured secret and algorithm.
///
/// Constructed once at startup from [`AuthConfig`] and shared through the
/// application state.
pub struct TokenIssuer {
    header: Header,
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    /// Create a new token issuer from the signing configuration.
    #[must_use]
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.jwt_secret.expose_secret().as_bytes();

        Self {
            header: Header::new(config.algorithm),
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation: Validation::new(config.algorithm),
            access_ttl: config.access_token_ttl,
            refresh_ttl: config.refresh_token_ttl,
        }
    }

    /// Issue the access/refresh pair for a subject.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Issue` if signing fails.
    pub fn issue_pair(&self, subject: &str) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            access_token: self.issue_access_token(subject)?,
            refresh_token: self.issue_refresh_token(subject)?,
            token_type: "bearer",
        })
    }

    /// Issue a short-lived access token for a subject.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Issue` if signing fails.
    pub fn issue_access_token(&self, subject: &str) -> Result<String, TokenError> {
        self.issue(subject, self.access_ttl)
    }

    /// Issue a long-lived refresh token for a subject.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Issue` if signing fails.
    pub fn issue_refresh_token(&self, subject: &str) -> Result<String, TokenError> {
        self.issue(subject, self.refresh_ttl)
    }

    fn issue(&self, subject: &str, ttl: Duration) -> Result<String, TokenError> {
        let claims = Claims {
            sub: subject.to_owned(),
            exp: (Utc::now() + ttl).timestamp(),
        };

        encode(&self.header, &claims, &self.encoding).map_err(TokenError::Issue)
    }

    /// Validate a token and return its subject.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Invalid` if the signature does not verify, the
    /// token is expired or malformed, or the subject claim is absent.
    pub fn decode_subject(&self, token: &str) -> Result<String, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|_| TokenError::Invalid)?;

        Ok(data.claims.sub)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use jsonwebtoken::Algorithm;
    use secrecy::SecretString;

    use super::*;

    fn test_config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: SecretString::from(secret.to_owned()),
            algorithm: Algorithm::HS256,
            access_token_ttl: Duration::minutes(30),
            refresh_token_ttl: Duration::days(7),
        }
    }

    #[test]
    fn test_issue_and_decode_roundtrip() {
        let issuer = TokenIssuer::new(&test_config("kY9mX2nQ5rT8vW1zB4dF7hJ0pS3uC6eG"));

        let token = issuer.issue_access_token("t@example.com").unwrap();
        assert!(!token.is_empty());

        let subject = issuer.decode_subject(&token).unwrap();
        assert_eq!(subject, "t@example.com");
    }

    #[test]
    fn test_pair_contains_bearer_type() {
        let issuer = TokenIssuer::new(&test_config("kY9mX2nQ5rT8vW1zB4dF7hJ0pS3uC6eG"));

        let pair = issuer.issue_pair("t@example.com").unwrap();
        assert_eq!(pair.token_type, "bearer");
        assert!(issuer.decode_subject(&pair.access_token).is_ok());
        assert!(issuer.decode_subject(&pair.refresh_token).is_ok());
    }

    #[test]
    fn test_expired_token_rejected() {
        // Negative TTL puts the expiry well past the validation leeway
        let config = AuthConfig {
            access_token_ttl: Duration::minutes(-5),
            ..test_config("kY9mX2nQ5rT8vW1zB4dF7hJ0pS3uC6eG")
        };
        let issuer = TokenIssuer::new(&config);

        let token = issuer.issue_access_token("t@example.com").unwrap();
        assert!(matches!(
            issuer.decode_subject(&token),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn test_different_secrets_reject() {
        let issuer1 = TokenIssuer::new(&test_config("kY9mX2nQ5rT8vW1zB4dF7hJ0pS3uC6eG"));
        let issuer2 = TokenIssuer::new(&test_config("zA1bC2dE3fG4hI5jK6lM7nO8pQ9rS0tU"));

        let token = issuer1.issue_access_token("t@example.com").unwrap();
        assert!(matches!(
            issuer2.decode_subject(&token),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let issuer = TokenIssuer::new(&test_config("kY9mX2nQ5rT8vW1zB4dF7hJ0pS3uC6eG"));

        assert!(matches!(
            issuer.decode_subject("not.a.token"),
            Err(TokenError::Invalid)
        ));
        assert!(matches!(issuer.decode_subject(""), Err(TokenError::Invalid)));
    }
}
