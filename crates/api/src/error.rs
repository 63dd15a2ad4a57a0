//! Unified error handling.
//!
//! Provides a unified `AppError` type that maps every layer's failure onto an
//! HTTP status and a safe client message. All route handlers return
//! `Result<T, AppError>`. Server-side causes are logged before being masked;
//! raw storage error text never reaches the boundary.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::carts::CartError;
use crate::services::products::CatalogError;

/// JSON error body returned by every failing request.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable error message.
    pub message: String,
}

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Catalog operation failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Cart operation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Log server errors with their cause before masking them
        if status.is_server_error() {
            tracing::error!(error = %self, "Request error");
        }

        let message = self.client_message();

        (status, Json(ErrorBody { message })).into_response()
    }
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Database(err) => repository_status(err),
            Self::Auth(err) => match err {
                AuthError::InvalidEmail(_)
                | AuthError::InvalidPhone(_)
                | AuthError::WeakPassword(_)
                | AuthError::PasswordMismatch => StatusCode::BAD_REQUEST,
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::EmailTaken | AuthError::PhoneTaken => StatusCode::CONFLICT,
                AuthError::PasswordHash | AuthError::Token(_) => StatusCode::INTERNAL_SERVER_ERROR,
                AuthError::Repository(err) => repository_status(err),
            },
            Self::Catalog(err) => match err {
                CatalogError::NameTooLong { .. }
                | CatalogError::InvalidPrice(_)
                | CatalogError::InvalidPagination(_) => StatusCode::BAD_REQUEST,
                CatalogError::Repository(err) => repository_status(err),
            },
            Self::Cart(err) => match err {
                CartError::ProductNotFound => StatusCode::NOT_FOUND,
                CartError::Repository(err) => repository_status(err),
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    /// The message exposed to clients. Internal error details stay out of
    /// responses; auth failures keep wrong-password and unknown-user
    /// indistinguishable.
    fn client_message(&self) -> String {
        match self {
            Self::Database(err) => repository_message(err),
            Self::Auth(err) => match err {
                AuthError::InvalidEmail(_) => "Invalid email address".to_owned(),
                AuthError::InvalidPhone(e) => format!("Invalid phone: {e}"),
                AuthError::WeakPassword(msg) => msg.clone(),
                AuthError::PasswordMismatch => {
                    "Password and confirmation password do not match".to_owned()
                }
                AuthError::InvalidCredentials => "Invalid credentials".to_owned(),
                AuthError::EmailTaken => "User with this email already exists".to_owned(),
                AuthError::PhoneTaken => "User with this phone already exists".to_owned(),
                AuthError::PasswordHash | AuthError::Token(_) => {
                    "Internal server error".to_owned()
                }
                AuthError::Repository(err) => repository_message(err),
            },
            Self::Catalog(err) => match err {
                CatalogError::NameTooLong { .. }
                | CatalogError::InvalidPrice(_)
                | CatalogError::InvalidPagination(_) => err.to_string(),
                CatalogError::Repository(err) => repository_message(err),
            },
            Self::Cart(err) => match err {
                CartError::ProductNotFound => "Product not found".to_owned(),
                CartError::Repository(err) => repository_message(err),
            },
            Self::NotFound(msg) => msg.clone(),
        }
    }
}

fn repository_status(err: &RepositoryError) -> StatusCode {
    match err {
        RepositoryError::Conflict(_) => StatusCode::CONFLICT,
        RepositoryError::NotFound => StatusCode::NOT_FOUND,
        RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn repository_message(err: &RepositoryError) -> String {
    match err {
        // Conflict text is generated by our repositories, never raw driver output
        RepositoryError::Conflict(msg) => msg.clone(),
        RepositoryError::NotFound => "Not found".to_owned(),
        RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
            "Internal server error".to_owned()
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        let response = err.into_response();
        response.status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("Product not found".to_string());
        assert_eq!(err.to_string(), "Not found: Product not found");
    }

    #[test]
    fn test_validation_errors_are_bad_request() {
        assert_eq!(
            get_status(AppError::Auth(AuthError::WeakPassword(
                "password must be at least 8 characters".to_string()
            ))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::PasswordMismatch)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Catalog(CatalogError::NameTooLong { max: 150 })),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_credential_errors_are_unauthorized() {
        assert_eq!(
            get_status(AppError::Auth(AuthError::InvalidCredentials)),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_uniqueness_errors_are_conflict() {
        assert_eq!(
            get_status(AppError::Auth(AuthError::EmailTaken)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::PhoneTaken)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Database(RepositoryError::Conflict(
                "user with this email already exists".to_string()
            ))),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_missing_entities_are_not_found() {
        assert_eq!(
            get_status(AppError::NotFound("User not found".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Cart(CartError::ProductNotFound)),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_internal_errors_are_masked() {
        let err = AppError::Database(RepositoryError::DataCorruption("bad email".to_string()));
        assert_eq!(err.client_message(), "Internal server error");
        assert_eq!(get_status(err), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_login_failure_does_not_leak_cause() {
        // Unknown user and wrong password produce the same message
        let err = AppError::Auth(AuthError::InvalidCredentials);
        assert_eq!(err.client_message(), "Invalid credentials");
    }
}
