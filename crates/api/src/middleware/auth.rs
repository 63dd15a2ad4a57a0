//! Authentication extractor.
//!
//! Resolves the `Authorization: Bearer` token on a request to the account it
//! was issued for. A missing or malformed header, a failed signature or
//! expiry check, and an unknown subject all produce the same rejection, so a
//! caller cannot probe which stage failed.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{HeaderMap, StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};

use bigbazar_core::Email;

use crate::db::users::UserRepository;
use crate::error::ErrorBody;
use crate::models::User;
use crate::state::AppState;

/// Extractor that requires a valid bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.email)
/// }
/// ```
pub struct RequireAuth(pub User);

/// Rejection returned when a request cannot be authenticated.
pub enum AuthRejection {
    /// Token missing, invalid, expired, or its subject unknown.
    InvalidCredentials,
    /// The user lookup itself failed.
    Internal,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                Json(ErrorBody {
                    message: "Could not validate credentials".to_owned(),
                }),
            )
                .into_response(),
            Self::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    message: "Internal server error".to_owned(),
                }),
            )
                .into_response(),
        }
    }
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(AuthRejection::InvalidCredentials)?;

        let subject = state
            .tokens()
            .decode_subject(token)
            .map_err(|_| AuthRejection::InvalidCredentials)?;

        let email = Email::parse(&subject).map_err(|_| AuthRejection::InvalidCredentials)?;

        let user = UserRepository::new(state.pool())
            .get_by_email(&email)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "user lookup failed during authentication");
                AuthRejection::Internal
            })?
            .ok_or(AuthRejection::InvalidCredentials)?;

        Ok(Self(user))
    }
}

/// Extract the bearer token from the `Authorization` header, if present.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_bearer_token_present() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc.def.ghi"),
        );
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));
    }

    #[test]
    fn test_bearer_token_missing_header() {
        let headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn test_bearer_token_wrong_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Basic dXNlcjpwYXNz"),
        );
        assert_eq!(bearer_token(&headers), None);
    }
}
