//! User route handlers.
//!
//! Registration and login are the public entry points of the credential
//! lifecycle; the remaining handlers expose the account CRUD surface.
//! Responses never include the password hash.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bigbazar_core::{Email, Phone, UserId};

use super::MessageResponse;
use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::models::User;
use crate::services::auth::{AccountUpdate, AuthService, Registration};
use crate::services::tokens::TokenPair;
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Partial update request body.
#[derive(Debug, Deserialize, Default)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
}

/// User response body. The password hash is deliberately absent.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub phone: Phone,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Register a new user and return the created account.
async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<UserResponse>> {
    let service = AuthService::new(state.pool(), state.tokens());

    let user = service
        .register(Registration {
            name: &body.name,
            email: &body.email,
            phone: &body.phone,
            password: &body.password,
            confirm_password: &body.confirm_password,
        })
        .await?;

    Ok(Json(user.into()))
}

/// Authenticate a user and return an access/refresh token pair.
async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<TokenPair>> {
    let service = AuthService::new(state.pool(), state.tokens());

    let pair = service.login(&body.email, &body.password).await?;

    Ok(Json(pair))
}

/// List all users.
async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>> {
    let users = UserRepository::new(state.pool()).list().await?;

    Ok(Json(users.into_iter().map(Into::into).collect()))
}

/// Get a user by ID.
async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<UserResponse>> {
    let user = UserRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_owned()))?;

    Ok(Json(user.into()))
}

/// Partially update a user. A supplied password is re-validated and
/// re-hashed before storage.
async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>> {
    let service = AuthService::new(state.pool(), state.tokens());

    let user = service
        .update_account(
            id,
            AccountUpdate {
                name: body.name,
                email: body.email,
                phone: body.phone,
                password: body.password,
            },
        )
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_owned()))?;

    Ok(Json(user.into()))
}

/// Delete a user by ID.
async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<MessageResponse>> {
    let deleted = UserRepository::new(state.pool()).delete(id).await?;

    if !deleted {
        return Err(AppError::NotFound("User not found".to_owned()));
    }

    Ok(Json(MessageResponse {
        message: "User deleted successfully".to_owned(),
    }))
}

/// Create the user routes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users/register", post(register))
        .route("/users/login", post(login))
        .route("/users", get(list_users))
        .route(
            "/users/{id}",
            get(get_user).patch(update_user).delete(delete_user),
        )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_response_omits_password_hash() {
        let response = UserResponse {
            id: UserId::new(1),
            name: "T".to_owned(),
            email: Email::parse("t@example.com").unwrap(),
            phone: Phone::parse("+71234567890").unwrap(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["email"], "t@example.com");
        assert_eq!(json["phone"], "+71234567890");
        assert!(json.get("password").is_none());
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn test_update_request_allows_partial_bodies() {
        let body: UpdateUserRequest = serde_json::from_str(r#"{"name": "Updated Name"}"#).unwrap();
        assert_eq!(body.name.as_deref(), Some("Updated Name"));
        assert!(body.email.is_none());
        assert!(body.phone.is_none());
        assert!(body.password.is_none());
    }
}
