//! User domain types.

use bigbazar_core::{Email, Phone, UserId};
use chrono::{DateTime, Utc};

/// A registered account (domain type).
///
/// The password hash never leaves the repository layer; this type carries
/// everything else a handler may expose.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Unique email address; also the subject claim of issued tokens.
    pub email: Email,
    /// Unique phone number.
    pub phone: Phone,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}
