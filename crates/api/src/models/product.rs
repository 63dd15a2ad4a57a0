//! Product domain types.

use bigbazar_core::{Price, ProductId, UserId};
use chrono::{DateTime, Utc};

/// A catalog entry (domain type).
#[derive(Debug, Clone)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Product name (at most 150 characters).
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Positive price with at most two fractional digits.
    pub price: Price,
    /// Whether the product appears in the public listing. New products start
    /// inactive until explicitly activated.
    pub is_active: bool,
    /// User who created the product.
    pub owner_id: UserId,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}
