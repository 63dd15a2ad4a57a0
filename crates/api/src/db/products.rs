//! Product repository for database operations.
//!
//! Update, delete, and status changes signal a missing row through
//! `Option`/`bool` return values instead of errors, leaving the user-facing
//! response to the caller.

use bigbazar_core::{Price, ProductId, UserId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use super::RepositoryError;
use crate::models::Product;

/// Columns selected for every product query.
const PRODUCT_COLUMNS: &str =
    "id, name, description, price, is_active, owner_id, created_at, updated_at";

/// Raw product row as stored. Shared with the cart repository, whose member
/// listing selects the same columns.
#[derive(sqlx::FromRow)]
pub(super) struct ProductRow {
    id: i32,
    name: String,
    description: String,
    price: Decimal,
    is_active: bool,
    owner_id: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProductRow {
    pub(super) fn into_product(self) -> Result<Product, RepositoryError> {
        let price = Price::new(self.price).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid price in database: {e}"))
        })?;

        Ok(Product {
            id: ProductId::new(self.id),
            name: self.name,
            description: self.description,
            price,
            is_active: self.is_active,
            owner_id: UserId::new(self.owner_id),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Partial update input: `None` fields keep their stored value.
#[derive(Debug, Default)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a new product. Products start inactive.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the insert violates an
    /// integrity constraint. Returns `RepositoryError::Database` for other
    /// database errors.
    pub async fn create(
        &self,
        name: &str,
        description: &str,
        price: Price,
        owner_id: UserId,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            INSERT INTO product (name, description, price, owner_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, price, is_active, owner_id, created_at, updated_at
            ",
        )
        .bind(name)
        .bind(description)
        .bind(price)
        .bind(owner_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && (db_err.is_unique_violation() || db_err.is_foreign_key_violation())
            {
                return RepositoryError::Conflict("product could not be created".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.into_product()
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored value is invalid.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(ProductRow::into_product).transpose()
    }

    /// List active products with pagination, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored value is invalid.
    pub async fn list_active(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product
             WHERE is_active = TRUE
             ORDER BY created_at DESC
             LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(ProductRow::into_product).collect()
    }

    /// Partially update a product; `None` fields are left unchanged.
    ///
    /// Returns `None` if no product with that ID exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update(
        &self,
        id: ProductId,
        changes: ProductChanges,
    ) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            UPDATE product
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                price = COALESCE($4, price),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, price, is_active, owner_id, created_at, updated_at
            ",
        )
        .bind(id)
        .bind(changes.name)
        .bind(changes.description)
        .bind(changes.price)
        .fetch_optional(self.pool)
        .await?;

        row.map(ProductRow::into_product).transpose()
    }

    /// Delete a product by ID.
    ///
    /// # Returns
    ///
    /// Returns `true` if the product was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM product WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Set a product's active flag to an absolute value.
    ///
    /// Returns `None` if no product with that ID exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn set_active(
        &self,
        id: ProductId,
        is_active: bool,
    ) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            UPDATE product
            SET is_active = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, price, is_active, owner_id, created_at, updated_at
            ",
        )
        .bind(id)
        .bind(is_active)
        .fetch_optional(self.pool)
        .await?;

        row.map(ProductRow::into_product).transpose()
    }

    /// Flip a product's active flag.
    ///
    /// Returns `None` if no product with that ID exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn toggle_active(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            UPDATE product
            SET is_active = NOT is_active, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, price, is_active, owner_id, created_at, updated_at
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(ProductRow::into_product).transpose()
    }
}
