//! Shopping cart repository for database operations.
//!
//! Cart membership is a set backed by the `shopping_cart_product` join table:
//! the composite primary key plus `ON CONFLICT DO NOTHING` makes adding an
//! already-present product a no-op, and removal ignores absent rows. Each
//! membership change is an individual statement; the store's constraints are
//! the only synchronization.

use bigbazar_core::{CartId, ProductId, UserId};
use sqlx::PgPool;

use super::RepositoryError;
use super::products::ProductRow;
use crate::models::{Product, ShoppingCart};

/// Repository for shopping cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the user's cart, creating it on first use.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_or_create(&self, user_id: UserId) -> Result<ShoppingCart, RepositoryError> {
        sqlx::query("INSERT INTO shopping_cart (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
            .bind(user_id)
            .execute(self.pool)
            .await?;

        let (id, user_id) =
            sqlx::query_as::<_, (i32, i32)>("SELECT id, user_id FROM shopping_cart WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(self.pool)
                .await?;

        Ok(ShoppingCart {
            id: CartId::new(id),
            user_id: UserId::new(user_id),
        })
    }

    /// Add a product to a cart. Adding a product that is already a member is
    /// a no-op.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn add_product(
        &self,
        cart_id: CartId,
        product_id: ProductId,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO shopping_cart_product (cart_id, product_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            ",
        )
        .bind(cart_id)
        .bind(product_id)
        .execute(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return RepositoryError::NotFound;
            }
            RepositoryError::Database(e)
        })?;

        Ok(())
    }

    /// Remove a product from a cart. Removing a product that is not a member
    /// is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn remove_product(
        &self,
        cart_id: CartId,
        product_id: ProductId,
    ) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM shopping_cart_product WHERE cart_id = $1 AND product_id = $2")
            .bind(cart_id)
            .bind(product_id)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Remove every product from a cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn clear(&self, cart_id: CartId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM shopping_cart_product WHERE cart_id = $1")
            .bind(cart_id)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Fetch the current member products of a cart.
    ///
    /// Prices are read live from the product table, so totals derived from
    /// this list always reflect the latest catalog state.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored value is invalid.
    pub async fn members(&self, cart_id: CartId) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT p.id, p.name, p.description, p.price, p.is_active, p.owner_id,
                   p.created_at, p.updated_at
            FROM product p
            JOIN shopping_cart_product scp ON scp.product_id = p.id
            WHERE scp.cart_id = $1
            ORDER BY p.id ASC
            ",
        )
        .bind(cart_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(ProductRow::into_product).collect()
    }
}
