//! Shopping cart service.
//!
//! Every operation is scoped to the authenticated user's own cart; the cart
//! ID never comes from the client. Membership is a set, so adding a product
//! twice and removing an absent product are both no-ops rather than errors -
//! the idempotent reading of the single-item operations, chosen deliberately.

use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;

use bigbazar_core::{ProductId, UserId};

use crate::db::RepositoryError;
use crate::db::carts::CartRepository;
use crate::models::{Product, ShoppingCart};

/// Errors that can occur during cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The product to add does not exist.
    #[error("product not found")]
    ProductNotFound,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Shopping cart service.
pub struct CartService<'a> {
    carts: CartRepository<'a>,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            carts: CartRepository::new(pool),
        }
    }

    /// Fetch the user's cart and its current members, creating the cart on
    /// first use.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if a database operation fails.
    pub async fn contents(
        &self,
        user_id: UserId,
    ) -> Result<(ShoppingCart, Vec<Product>), CartError> {
        let cart = self.carts.get_or_create(user_id).await?;
        let members = self.carts.members(cart.id).await?;
        Ok((cart, members))
    }

    /// Add one or more products to the user's cart. Each insert is idempotent:
    /// a product already in the cart stays a single member.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ProductNotFound` if any referenced product does
    /// not exist.
    pub async fn add_products(
        &self,
        user_id: UserId,
        product_ids: &[ProductId],
    ) -> Result<(ShoppingCart, Vec<Product>), CartError> {
        let cart = self.carts.get_or_create(user_id).await?;

        for &product_id in product_ids {
            self.carts
                .add_product(cart.id, product_id)
                .await
                .map_err(|e| match e {
                    RepositoryError::NotFound => CartError::ProductNotFound,
                    other => CartError::Repository(other),
                })?;
        }

        let members = self.carts.members(cart.id).await?;
        Ok((cart, members))
    }

    /// Remove a product from the user's cart; removing a non-member is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if a database operation fails.
    pub async fn remove_product(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<(ShoppingCart, Vec<Product>), CartError> {
        let cart = self.carts.get_or_create(user_id).await?;
        self.carts.remove_product(cart.id, product_id).await?;

        let members = self.carts.members(cart.id).await?;
        Ok((cart, members))
    }

    /// Empty the user's cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if a database operation fails.
    pub async fn clear(&self, user_id: UserId) -> Result<ShoppingCart, CartError> {
        let cart = self.carts.get_or_create(user_id).await?;
        self.carts.clear(cart.id).await?;
        Ok(cart)
    }
}

/// Total price of the given cart members.
///
/// Computed fresh from the rows fetched for this request, so a price change
/// in the catalog is reflected on the next read; nothing is cached.
#[must_use]
pub fn total_price(members: &[Product]) -> Decimal {
    members.iter().map(|p| p.price.amount()).sum()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bigbazar_core::Price;
    use chrono::Utc;

    use super::*;

    fn product(id: i32, price_cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            description: String::new(),
            price: Price::new(Decimal::new(price_cents, 2)).unwrap(),
            is_active: true,
            owner_id: UserId::new(1),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_total_price_sums_members() {
        let members = vec![product(1, 10_00), product(2, 15_00)];
        assert_eq!(total_price(&members), Decimal::new(25_00, 2));
    }

    #[test]
    fn test_total_price_empty_cart_is_zero() {
        assert_eq!(total_price(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_total_price_exact_decimals() {
        // 19.99 + 0.01 must be exactly 20, no float drift
        let members = vec![product(1, 19_99), product(2, 1)];
        assert_eq!(total_price(&members), Decimal::new(20_00, 2));
    }
}
