//! Catalog service.
//!
//! Validates product input and drives the product lifecycle: created
//! inactive, explicitly activated or toggled, partially updated, deleted,
//! and listed publicly (active entries only, paginated).

use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;

use bigbazar_core::{Price, PriceError, ProductId, UserId};

use crate::db::RepositoryError;
use crate::db::products::{ProductChanges, ProductRepository};
use crate::models::Product;

/// Maximum product name length.
const MAX_NAME_LENGTH: usize = 150;

/// Default page size for the public listing.
const DEFAULT_LIMIT: i64 = 10;

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Product name exceeds the storage limit.
    #[error("product name must be at most {max} characters")]
    NameTooLong {
        /// Maximum allowed length.
        max: usize,
    },

    /// Price failed validation.
    #[error("invalid price: {0}")]
    InvalidPrice(#[from] PriceError),

    /// Pagination parameters out of range.
    #[error("invalid pagination: {0}")]
    InvalidPagination(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Pagination window for the public listing.
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

/// Partial update input; `None` fields are left unchanged.
#[derive(Debug, Default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
}

/// Catalog service.
pub struct ProductService<'a> {
    products: ProductRepository<'a>,
}

impl<'a> ProductService<'a> {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            products: ProductRepository::new(pool),
        }
    }

    /// Create a product owned by `owner_id`. Products start inactive and do
    /// not appear in the public listing until activated.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NameTooLong` or `CatalogError::InvalidPrice` on
    /// bad input, `CatalogError::Repository` with a conflict if the insert
    /// violates an integrity constraint.
    pub async fn create(
        &self,
        owner_id: UserId,
        name: &str,
        description: &str,
        price: Decimal,
    ) -> Result<Product, CatalogError> {
        validate_name(name)?;
        let price = Price::new(price)?;

        let product = self
            .products
            .create(name, description, price, owner_id)
            .await?;

        Ok(product)
    }

    /// Partially update a product.
    ///
    /// Returns `None` if no product with that ID exists.
    ///
    /// # Errors
    ///
    /// Same validation errors as [`Self::create`] for the supplied fields.
    pub async fn update(
        &self,
        id: ProductId,
        update: ProductUpdate,
    ) -> Result<Option<Product>, CatalogError> {
        if let Some(ref name) = update.name {
            validate_name(name)?;
        }
        let price = update.price.map(Price::new).transpose()?;

        let product = self
            .products
            .update(
                id,
                ProductChanges {
                    name: update.name,
                    description: update.description,
                    price,
                },
            )
            .await?;

        Ok(product)
    }

    /// Delete a product.
    ///
    /// # Returns
    ///
    /// Returns `true` if the product was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the database operation fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, CatalogError> {
        let deleted = self.products.delete(id).await?;
        Ok(deleted)
    }

    /// List active products with pagination.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidPagination` if the window is out of
    /// range.
    pub async fn list_active(&self, page: Page) -> Result<Vec<Product>, CatalogError> {
        validate_page(page)?;

        let products = self.products.list_active(page.limit, page.offset).await?;
        Ok(products)
    }

    /// Set a product's active flag to an absolute value.
    ///
    /// Returns `None` if no product with that ID exists.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the database operation fails.
    pub async fn set_active(
        &self,
        id: ProductId,
        is_active: bool,
    ) -> Result<Option<Product>, CatalogError> {
        let product = self.products.set_active(id, is_active).await?;
        Ok(product)
    }

    /// Flip a product's active flag.
    ///
    /// Returns `None` if no product with that ID exists.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the database operation fails.
    pub async fn toggle_active(&self, id: ProductId) -> Result<Option<Product>, CatalogError> {
        let product = self.products.toggle_active(id).await?;
        Ok(product)
    }
}

/// Validate a product name against the storage limit.
fn validate_name(name: &str) -> Result<(), CatalogError> {
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(CatalogError::NameTooLong {
            max: MAX_NAME_LENGTH,
        });
    }
    Ok(())
}

/// Validate a pagination window.
fn validate_page(page: Page) -> Result<(), CatalogError> {
    if page.limit < 1 {
        return Err(CatalogError::InvalidPagination(format!(
            "limit must be at least 1 (got {})",
            page.limit
        )));
    }
    if page.offset < 0 {
        return Err(CatalogError::InvalidPagination(format!(
            "offset must not be negative (got {})",
            page.offset
        )));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name_at_limit() {
        assert!(validate_name(&"a".repeat(150)).is_ok());
    }

    #[test]
    fn test_validate_name_too_long() {
        assert!(matches!(
            validate_name(&"a".repeat(151)),
            Err(CatalogError::NameTooLong { max: 150 })
        ));
    }

    #[test]
    fn test_validate_page_defaults() {
        assert!(validate_page(Page::default()).is_ok());
    }

    #[test]
    fn test_validate_page_rejects_zero_limit() {
        let page = Page {
            limit: 0,
            offset: 0,
        };
        assert!(matches!(
            validate_page(page),
            Err(CatalogError::InvalidPagination(_))
        ));
    }

    #[test]
    fn test_validate_page_rejects_negative_offset() {
        let page = Page {
            limit: 10,
            offset: -1,
        };
        assert!(matches!(
            validate_page(page),
            Err(CatalogError::InvalidPagination(_))
        ));
    }
}
