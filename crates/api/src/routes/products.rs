//! Product route handlers.
//!
//! Mutations require authentication; the listing is public and only ever
//! shows active products.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{patch, post, put},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bigbazar_core::ProductId;

use super::MessageResponse;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::Product;
use crate::services::products::{Page, ProductService, ProductUpdate};
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Product creation request body.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: String,
    pub price: Decimal,
}

/// Partial update request body.
#[derive(Debug, Deserialize, Default)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
}

/// Absolute status change request body.
#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub is_active: bool,
}

/// Pagination query parameters for the public listing.
#[derive(Debug, Deserialize, Default)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl From<ListQuery> for Page {
    fn from(query: ListQuery) -> Self {
        let defaults = Self::default();
        Self {
            limit: query.limit.unwrap_or(defaults.limit),
            offset: query.offset.unwrap_or(defaults.offset),
        }
    }
}

/// Public product response body.
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price.amount(),
        }
    }
}

/// Status change response body.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub id: ProductId,
    pub is_active: bool,
}

impl From<Product> for StatusResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            is_active: product.is_active,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Create a new product owned by the authenticated user.
async fn create_product(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<CreateProductRequest>,
) -> Result<Json<ProductResponse>> {
    let product = ProductService::new(state.pool())
        .create(user.id, &body.name, &body.description, body.price)
        .await?;

    Ok(Json(product.into()))
}

/// List active products with pagination.
async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<ProductResponse>>> {
    let products = ProductService::new(state.pool())
        .list_active(query.into())
        .await?;

    Ok(Json(products.into_iter().map(Into::into).collect()))
}

/// Partially update a product.
async fn update_product(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<ProductId>,
    Json(body): Json<UpdateProductRequest>,
) -> Result<Json<ProductResponse>> {
    let product = ProductService::new(state.pool())
        .update(
            id,
            ProductUpdate {
                name: body.name,
                description: body.description,
                price: body.price,
            },
        )
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_owned()))?;

    Ok(Json(product.into()))
}

/// Delete a product.
async fn delete_product(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<ProductId>,
) -> Result<Json<MessageResponse>> {
    let deleted = ProductService::new(state.pool()).delete(id).await?;

    if !deleted {
        return Err(AppError::NotFound("Product not found".to_owned()));
    }

    Ok(Json(MessageResponse {
        message: "Product deleted successfully".to_owned(),
    }))
}

/// Set a product's active flag to an absolute value.
async fn set_status(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<ProductId>,
    Json(body): Json<SetStatusRequest>,
) -> Result<Json<StatusResponse>> {
    let product = ProductService::new(state.pool())
        .set_active(id, body.is_active)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_owned()))?;

    Ok(Json(product.into()))
}

/// Toggle a product's active flag.
async fn toggle_status(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<ProductId>,
) -> Result<Json<StatusResponse>> {
    let product = ProductService::new(state.pool())
        .toggle_active(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_owned()))?;

    Ok(Json(product.into()))
}

/// Create the product routes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", post(create_product).get(list_products))
        .route(
            "/products/{id}",
            patch(update_product).delete(delete_product),
        )
        .route("/products/{id}/status", put(set_status))
        .route("/products/{id}/status/toggle", post(toggle_status))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_defaults() {
        let page: Page = ListQuery::default().into();
        assert_eq!(page.limit, 10);
        assert_eq!(page.offset, 0);
    }

    #[test]
    fn test_list_query_overrides() {
        let query = ListQuery {
            limit: Some(25),
            offset: Some(50),
        };
        let page: Page = query.into();
        assert_eq!(page.limit, 25);
        assert_eq!(page.offset, 50);
    }

    #[test]
    fn test_create_request_parses_decimal_price() {
        let body: CreateProductRequest = serde_json::from_str(
            r#"{"name": "Test Product", "description": "A test product description", "price": 100.00}"#,
        )
        .unwrap();
        assert_eq!(body.price, Decimal::new(100_00, 2));
    }
}
