//! Cart route handlers.
//!
//! Every handler operates on the authenticated user's own cart; cart IDs are
//! resolved server-side and never taken from the request. Each response
//! carries the full cart view with a freshly computed total.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bigbazar_core::{CartId, ProductId};

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::{Product, ShoppingCart};
use crate::services::carts::{CartService, total_price};
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Add-to-cart request body: a single product or a batch.
///
/// Accepts either `{"product_id": 1}` or `{"product_ids": [1, 2, 3]}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AddToCartRequest {
    Single { product_id: ProductId },
    Batch { product_ids: Vec<ProductId> },
}

impl AddToCartRequest {
    fn into_ids(self) -> Vec<ProductId> {
        match self {
            Self::Single { product_id } => vec![product_id],
            Self::Batch { product_ids } => product_ids,
        }
    }
}

/// A cart member in the cart view.
#[derive(Debug, Serialize)]
pub struct CartItemView {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
}

impl From<Product> for CartItemView {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price.amount(),
        }
    }
}

/// Cart response body.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub id: CartId,
    pub products: Vec<CartItemView>,
    pub total_price: Decimal,
}

impl CartView {
    fn new(cart: ShoppingCart, members: Vec<Product>) -> Self {
        let total = total_price(&members);
        Self {
            id: cart.id,
            products: members.into_iter().map(Into::into).collect(),
            total_price: total,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Show the authenticated user's cart.
async fn show_cart(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<CartView>> {
    let (cart, members) = CartService::new(state.pool()).contents(user.id).await?;

    Ok(Json(CartView::new(cart, members)))
}

/// Add one or many products to the cart. Products already in the cart are
/// left as-is.
async fn add_products(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<AddToCartRequest>,
) -> Result<Json<CartView>> {
    let (cart, members) = CartService::new(state.pool())
        .add_products(user.id, &body.into_ids())
        .await?;

    Ok(Json(CartView::new(cart, members)))
}

/// Remove a product from the cart. Removing a product that is not in the
/// cart succeeds without changing anything.
async fn remove_product(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(product_id): Path<ProductId>,
) -> Result<Json<CartView>> {
    let (cart, members) = CartService::new(state.pool())
        .remove_product(user.id, product_id)
        .await?;

    Ok(Json(CartView::new(cart, members)))
}

/// Empty the cart.
async fn clear_cart(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<CartView>> {
    let cart = CartService::new(state.pool()).clear(user.id).await?;

    Ok(Json(CartView::new(cart, Vec::new())))
}

/// Create the cart routes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(show_cart).delete(clear_cart))
        .route("/cart/products", post(add_products))
        .route("/cart/products/{id}", delete(remove_product))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_add_request_single_form() {
        let body: AddToCartRequest = serde_json::from_str(r#"{"product_id": 1}"#).unwrap();
        assert_eq!(body.into_ids(), vec![ProductId::new(1)]);
    }

    #[test]
    fn test_add_request_batch_form() {
        let body: AddToCartRequest =
            serde_json::from_str(r#"{"product_ids": [1, 2, 3]}"#).unwrap();
        assert_eq!(
            body.into_ids(),
            vec![ProductId::new(1), ProductId::new(2), ProductId::new(3)]
        );
    }

    #[test]
    fn test_add_request_empty_batch() {
        let body: AddToCartRequest = serde_json::from_str(r#"{"product_ids": []}"#).unwrap();
        assert!(body.into_ids().is_empty());
    }

    #[test]
    fn test_add_request_rejects_unknown_shape() {
        assert!(serde_json::from_str::<AddToCartRequest>(r#"{"product": 1}"#).is_err());
    }
}
