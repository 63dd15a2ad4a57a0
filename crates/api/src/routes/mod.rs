//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                  - Liveness check
//! GET  /health/ready            - Readiness check
//!
//! # Users
//! POST   /users/register        - Register a new account
//! POST   /users/login           - Exchange credentials for a token pair
//! GET    /users                 - List all users
//! GET    /users/{id}            - Get user by ID
//! PATCH  /users/{id}            - Partially update user
//! DELETE /users/{id}            - Delete user
//!
//! # Products
//! POST   /products                      - Create product (auth, starts inactive)
//! GET    /products?limit=&offset=       - List active products (public)
//! PATCH  /products/{id}                 - Partially update product (auth)
//! DELETE /products/{id}                 - Delete product (auth)
//! PUT    /products/{id}/status          - Set active flag (auth)
//! POST   /products/{id}/status/toggle   - Toggle active flag (auth)
//!
//! # Cart (always the authenticated user's own cart)
//! GET    /cart                  - Cart contents with total (auth)
//! POST   /cart/products         - Add one or many products (auth)
//! DELETE /cart/products/{id}    - Remove a product, idempotent (auth)
//! DELETE /cart                  - Clear the cart (auth)
//! ```

pub mod cart;
pub mod products;
pub mod users;

use axum::Router;
use serde::Serialize;

use crate::state::AppState;

/// Plain confirmation body for delete-style operations.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Create the application router (health endpoints are attached in `main`).
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(users::routes())
        .merge(products::routes())
        .merge(cart::routes())
}
