//! Business services over the repository layer.

pub mod auth;
pub mod carts;
pub mod products;
pub mod tokens;
