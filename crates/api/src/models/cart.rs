//! Shopping cart domain types.

use bigbazar_core::{CartId, UserId};

/// A user's shopping cart (domain type).
///
/// Each user has at most one cart, created lazily on first use. Membership
/// lives in the `shopping_cart_product` join table and is a set: a product is
/// either in the cart or not, never counted twice.
#[derive(Debug, Clone, Copy)]
pub struct ShoppingCart {
    /// Unique cart ID.
    pub id: CartId,
    /// Owning user.
    pub user_id: UserId,
}
