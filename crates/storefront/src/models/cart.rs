//! Cart domain types.

use feather_core::CartItemId;

use super::catalog::Product;

/// One line of a user's cart, joined with its product snapshot.
///
/// Quantity is always at least 1; a quantity of zero is expressed by
/// removing the line instead.
#[derive(Debug, Clone)]
pub struct CartLine {
    pub id: CartItemId,
    pub quantity: i64,
    pub product: Product,
}
