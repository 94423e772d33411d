//! Order domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use feather_core::{AccountId, OrderId, OrderStatus, ProductId, UserId};

/// A persisted order header.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub account_id: AccountId,
    pub order_date: DateTime<Utc>,
    pub total_amount: Decimal,
    pub status: OrderStatus,
}

/// A persisted order line. The unit price is a snapshot taken at
/// submission time and is never mutated afterwards.
#[derive(Debug, Clone)]
pub struct OrderItem {
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: i64,
    pub unit_price: Decimal,
}

/// An order line as submitted by the client, before persistence.
#[derive(Debug, Clone)]
pub struct NewOrderLine {
    pub product_id: ProductId,
    pub sku: String,
    pub name: String,
    pub quantity: i64,
    pub unit_price: Decimal,
}

impl NewOrderLine {
    /// Quantity × unit price for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price
    }
}
