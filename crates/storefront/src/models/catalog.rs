//! Catalog domain types: products and purchasing accounts.

use rust_decimal::Decimal;

use feather_core::{AccountId, DistributorId, ProductId};

/// A sellable product, owned by exactly one distributor.
#[derive(Debug, Clone)]
pub struct Product {
    pub id: ProductId,
    pub distributor_id: DistributorId,
    pub name: String,
    pub sku: String,
    pub unit_price: Decimal,
    pub category: Option<String>,
}

/// A purchasing account, owned by exactly one distributor.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: AccountId,
    pub distributor_id: DistributorId,
    pub name: String,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub price_level: Option<String>,
    pub payment_terms: Option<String>,
    pub email: Option<String>,
}
