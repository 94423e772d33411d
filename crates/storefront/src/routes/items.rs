//! Product listing route handlers.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::Serialize;

use feather_core::ProductId;

use crate::db::ProductRepository;
use crate::middleware::RequireUser;
use crate::models::Product;
use crate::state::AppState;

/// Product response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductBody {
    pub id: ProductId,
    pub name: String,
    pub sku: String,
    pub unit_price: Decimal,
    pub category: Option<String>,
}

impl From<Product> for ProductBody {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            sku: product.sku,
            unit_price: product.unit_price,
            category: product.category,
        }
    }
}

/// List the products of the caller's distributor.
///
/// Storage failures on this read path degrade to an empty list; they are
/// logged but never surfaced to the caller.
pub async fn list(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Json<Vec<ProductBody>> {
    let products = ProductRepository::new(state.pool())
        .list_by_distributor(user.distributor_id)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Product listing failed, returning empty");
            Vec::new()
        });

    Json(products.into_iter().map(ProductBody::from).collect())
}
