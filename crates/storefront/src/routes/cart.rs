//! Cart route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use feather_core::{CartItemId, ProductId};

use crate::db::{CartRepository, ProductRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireUser;
use crate::models::CartLine;
use crate::state::AppState;

use super::items::ProductBody;

/// Cart line response body.
#[derive(Debug, Serialize)]
pub struct CartLineBody {
    pub id: CartItemId,
    pub quantity: i64,
    pub product: ProductBody,
}

impl From<CartLine> for CartLineBody {
    fn from(line: CartLine) -> Self {
        Self {
            id: line.id,
            quantity: line.quantity,
            product: ProductBody::from(line.product),
        }
    }
}

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// Update-quantity request body.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i64,
}

/// List the caller's cart.
///
/// Storage failures on this read path degrade to an empty list.
pub async fn list(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Json<Vec<CartLineBody>> {
    let lines = CartRepository::new(state.pool())
        .list(user.user_id)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Cart listing failed, returning empty");
            Vec::new()
        });

    Json(lines.into_iter().map(CartLineBody::from).collect())
}

/// Add a product to the cart.
///
/// Re-adding a product replaces its quantity rather than accumulating it.
pub async fn add(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(body): Json<AddToCartRequest>,
) -> Result<Json<CartLineBody>> {
    if body.quantity < 1 {
        return Err(AppError::InvalidArgument(
            "quantity must be at least 1".to_string(),
        ));
    }

    // The product must exist under the caller's distributor.
    ProductRepository::new(state.pool())
        .get_for_distributor(body.product_id, user.distributor_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound(format!("product {}", body.product_id)))?;

    let line = CartRepository::new(state.pool())
        .upsert(user.user_id, body.product_id, body.quantity)
        .await?;

    Ok(Json(CartLineBody::from(line)))
}

/// Set the quantity of a cart line the caller owns.
pub async fn update(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(item_id): Path<CartItemId>,
    Json(body): Json<UpdateQuantityRequest>,
) -> Result<Json<serde_json::Value>> {
    if body.quantity < 1 {
        return Err(AppError::InvalidArgument(
            "quantity must be at least 1".to_string(),
        ));
    }

    CartRepository::new(state.pool())
        .set_quantity(user.user_id, item_id, body.quantity)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound(format!("cart item {item_id}"))
            }
            other => other.into(),
        })?;

    Ok(Json(serde_json::json!({
        "status": "updated",
        "id": item_id,
        "quantity": body.quantity,
    })))
}

/// Remove a cart line the caller owns.
pub async fn remove(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(item_id): Path<CartItemId>,
) -> Result<Json<serde_json::Value>> {
    CartRepository::new(state.pool())
        .remove(user.user_id, item_id)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound(format!("cart item {item_id}"))
            }
            other => other.into(),
        })?;

    Ok(Json(serde_json::json!({ "status": "removed" })))
}

/// Clear the caller's cart. A no-op on an empty cart.
pub async fn clear(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<serde_json::Value>> {
    CartRepository::new(state.pool()).clear(user.user_id).await?;

    Ok(Json(serde_json::json!({ "status": "cleared" })))
}
