//! Order route handlers: submission and history.

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use feather_core::{AccountId, OrderId, OrderStatus, ProductId};

use crate::db::OrderRepository;
use crate::error::Result;
use crate::middleware::RequireUser;
use crate::models::order::{NewOrderLine, Order, OrderItem};
use crate::models::session::CurrentUser;
use crate::services::orders::OrderService;
use crate::state::AppState;

/// One submitted order line.
///
/// Quantity and unit price are taken from this body as submitted; they are
/// not re-derived from the stored cart.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineBody {
    pub id: ProductId,
    pub sku: String,
    pub name: String,
    pub quantity: i64,
    pub unit_price: Decimal,
}

impl From<OrderLineBody> for NewOrderLine {
    fn from(body: OrderLineBody) -> Self {
        Self {
            product_id: body.id,
            sku: body.sku,
            name: body.name,
            quantity: body.quantity,
            unit_price: body.unit_price,
        }
    }
}

/// Submit-order request body.
#[derive(Debug, Deserialize)]
pub struct SubmitOrderRequest {
    pub items: Vec<OrderLineBody>,
}

/// Submit-order response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOrderResponse {
    pub status: &'static str,
    pub order_id: OrderId,
    pub total_amount: Decimal,
}

/// Order summary response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummaryBody {
    pub id: OrderId,
    pub account_id: AccountId,
    pub order_date: DateTime<Utc>,
    pub total_amount: Decimal,
    pub status: OrderStatus,
}

impl From<Order> for OrderSummaryBody {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            account_id: order.account_id,
            order_date: order.order_date,
            total_amount: order.total_amount,
            status: order.status,
        }
    }
}

/// Order line response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemBody {
    pub product_id: ProductId,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

impl From<OrderItem> for OrderItemBody {
    fn from(item: OrderItem) -> Self {
        Self {
            product_id: item.product_id,
            quantity: item.quantity,
            unit_price: item.unit_price,
            line_total: Decimal::from(item.quantity) * item.unit_price,
        }
    }
}

/// Submit an order from posted line items.
pub async fn submit(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(body): Json<SubmitOrderRequest>,
) -> Result<Json<SubmitOrderResponse>> {
    let lines: Vec<NewOrderLine> = body.items.into_iter().map(NewOrderLine::from).collect();

    let receipt = OrderService::new(state.pool(), state.notifier())
        .submit(&user, lines)
        .await?;

    tracing::info!(
        order_id = %receipt.order_id,
        total = %receipt.total_amount,
        "Order submitted"
    );

    Ok(Json(SubmitOrderResponse {
        status: "submitted",
        order_id: receipt.order_id,
        total_amount: receipt.total_amount,
    }))
}

/// List order history, role-scoped.
///
/// Admins see every order under their distributor; customers see only
/// their account's orders. Storage failures on this read path degrade to
/// an empty list.
pub async fn list(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Json<Vec<OrderSummaryBody>> {
    let repo = OrderRepository::new(state.pool());

    let orders = if user.role.is_admin() {
        repo.list_for_distributor(user.distributor_id).await
    } else {
        match user.account_id {
            Some(account_id) => repo.list_for_account(account_id).await,
            None => Ok(Vec::new()),
        }
    }
    .unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Order listing failed, returning empty");
        Vec::new()
    });

    Json(orders.into_iter().map(OrderSummaryBody::from).collect())
}

/// Whether the caller may see this order.
fn order_visible(user: &CurrentUser, order: &Order, distributor: feather_core::DistributorId) -> bool {
    if user.role.is_admin() {
        distributor == user.distributor_id
    } else {
        user.account_id == Some(order.account_id)
    }
}

/// List the lines of one order, with the same scoping as the history list.
///
/// An order outside the caller's scope behaves exactly like a missing one.
pub async fn items(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(order_id): Path<OrderId>,
) -> Result<Json<Vec<OrderItemBody>>> {
    let repo = OrderRepository::new(state.pool());

    let scoped = match repo.get_scoped(order_id).await {
        Ok(scoped) => scoped,
        Err(e) => {
            tracing::warn!(error = %e, "Order lookup failed, returning empty");
            return Ok(Json(Vec::new()));
        }
    };

    match scoped {
        Some((order, distributor)) if order_visible(&user, &order, distributor) => {
            let items = repo.items(order_id).await.unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Order item listing failed, returning empty");
                Vec::new()
            });
            Ok(Json(items.into_iter().map(OrderItemBody::from).collect()))
        }
        _ => Err(crate::error::AppError::NotFound(format!(
            "order {order_id}"
        ))),
    }
}
