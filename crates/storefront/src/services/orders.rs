//! Order submission workflow.
//!
//! Converts a set of submitted order lines into a persisted order, renders
//! the operator report, dispatches it, and clears the submitting user's
//! cart. Persistence is atomic: the order header and its lines are written
//! in one transaction before any notification is attempted.

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::SqlitePool;
use thiserror::Error;

use feather_core::{OrderId, OrderStatus};

use crate::db::{AccountRepository, CartRepository, OrderRepository, RepositoryError};
use crate::models::order::NewOrderLine;
use crate::models::session::CurrentUser;

use super::email::{NotifyError, OrderNotifier};
use super::report::{OrderReport, ReportLine};

/// Errors that can occur during order submission.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The submission contained no line items.
    #[error("order must contain at least one item")]
    Empty,

    /// A line item failed validation.
    #[error("invalid order line: {0}")]
    InvalidLine(String),

    /// The submitting user has no purchasing account.
    #[error("user has no purchasing account")]
    NoAccount,

    /// The order committed but the report could not be dispatched. The
    /// order stays persisted and the cart stays intact.
    #[error("order {order_id} stored but notification failed")]
    Notification {
        order_id: OrderId,
        #[source]
        source: NotifyError,
    },

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Result of a successful submission.
#[derive(Debug, Clone, Copy)]
pub struct OrderReceipt {
    pub order_id: OrderId,
    pub total_amount: Decimal,
}

/// Order submission service.
pub struct OrderService<'a> {
    pool: &'a SqlitePool,
    notifier: &'a dyn OrderNotifier,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool, notifier: &'a dyn OrderNotifier) -> Self {
        Self { pool, notifier }
    }

    /// Submit an order for the authenticated user.
    ///
    /// Line quantities and prices are taken from the submitted lines, not
    /// re-derived from the stored cart.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Empty` / `OrderError::InvalidLine` before any
    /// mutation, `OrderError::Notification` when the order committed but
    /// dispatch failed, and `OrderError::Repository` on storage failures.
    pub async fn submit(
        &self,
        user: &CurrentUser,
        lines: Vec<NewOrderLine>,
    ) -> Result<OrderReceipt, OrderError> {
        if lines.is_empty() {
            return Err(OrderError::Empty);
        }
        for line in &lines {
            if line.quantity < 1 {
                return Err(OrderError::InvalidLine(format!(
                    "quantity must be at least 1 for {}",
                    line.sku
                )));
            }
            if line.unit_price.is_sign_negative() {
                return Err(OrderError::InvalidLine(format!(
                    "unit price must not be negative for {}",
                    line.sku
                )));
            }
        }

        let account_id = user.account_id.ok_or(OrderError::NoAccount)?;
        let account = AccountRepository::new(self.pool)
            .get(account_id)
            .await?
            .ok_or(OrderError::NoAccount)?;

        let order_date = Utc::now();
        let total_amount: Decimal = lines.iter().map(NewOrderLine::line_total).sum();

        let order_id = OrderRepository::new(self.pool)
            .create_with_items(
                user.user_id,
                account_id,
                order_date,
                total_amount,
                OrderStatus::Submitted,
                &lines,
            )
            .await?;

        let report = OrderReport {
            order_id,
            order_date,
            account_id,
            account_name: account.name,
            account_email: account.email,
            lines: lines
                .iter()
                .map(|line| ReportLine {
                    sku: line.sku.clone(),
                    name: line.name.clone(),
                    quantity: line.quantity,
                    unit_price: line.unit_price,
                    line_total: line.line_total(),
                })
                .collect(),
            total: total_amount,
        };

        if let Err(source) = self.notifier.deliver(&report).await {
            tracing::error!(
                order_id = %order_id,
                error = %source,
                "Order report dispatch failed; order remains persisted"
            );
            return Err(OrderError::Notification { order_id, source });
        }

        CartRepository::new(self.pool).clear(user.user_id).await?;

        Ok(OrderReceipt {
            order_id,
            total_amount,
        })
    }
}
