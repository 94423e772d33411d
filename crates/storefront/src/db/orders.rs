//! Order repository.
//!
//! Order persistence is transactional: the header and all of its lines are
//! written in one transaction so a partial order can never be observed.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::SqlitePool;

use feather_core::{AccountId, DistributorId, OrderId, OrderStatus, ProductId, UserId};

use super::{RepositoryError, parse_amount};
use crate::models::order::{NewOrderLine, Order, OrderItem};

/// Database row for an order header.
#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i64,
    user_id: i64,
    account_id: i64,
    order_date: DateTime<Utc>,
    total_amount: String,
    status: String,
}

impl OrderRow {
    fn into_domain(self) -> Result<Order, RepositoryError> {
        let status = OrderStatus::from_str(&self.status).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid order status in database: {e}"))
        })?;

        Ok(Order {
            id: OrderId::new(self.id),
            user_id: UserId::new(self.user_id),
            account_id: AccountId::new(self.account_id),
            order_date: self.order_date,
            total_amount: parse_amount(&self.total_amount)?,
            status,
        })
    }
}

/// Database row for an order line.
#[derive(sqlx::FromRow)]
struct OrderItemRow {
    order_id: i64,
    product_id: i64,
    quantity: i64,
    unit_price: String,
}

impl OrderItemRow {
    fn into_domain(self) -> Result<OrderItem, RepositoryError> {
        Ok(OrderItem {
            order_id: OrderId::new(self.order_id),
            product_id: ProductId::new(self.product_id),
            quantity: self.quantity,
            unit_price: parse_amount(&self.unit_price)?,
        })
    }
}

const ORDER_COLUMNS: &str = "id, user_id, account_id, order_date, total_amount, status";

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Persist an order header and all of its lines atomically.
    ///
    /// Either the header and every line exist afterwards, or none do.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any write fails; the
    /// transaction is rolled back on drop.
    pub async fn create_with_items(
        &self,
        user_id: UserId,
        account_id: AccountId,
        order_date: DateTime<Utc>,
        total_amount: Decimal,
        status: OrderStatus,
        lines: &[NewOrderLine],
    ) -> Result<OrderId, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let order_id = sqlx::query_scalar::<_, i64>(
            r"
            INSERT INTO orders (user_id, account_id, order_date, total_amount, status)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id
            ",
        )
        .bind(user_id)
        .bind(account_id)
        .bind(order_date)
        .bind(total_amount.to_string())
        .bind(status.to_string())
        .fetch_one(&mut *tx)
        .await?;

        for line in lines {
            sqlx::query(
                r"
                INSERT INTO order_items (order_id, product_id, quantity, unit_price)
                VALUES (?, ?, ?, ?)
                ",
            )
            .bind(order_id)
            .bind(line.product_id)
            .bind(line.quantity)
            .bind(line.unit_price.to_string())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(OrderId::new(order_id))
    }

    /// List all orders placed under a distributor, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored row is invalid.
    pub async fn list_for_distributor(
        &self,
        distributor_id: DistributorId,
    ) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT o.id, o.user_id, o.account_id, o.order_date, o.total_amount, o.status
            FROM orders o
            JOIN users u ON u.id = o.user_id
            WHERE u.distributor_id = ?
            ORDER BY o.id DESC
            ",
        )
        .bind(distributor_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(OrderRow::into_domain).collect()
    }

    /// List all orders placed for one account, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored row is invalid.
    pub async fn list_for_account(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE account_id = ? ORDER BY id DESC"
        ))
        .bind(account_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(OrderRow::into_domain).collect()
    }

    /// Get an order together with the distributor of the user who placed
    /// it, for role-based scoping.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn get_scoped(
        &self,
        order_id: OrderId,
    ) -> Result<Option<(Order, DistributorId)>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct ScopedRow {
            id: i64,
            user_id: i64,
            account_id: i64,
            order_date: DateTime<Utc>,
            total_amount: String,
            status: String,
            distributor_id: i64,
        }

        let row = sqlx::query_as::<_, ScopedRow>(
            r"
            SELECT o.id, o.user_id, o.account_id, o.order_date, o.total_amount, o.status,
                   u.distributor_id
            FROM orders o
            JOIN users u ON u.id = o.user_id
            WHERE o.id = ?
            ",
        )
        .bind(order_id)
        .fetch_optional(self.pool)
        .await?;

        row.map(|r| {
            let distributor_id = DistributorId::new(r.distributor_id);
            let order = OrderRow {
                id: r.id,
                user_id: r.user_id,
                account_id: r.account_id,
                order_date: r.order_date,
                total_amount: r.total_amount,
                status: r.status,
            }
            .into_domain()?;
            Ok((order, distributor_id))
        })
        .transpose()
    }

    /// List the lines of one order, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored price is invalid.
    pub async fn items(&self, order_id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderItemRow>(
            r"
            SELECT order_id, product_id, quantity, unit_price
            FROM order_items
            WHERE order_id = ?
            ORDER BY id ASC
            ",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(OrderItemRow::into_domain).collect()
    }
}
