//! Cart repository.
//!
//! Cart lines are unique per (user, product); re-adding a product replaces
//! its quantity rather than accumulating it. Concurrent writes to the same
//! line are last-write-wins at the storage layer.

use sqlx::SqlitePool;

use feather_core::{CartItemId, ProductId, UserId};

use super::products::ProductRow;
use super::RepositoryError;
use crate::models::cart::CartLine;

/// Database row for a cart line joined with its product.
#[derive(sqlx::FromRow)]
struct CartLineRow {
    id: i64,
    quantity: i64,
    product_id: i64,
    distributor_id: i64,
    name: String,
    sku: String,
    unit_price: String,
    category: Option<String>,
}

impl CartLineRow {
    fn into_domain(self) -> Result<CartLine, RepositoryError> {
        let product = ProductRow {
            id: self.product_id,
            distributor_id: self.distributor_id,
            name: self.name,
            sku: self.sku,
            unit_price: self.unit_price,
            category: self.category,
        }
        .into_domain()?;

        Ok(CartLine {
            id: CartItemId::new(self.id),
            quantity: self.quantity,
            product,
        })
    }
}

const CART_LINE_QUERY: &str = r"
    SELECT ci.id, ci.quantity, p.id AS product_id, p.distributor_id,
           p.name, p.sku, p.unit_price, p.category
    FROM cart_items ci
    JOIN products p ON p.id = ci.product_id
";

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List a user's cart lines with their product snapshots, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored price is invalid.
    pub async fn list(&self, user_id: UserId) -> Result<Vec<CartLine>, RepositoryError> {
        let rows = sqlx::query_as::<_, CartLineRow>(&format!(
            "{CART_LINE_QUERY} WHERE ci.user_id = ? ORDER BY ci.id ASC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(CartLineRow::into_domain).collect()
    }

    /// Insert a cart line, or replace the quantity of an existing line for
    /// the same product. Replacement is intentional: re-adding never
    /// accumulates.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the write fails.
    /// Returns `RepositoryError::DataCorruption` if the joined product row
    /// is invalid.
    pub async fn upsert(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<CartLine, RepositoryError> {
        let id = sqlx::query_scalar::<_, i64>(
            r"
            INSERT INTO cart_items (user_id, product_id, quantity)
            VALUES (?, ?, ?)
            ON CONFLICT (user_id, product_id) DO UPDATE SET quantity = excluded.quantity
            RETURNING id
            ",
        )
        .bind(user_id)
        .bind(product_id)
        .bind(quantity)
        .fetch_one(self.pool)
        .await?;

        let row = sqlx::query_as::<_, CartLineRow>(&format!("{CART_LINE_QUERY} WHERE ci.id = ?"))
            .bind(id)
            .fetch_one(self.pool)
            .await?;

        row.into_domain()
    }

    /// Set the quantity of a cart line the user owns.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the line does not exist or
    /// belongs to another user.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_quantity(
        &self,
        user_id: UserId,
        item_id: CartItemId,
        quantity: i64,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE cart_items
            SET quantity = ?
            WHERE id = ? AND user_id = ?
            ",
        )
        .bind(quantity)
        .bind(item_id)
        .bind(user_id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Remove a cart line the user owns.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the line does not exist or
    /// belongs to another user.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn remove(
        &self,
        user_id: UserId,
        item_id: CartItemId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM cart_items
            WHERE id = ? AND user_id = ?
            ",
        )
        .bind(item_id)
        .bind(user_id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete all cart lines for a user. A no-op on an empty cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn clear(&self, user_id: UserId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE user_id = ?")
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
