//! Product repository for catalog queries.

use sqlx::SqlitePool;

use feather_core::{DistributorId, ProductId};

use super::{RepositoryError, parse_amount};
use crate::models::catalog::Product;

/// Database row for a product.
#[derive(sqlx::FromRow)]
pub(crate) struct ProductRow {
    pub(crate) id: i64,
    pub(crate) distributor_id: i64,
    pub(crate) name: String,
    pub(crate) sku: String,
    pub(crate) unit_price: String,
    pub(crate) category: Option<String>,
}

impl ProductRow {
    pub(crate) fn into_domain(self) -> Result<Product, RepositoryError> {
        Ok(Product {
            id: ProductId::new(self.id),
            distributor_id: DistributorId::new(self.distributor_id),
            name: self.name,
            sku: self.sku,
            unit_price: parse_amount(&self.unit_price)?,
            category: self.category,
        })
    }
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List all products belonging to a distributor.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored price is invalid.
    pub async fn list_by_distributor(
        &self,
        distributor_id: DistributorId,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, distributor_id, name, sku, unit_price, category
            FROM products
            WHERE distributor_id = ?
            ORDER BY id ASC
            ",
        )
        .bind(distributor_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(ProductRow::into_domain).collect()
    }

    /// Get a product only if it belongs to the given distributor.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored price is invalid.
    pub async fn get_for_distributor(
        &self,
        id: ProductId,
        distributor_id: DistributorId,
    ) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, distributor_id, name, sku, unit_price, category
            FROM products
            WHERE id = ? AND distributor_id = ?
            ",
        )
        .bind(id)
        .bind(distributor_id)
        .fetch_optional(self.pool)
        .await?;

        row.map(ProductRow::into_domain).transpose()
    }
}
