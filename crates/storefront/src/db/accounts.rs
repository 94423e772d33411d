//! Account repository for purchasing-account queries.

use sqlx::SqlitePool;

use feather_core::{AccountId, DistributorId};

use super::RepositoryError;
use crate::models::catalog::Account;

/// Database row for an account.
#[derive(sqlx::FromRow)]
struct AccountRow {
    id: i64,
    distributor_id: i64,
    name: String,
    address_line1: Option<String>,
    address_line2: Option<String>,
    city: Option<String>,
    state: Option<String>,
    postal_code: Option<String>,
    price_level: Option<String>,
    payment_terms: Option<String>,
    email: Option<String>,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Self {
            id: AccountId::new(row.id),
            distributor_id: DistributorId::new(row.distributor_id),
            name: row.name,
            address_line1: row.address_line1,
            address_line2: row.address_line2,
            city: row.city,
            state: row.state,
            postal_code: row.postal_code,
            price_level: row.price_level,
            payment_terms: row.payment_terms,
            email: row.email,
        }
    }
}

const ACCOUNT_COLUMNS: &str = r"
    id, distributor_id, name, address_line1, address_line2, city, state,
    postal_code, price_level, payment_terms, email
";

/// Repository for account database operations.
pub struct AccountRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AccountRepository<'a> {
    /// Create a new account repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List all accounts belonging to a distributor.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_distributor(
        &self,
        distributor_id: DistributorId,
    ) -> Result<Vec<Account>, RepositoryError> {
        let rows = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE distributor_id = ? ORDER BY id ASC"
        ))
        .bind(distributor_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Account::from).collect())
    }

    /// Get an account by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: AccountId) -> Result<Option<Account>, RepositoryError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Account::from))
    }

    /// Get an account only if it belongs to the given distributor.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_for_distributor(
        &self,
        id: AccountId,
        distributor_id: DistributorId,
    ) -> Result<Option<Account>, RepositoryError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ? AND distributor_id = ?"
        ))
        .bind(id)
        .bind(distributor_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Account::from))
    }
}
