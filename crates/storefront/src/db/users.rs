//! User repository for database operations.

use std::str::FromStr;

use sqlx::SqlitePool;

use feather_core::{AccountId, DistributorId, Email, Role, UserId};

use super::RepositoryError;
use crate::models::user::User;

/// Database row for a user, including the stored password.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    password: String,
    distributor_id: i64,
    distributor_name: String,
    role: String,
    account_id: Option<i64>,
}

impl UserRow {
    fn into_domain(self) -> Result<(User, String), RepositoryError> {
        let role = Role::from_str(&self.role).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid role in database: {e}"))
        })?;

        let user = User {
            id: UserId::new(self.id),
            username: self.username,
            distributor_id: DistributorId::new(self.distributor_id),
            distributor_name: self.distributor_name,
            role,
            account_id: self.account_id.map(AccountId::new),
        };

        Ok((user, self.password))
    }
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a user and their stored password by username.
    ///
    /// Returns `None` if no such user exists. The password stays inside the
    /// auth service; callers outside it should use [`Self::get_by_id`].
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored role is invalid.
    pub async fn get_with_password(
        &self,
        username: &str,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, username, password, distributor_id, distributor_name, role, account_id
            FROM users
            WHERE username = ?
            ",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        row.map(UserRow::into_domain).transpose()
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored role is invalid.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, username, password, distributor_id, distributor_name, role, account_id
            FROM users
            WHERE id = ?
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(UserRow::into_domain).transpose()?.map(|(u, _)| u))
    }

    /// Create a customer login bound to a purchasing account.
    ///
    /// The username is the customer's email address; the credential is the
    /// generated password delivered out-of-band.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_customer(
        &self,
        username: &Email,
        credential: &str,
        distributor_id: DistributorId,
        distributor_name: &str,
        account_id: AccountId,
    ) -> Result<User, RepositoryError> {
        let id = sqlx::query_scalar::<_, i64>(
            r"
            INSERT INTO users (username, password, distributor_id, distributor_name, role, account_id)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id
            ",
        )
        .bind(username.as_str())
        .bind(credential)
        .bind(distributor_id)
        .bind(distributor_name)
        .bind(Role::Customer.to_string())
        .bind(account_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("username already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(User {
            id: UserId::new(id),
            username: username.as_str().to_owned(),
            distributor_id,
            distributor_name: distributor_name.to_owned(),
            role: Role::Customer,
            account_id: Some(account_id),
        })
    }
}
