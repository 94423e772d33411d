//! Account connection: admin-only provisioning of customer logins.

use sqlx::SqlitePool;
use thiserror::Error;

use feather_core::{AccountId, Email, EmailError};

use crate::db::{AccountRepository, RepositoryError, UserRepository};
use crate::models::session::CurrentUser;
use crate::models::user::User;

/// Errors that can occur while connecting an account to a new login.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// The supplied email address is malformed.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// The account does not exist under the admin's distributor.
    #[error("account not found")]
    AccountNotFound,

    /// A login with this username already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// A freshly provisioned customer login and its generated credential.
///
/// The credential is returned exactly once; the caller delivers it
/// out-of-band. Credentials do not expire.
#[derive(Debug)]
pub struct ConnectedUser {
    pub user: User,
    pub credential: String,
}

/// Create a customer login for a purchasing account.
///
/// The username is the customer's email address; the password is a random
/// 6-digit numeric credential. The admin's role has already been checked by
/// the route extractor; this still scopes the account lookup to the admin's
/// distributor.
///
/// # Errors
///
/// Returns `ConnectError::InvalidEmail` for a malformed address,
/// `ConnectError::AccountNotFound` if the account is absent or belongs to
/// another distributor, and `ConnectError::UserAlreadyExists` if the
/// username is taken.
pub async fn connect_account(
    pool: &SqlitePool,
    admin: &CurrentUser,
    account_id: AccountId,
    email: &str,
) -> Result<ConnectedUser, ConnectError> {
    let email = Email::parse(email)?;

    let account = AccountRepository::new(pool)
        .get_for_distributor(account_id, admin.distributor_id)
        .await?
        .ok_or(ConnectError::AccountNotFound)?;

    let credential = generate_credential();

    let user = UserRepository::new(pool)
        .create_customer(
            &email,
            &credential,
            admin.distributor_id,
            &admin.distributor_name,
            account.id,
        )
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => ConnectError::UserAlreadyExists,
            other => ConnectError::Repository(other),
        })?;

    Ok(ConnectedUser { user, credential })
}

/// Generate a 6-digit numeric credential.
#[must_use]
pub fn generate_credential() -> String {
    use rand::Rng;
    let code: u32 = rand::rng().random_range(100_000..1_000_000);
    code.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_credential_format() {
        let code = generate_credential();
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_generate_credential_range() {
        for _ in 0..100 {
            let code: u32 = generate_credential().parse().expect("valid number");
            assert!(code >= 100_000);
            assert!(code < 1_000_000);
        }
    }
}
