//! Authentication service.
//!
//! Verifies a username/password pair against the users table. Passwords are
//! stored and compared as plain strings, carried over from the source
//! system; the comparison is isolated here so a hashing scheme can slot in
//! without touching the handlers.

use sqlx::SqlitePool;
use thiserror::Error;

use crate::db::{RepositoryError, UserRepository};
use crate::models::user::User;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Verify a username/password pair and return the matching user.
    ///
    /// Unknown usernames and wrong passwords produce the same error so the
    /// response does not reveal which part failed.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` on a failed login.
    /// Returns `AuthError::Repository` if the lookup fails.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let Some((user, stored_password)) = self.users.get_with_password(username).await? else {
            return Err(AuthError::InvalidCredentials);
        };

        if stored_password != password {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(user)
    }
}
