//! CLI command implementations.

pub mod migrate;
pub mod seed;

use secrecy::SecretString;

/// Resolve the database URL the same way the server does.
pub(crate) fn database_url() -> SecretString {
    dotenvy::dotenv().ok();

    if let Ok(value) = std::env::var("FEATHER_DATABASE_URL") {
        return SecretString::from(value);
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return SecretString::from(value);
    }
    SecretString::from("sqlite://featherstorefront.db")
}
