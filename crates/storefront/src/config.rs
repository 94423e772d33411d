//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `FEATHER_DATABASE_URL` - `SQLite` connection string
//!   (default: `sqlite://featherstorefront.db`; plain `DATABASE_URL` is
//!   honored as a fallback)
//! - `FEATHER_HOST` - Bind address (default: 127.0.0.1)
//! - `FEATHER_PORT` - Listen port (default: 4000)
//! - `FEATHER_ALLOWED_ORIGINS` - Comma-separated CORS origins allowed to
//!   send credentials (default: none, same-origin only)
//! - `FEATHER_SECURE_COOKIES` - Set to `true` when serving over HTTPS
//!
//! ## SMTP (all required once `FEATHER_SMTP_HOST` is set)
//! - `FEATHER_SMTP_HOST` - SMTP relay host; absent means order reports are
//!   logged instead of mailed
//! - `FEATHER_SMTP_PORT` - SMTP port (default: 587)
//! - `FEATHER_SMTP_USERNAME` / `FEATHER_SMTP_PASSWORD` - relay credentials
//! - `FEATHER_SMTP_FROM` - From address for outbound mail
//! - `FEATHER_ORDER_NOTIFY_ADDRESS` - Operator address that receives order
//!   reports
//! - `FEATHER_SMTP_TIMEOUT_SECS` - Delivery timeout (default: 10)

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// `SQLite` database connection URL
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Origins allowed to make credentialed cross-origin requests
    pub allowed_origins: Vec<String>,
    /// Mark session cookies `Secure` (set when serving over HTTPS)
    pub secure_cookies: bool,
    /// SMTP configuration for order report delivery
    pub email: Option<EmailConfig>,
}

/// SMTP configuration for the order report notifier.
///
/// Implements `Debug` manually to redact the relay password.
#[derive(Clone)]
pub struct EmailConfig {
    /// SMTP relay host
    pub smtp_host: String,
    /// SMTP relay port
    pub smtp_port: u16,
    /// SMTP username
    pub smtp_username: String,
    /// SMTP password
    pub smtp_password: SecretString,
    /// From address for outbound mail
    pub from_address: String,
    /// Operator address that receives order reports
    pub notify_address: String,
    /// Delivery timeout for the SMTP transport
    pub timeout: Duration,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_username", &self.smtp_username)
            .field("smtp_password", &"[REDACTED]")
            .field("from_address", &self.from_address)
            .field("notify_address", &self.notify_address)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid, or if the
    /// SMTP block is only partially configured.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url();
        let host = get_env_or_default("FEATHER_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("FEATHER_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("FEATHER_PORT", "4000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("FEATHER_PORT".to_string(), e.to_string()))?;

        let allowed_origins = get_optional_env("FEATHER_ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(ToOwned::to_owned)
                    .collect()
            })
            .unwrap_or_default();

        let secure_cookies = get_env_or_default("FEATHER_SECURE_COOKIES", "false")
            .parse::<bool>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("FEATHER_SECURE_COOKIES".to_string(), e.to_string())
            })?;

        let email = EmailConfig::from_env()?;

        Ok(Self {
            database_url,
            host,
            port,
            allowed_origins,
            secure_cookies,
            email,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl EmailConfig {
    /// Load the SMTP block, keyed off `FEATHER_SMTP_HOST`.
    ///
    /// Returns `Ok(None)` when no host is configured; once a host is set,
    /// the remaining credentials become required.
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(smtp_host) = get_optional_env("FEATHER_SMTP_HOST") else {
            return Ok(None);
        };

        let smtp_port = get_env_or_default("FEATHER_SMTP_PORT", "587")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("FEATHER_SMTP_PORT".to_string(), e.to_string())
            })?;
        let timeout_secs = get_env_or_default("FEATHER_SMTP_TIMEOUT_SECS", "10")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("FEATHER_SMTP_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        Ok(Some(Self {
            smtp_host,
            smtp_port,
            smtp_username: get_required_env("FEATHER_SMTP_USERNAME")?,
            smtp_password: get_required_secret("FEATHER_SMTP_PASSWORD")?,
            from_address: get_required_env("FEATHER_SMTP_FROM")?,
            notify_address: get_required_env("FEATHER_ORDER_NOTIFY_ADDRESS")?,
            timeout: Duration::from_secs(timeout_secs),
        }))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get the database URL, falling back to generic `DATABASE_URL` and finally
/// to a local `SQLite` file.
fn get_database_url() -> SecretString {
    if let Ok(value) = std::env::var("FEATHER_DATABASE_URL") {
        return SecretString::from(value);
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return SecretString::from(value);
    }
    SecretString::from("sqlite://featherstorefront.db")
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig {
            database_url: SecretString::from("sqlite::memory:"),
            host: "127.0.0.1".parse().unwrap(),
            port: 4000,
            allowed_origins: Vec::new(),
            secure_cookies: false,
            email: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 4000);
    }

    #[test]
    fn test_email_config_debug_redacts_password() {
        let config = EmailConfig {
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: 587,
            smtp_username: "mailer".to_string(),
            smtp_password: SecretString::from("super_secret_password"),
            from_address: "orders@example.com".to_string(),
            notify_address: "ops@example.com".to_string(),
            timeout: Duration::from_secs(10),
        };

        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("smtp.example.com"));
        assert!(debug_output.contains("mailer"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_password"));
    }
}
