//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! feather-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `FEATHER_DATABASE_URL` - `SQLite` connection string
//!   (default: `sqlite://featherstorefront.db`)

use tracing::info;

use feather_storefront::db;

/// Run the storefront schema migrations.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or a migration fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let database_url = super::database_url();

    info!("Connecting to storefront database...");
    let pool = db::create_pool(&database_url).await?;

    info!("Running migrations...");
    db::MIGRATOR.run(&pool).await?;

    info!("Migrations complete!");
    Ok(())
}
