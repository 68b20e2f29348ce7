//! Database migration command.
//!
//! # Environment Variables
//!
//! - `VENDOR_API_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! # Migration Files
//!
//! `crates/api/migrations/`

use super::{CliError, connect};

/// Run vendor API database migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CliError> {
    let pool = connect().await?;

    tracing::info!("Running vendor API migrations...");
    sqlx::migrate!("../api/migrations").run(&pool).await?;

    tracing::info!("Vendor API migrations complete!");
    Ok(())
}
