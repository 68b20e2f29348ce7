//! CLI command implementations.

pub mod migrate;
pub mod sessions;
pub mod shop;

use std::time::Duration;

use megashop_vendor_api::config::{self, ConfigError, DEFAULT_STORE_TIMEOUT_SECS};
use megashop_vendor_api::db::RepositoryError;
use megashop_vendor_api::store::Stores;
use sqlx::PgPool;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Moderation action failed.
    #[error("Moderation error: {0}")]
    Moderation(#[from] megashop_vendor_api::services::ModerationError),

    /// Store call failed.
    #[error("Store error: {0}")]
    Store(#[from] RepositoryError),

    /// Shop ID is not a UUID.
    #[error("Invalid shop id: {0}")]
    InvalidId(String),
}

/// Connect to the vendor API database.
async fn connect() -> Result<PgPool, CliError> {
    dotenvy::dotenv().ok();

    let database_url = config::get_database_url("VENDOR_API_DATABASE_URL")?;

    tracing::info!("Connecting to vendor database...");
    Ok(megashop_vendor_api::db::create_pool(&database_url).await?)
}

/// Postgres-backed stores with the default call timeout.
async fn stores() -> Result<Stores, CliError> {
    let pool = connect().await?;
    Ok(Stores::postgres(
        pool,
        Duration::from_secs(DEFAULT_STORE_TIMEOUT_SECS),
    ))
}
