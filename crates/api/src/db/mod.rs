//! Database operations for the vendor identity `PostgreSQL` store.
//!
//! ## Tables
//!
//! - `vendor` - Seller accounts (normalized email, password hash, status, wallet)
//! - `shop` - Storefronts owned by vendors, with lifecycle and billing snapshot
//! - `vendor_session` - Bearer sessions keyed by the SHA-256 digest of the token
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p megashop-cli -- migrate
//! ```
//!
//! Every repository call is bounded by the configured store timeout. An
//! elapsed timeout is reported as [`RepositoryError::Timeout`], never as an
//! empty result.

pub mod sessions;
pub mod shops;
pub mod vendors;

use std::future::Future;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use sessions::SessionRepository;
pub use shops::ShopRepository;
pub use vendors::VendorRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the store is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// The store did not answer within the configured bound.
    #[error("store call timed out after {0:?}")]
    Timeout(Duration),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Run a store future with an upper time bound.
///
/// Dropping the future on timeout abandons the in-flight query; an open
/// transaction inside it is rolled back when its handle drops.
///
/// # Errors
///
/// Returns `RepositoryError::Timeout` if `limit` elapses first, otherwise the
/// future's own result.
pub async fn bounded<T, F>(limit: Duration, fut: F) -> Result<T, RepositoryError>
where
    F: Future<Output = Result<T, RepositoryError>>,
{
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| RepositoryError::Timeout(limit))?
}

/// Map a unique-constraint violation to `Conflict`, keeping other errors as-is.
pub(crate) fn conflict_on_unique(e: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(e)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bounded_passes_through_fast_results() {
        let value = bounded(Duration::from_secs(1), async { Ok::<_, RepositoryError>(7) })
            .await
            .unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_bounded_reports_timeout_not_empty_result() {
        let result = bounded(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<Option<u8>, RepositoryError>(None)
        })
        .await;

        assert!(matches!(result, Err(RepositoryError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_bounded_keeps_inner_errors() {
        let result: Result<(), _> =
            bounded(Duration::from_secs(1), async { Err(RepositoryError::NotFound) }).await;
        assert!(matches!(result, Err(RepositoryError::NotFound)));
    }
}
