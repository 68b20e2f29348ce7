//! Vendor session maintenance.

use chrono::Utc;

use super::{CliError, stores};

/// Delete every expired vendor session.
///
/// The API server runs the same sweep hourly; this is for one-off cleanup.
///
/// # Errors
///
/// Returns an error if the store cannot be reached or the delete fails.
pub async fn purge() -> Result<(), CliError> {
    let stores = stores().await?;
    let count = stores.sessions.purge_expired(Utc::now()).await?;

    tracing::info!("Purged {count} expired session(s)");
    Ok(())
}
