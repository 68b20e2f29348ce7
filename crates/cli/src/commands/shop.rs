//! Shop moderation commands.
//!
//! The same moderation service backs the `/api/v1/admin` routes.

use megashop_core::ShopId;
use megashop_vendor_api::services::ModerationService;

use super::{CliError, stores};

fn parse_shop_id(raw: &str) -> Result<ShopId, CliError> {
    raw.parse().map_err(|_| CliError::InvalidId(raw.to_owned()))
}

/// Print shops awaiting approval.
///
/// # Errors
///
/// Returns an error if the store cannot be queried.
pub async fn pending() -> Result<(), CliError> {
    let stores = stores().await?;
    let pending = ModerationService::new(stores.vendors.as_ref(), stores.shops.as_ref())
        .pending_shops()
        .await?;

    #[allow(clippy::print_stdout)]
    {
        if pending.is_empty() {
            println!("No shops awaiting approval.");
        }
        for entry in &pending {
            println!(
                "{}  {}  {}  {} <{}>  {}",
                entry.shop.id,
                entry.shop.created_at.format("%Y-%m-%d %H:%M"),
                entry.shop.shop_name,
                entry.vendor_company,
                entry.vendor_email,
                entry.shop.shop_url.as_deref().unwrap_or("-"),
            );
        }
    }
    Ok(())
}

/// Approve a pending shop.
///
/// # Errors
///
/// Returns an error for a malformed id or a store failure.
pub async fn approve(id: &str) -> Result<(), CliError> {
    let shop_id = parse_shop_id(id)?;
    let stores = stores().await?;
    let changed = ModerationService::new(stores.vendors.as_ref(), stores.shops.as_ref())
        .approve_shop(shop_id)
        .await?;

    if changed {
        tracing::info!("Shop {shop_id} approved");
    } else {
        tracing::warn!("Shop {shop_id} not found or not pending; nothing changed");
    }
    Ok(())
}

/// Reject a shop from any state.
///
/// # Errors
///
/// Returns an error for a malformed id or a store failure.
pub async fn reject(id: &str, reason: Option<String>) -> Result<(), CliError> {
    let shop_id = parse_shop_id(id)?;
    let stores = stores().await?;
    let changed = ModerationService::new(stores.vendors.as_ref(), stores.shops.as_ref())
        .reject_shop(shop_id, reason)
        .await?;

    if changed {
        tracing::info!("Shop {shop_id} rejected");
    } else {
        tracing::warn!("Shop {shop_id} not found; nothing changed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shop_id() {
        assert!(parse_shop_id("7c9e6679-7425-40de-944b-e07fc1f90ae7").is_ok());
        assert!(matches!(
            parse_shop_id("not-a-uuid"),
            Err(CliError::InvalidId(id)) if id == "not-a-uuid"
        ));
    }
}
