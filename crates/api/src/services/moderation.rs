//! Operator moderation: shop and vendor approval, wallet top-ups.

use chrono::Utc;
use rust_decimal::Decimal;
use thiserror::Error;

use megashop_core::{Credit, CreditError, ShopId, VendorId};

use crate::db::RepositoryError;
use crate::models::PendingShop;
use crate::store::{ShopStore, VendorStore};

/// Errors that can occur during moderation.
#[derive(Debug, Error)]
pub enum ModerationError {
    /// The credit amount was rejected.
    #[error("invalid amount: {0}")]
    InvalidAmount(#[from] CreditError),

    /// The target shop or vendor does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Moderation actions over shops and vendors.
pub struct ModerationService<'a> {
    vendors: &'a dyn VendorStore,
    shops: &'a dyn ShopStore,
}

impl<'a> ModerationService<'a> {
    #[must_use]
    pub fn new(vendors: &'a dyn VendorStore, shops: &'a dyn ShopStore) -> Self {
        Self { vendors, shops }
    }

    /// Shops awaiting review, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ModerationError::Repository` if the lookup fails.
    pub async fn pending_shops(&self) -> Result<Vec<PendingShop>, ModerationError> {
        Ok(self.shops.list_pending().await?)
    }

    /// Approve a pending shop. Returns `false` if it was missing or not pending.
    ///
    /// # Errors
    ///
    /// Returns `ModerationError::Repository` if the update fails.
    pub async fn approve_shop(&self, id: ShopId) -> Result<bool, ModerationError> {
        let changed = self.shops.approve(id, Utc::now()).await?;
        if changed {
            tracing::info!(shop_id = %id, "Shop approved");
        } else {
            tracing::debug!(shop_id = %id, "Shop approval skipped, not pending");
        }
        Ok(changed)
    }

    /// Reject a shop from any state.
    ///
    /// # Errors
    ///
    /// Returns `ModerationError::Repository` if the update fails.
    pub async fn reject_shop(
        &self,
        id: ShopId,
        reason: Option<String>,
    ) -> Result<bool, ModerationError> {
        let reason = reason.map(|r| r.trim().to_owned()).filter(|r| !r.is_empty());
        let changed = self.shops.reject(id, reason).await?;
        if changed {
            tracing::info!(shop_id = %id, "Shop rejected");
        }
        Ok(changed)
    }

    /// Approve a pending vendor account.
    ///
    /// # Errors
    ///
    /// Returns `ModerationError::Repository` if the update fails.
    pub async fn approve_vendor(&self, id: VendorId) -> Result<bool, ModerationError> {
        let changed = self.vendors.approve(id).await?;
        if changed {
            tracing::info!(vendor_id = %id, "Vendor approved");
        }
        Ok(changed)
    }

    /// Reject a vendor account from any state.
    ///
    /// # Errors
    ///
    /// Returns `ModerationError::Repository` if the update fails.
    pub async fn reject_vendor(&self, id: VendorId) -> Result<bool, ModerationError> {
        let changed = self.vendors.reject(id).await?;
        if changed {
            tracing::info!(vendor_id = %id, "Vendor rejected");
        }
        Ok(changed)
    }

    /// Top up a shop wallet. Returns the new balance.
    ///
    /// # Errors
    ///
    /// Returns `ModerationError::InvalidAmount` for a non-positive or
    /// over-precise amount, `ModerationError::NotFound` for an unknown shop.
    pub async fn credit_shop(&self, id: ShopId, amount: Decimal) -> Result<Credit, ModerationError> {
        let amount = Credit::top_up(amount)?;
        let balance = self
            .shops
            .add_credit(id, amount)
            .await
            .map_err(|e| not_found_as("shop", e))?;
        tracing::info!(shop_id = %id, %amount, %balance, "Shop wallet credited");
        Ok(balance)
    }

    /// Top up a vendor wallet. Returns the new balance.
    ///
    /// The vendor wallet is independent of every shop wallet.
    ///
    /// # Errors
    ///
    /// Returns `ModerationError::InvalidAmount` for a non-positive or
    /// over-precise amount, `ModerationError::NotFound` for an unknown vendor.
    pub async fn credit_vendor(
        &self,
        id: VendorId,
        amount: Decimal,
    ) -> Result<Credit, ModerationError> {
        let amount = Credit::top_up(amount)?;
        let balance = self
            .vendors
            .add_credit(id, amount)
            .await
            .map_err(|e| not_found_as("vendor", e))?;
        tracing::info!(vendor_id = %id, %amount, %balance, "Vendor wallet credited");
        Ok(balance)
    }
}

fn not_found_as(what: &'static str, err: RepositoryError) -> ModerationError {
    match err {
        RepositoryError::NotFound => ModerationError::NotFound(what),
        other => ModerationError::Repository(other),
    }
}
