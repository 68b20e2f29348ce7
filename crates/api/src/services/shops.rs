//! Shop resolution and multi-shop creation.
//!
//! A vendor may own several shops. Two distinct questions get asked about
//! them and they are answered by two distinct operations:
//!
//! - [`ShopResolver::resolve_active_shop`] - the oldest `active` shop, else
//!   the oldest shop of any status. Reported by `/auth/me` and login.
//! - [`ShopResolver::first_owned_shop`] - the oldest shop regardless of
//!   status. Attached to the request context by the vendor middleware.

use thiserror::Error;

use megashop_core::{DisplayMode, ShopId, ShopStatus, Slug, VendorId};

use crate::db::RepositoryError;
use crate::models::billing::clean;
use crate::models::{BillingDetails, NewShop, Shop, Vendor};
use crate::store::ShopStore;

/// Errors that can occur during shop operations.
#[derive(Debug, Error)]
pub enum ShopError {
    /// A required input field was empty.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Input for creating an additional shop.
#[derive(Debug, Clone, Default)]
pub struct CreateShopInput {
    pub shop_name: String,
    pub shop_url: Option<String>,
    pub shop_logo: Option<String>,
    pub billing: BillingDetails,
    /// Fill blank billing fields from the vendor's own profile.
    pub copy_from_vendor: bool,
}

/// Pick the active shop from a list ordered oldest first.
///
/// First `active` shop wins; with none active, the first shop of any status;
/// with no shops, `None`.
#[must_use]
pub fn select_active(shops: &[Shop]) -> Option<&Shop> {
    shops
        .iter()
        .find(|s| s.status.is_active())
        .or_else(|| shops.first())
}

/// Loads a vendor's shops and answers which one a request acts against.
pub struct ShopResolver<'a> {
    shops: &'a dyn ShopStore,
}

impl<'a> ShopResolver<'a> {
    #[must_use]
    pub fn new(shops: &'a dyn ShopStore) -> Self {
        Self { shops }
    }

    /// All shops owned by `vendor_id`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns the store error if the lookup fails.
    pub async fn list_shops(&self, vendor_id: VendorId) -> Result<Vec<Shop>, RepositoryError> {
        self.shops.list_by_vendor(vendor_id).await
    }

    /// The vendor's active shop per [`select_active`].
    ///
    /// # Errors
    ///
    /// Returns the store error if the lookup fails.
    pub async fn resolve_active_shop(
        &self,
        vendor_id: VendorId,
    ) -> Result<Option<Shop>, RepositoryError> {
        let shops = self.list_shops(vendor_id).await?;
        Ok(select_active(&shops).cloned())
    }

    /// The vendor's oldest shop, whatever its status.
    ///
    /// # Errors
    ///
    /// Returns the store error if the lookup fails.
    pub async fn first_owned_shop(
        &self,
        vendor_id: VendorId,
    ) -> Result<Option<Shop>, RepositoryError> {
        let shops = self.list_shops(vendor_id).await?;
        Ok(shops.into_iter().next())
    }

    /// Create an additional shop for `vendor`.
    ///
    /// The shop always starts `pending` on the `free` tier with a zero
    /// balance, whatever the vendor already owns. The billing country
    /// defaults to `SK`.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::MissingField` if the shop name is blank.
    /// Returns `ShopError::Repository` if the insert fails.
    pub async fn create_shop(
        &self,
        vendor: &Vendor,
        input: CreateShopInput,
    ) -> Result<Shop, ShopError> {
        let shop_name = input.shop_name.trim().to_owned();
        if shop_name.is_empty() {
            return Err(ShopError::MissingField("shop_name"));
        }

        let billing = if input.copy_from_vendor {
            input.billing.fill_missing_from(&vendor.billing_profile())
        } else {
            input.billing.normalized()
        }
        .with_default_country();

        let shop = self
            .shops
            .create(NewShop {
                id: ShopId::new(),
                vendor_id: vendor.id,
                shop_slug: Slug::from_name(&shop_name),
                shop_name,
                shop_url: clean(input.shop_url),
                shop_logo: clean(input.shop_logo),
                status: ShopStatus::Pending,
                display_mode: DisplayMode::Free,
                billing,
            })
            .await?;

        tracing::info!(vendor_id = %vendor.id, shop_id = %shop.id, "Shop created, awaiting approval");
        Ok(shop)
    }
}
