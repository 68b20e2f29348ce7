//! Shop domain types.

use chrono::{DateTime, Utc};

use megashop_core::{Credit, DisplayMode, Email, ShopId, ShopStatus, Slug, VendorId};

use super::billing::BillingDetails;

/// A storefront owned by exactly one vendor.
#[derive(Debug, Clone)]
pub struct Shop {
    pub id: ShopId,
    /// Owning vendor; never changes after creation.
    pub vendor_id: VendorId,
    pub shop_name: String,
    pub shop_slug: Slug,
    pub shop_url: Option<String>,
    pub shop_logo: Option<String>,
    pub status: ShopStatus,
    pub display_mode: DisplayMode,
    /// Shop-scoped spend wallet, separate from the vendor balance.
    pub credit_balance: Credit,
    pub billing: BillingDetails,
    pub created_at: DateTime<Utc>,
    /// Set only by the approve transition.
    pub approved_at: Option<DateTime<Utc>>,
    /// Set only by the reject transition.
    pub rejection_reason: Option<String>,
}

/// Input for inserting a shop row.
///
/// Balance starts at zero and timestamps are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewShop {
    pub id: ShopId,
    pub vendor_id: VendorId,
    pub shop_name: String,
    pub shop_slug: Slug,
    pub shop_url: Option<String>,
    pub shop_logo: Option<String>,
    pub status: ShopStatus,
    pub display_mode: DisplayMode,
    pub billing: BillingDetails,
}

/// A shop awaiting moderation, with its owner's contact details.
#[derive(Debug, Clone)]
pub struct PendingShop {
    pub shop: Shop,
    pub vendor_email: Email,
    pub vendor_company: String,
}
