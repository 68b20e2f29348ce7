//! Administrative moderation routes. Every handler demands [`RequireAdmin`].

use axum::body::Bytes;
use axum::extract::{Path, State};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use megashop_core::{ShopId, VendorId};

use super::{ApiJson, Envelope, ShopView};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::PendingShop;
use crate::services::ModerationService;
use crate::state::AppState;

fn moderation(state: &AppState) -> ModerationService<'_> {
    let stores = state.stores();
    ModerationService::new(stores.vendors.as_ref(), stores.shops.as_ref())
}

fn parse_id<T: std::str::FromStr>(raw: &str, what: &str) -> Result<T> {
    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid {what} id")))
}

// ============================================================================
// Shops
// ============================================================================

/// A pending shop with its owner's contact details.
#[derive(Debug, Serialize)]
pub struct PendingShopView {
    #[serde(flatten)]
    pub shop: ShopView,
    pub vendor_email: String,
    pub vendor_company: String,
}

impl From<PendingShop> for PendingShopView {
    fn from(pending: PendingShop) -> Self {
        Self {
            shop: pending.shop.into(),
            vendor_email: pending.vendor_email.into_inner(),
            vendor_company: pending.vendor_company,
        }
    }
}

/// Shops awaiting review, newest first.
///
/// GET /api/v1/admin/pending-shops
///
/// # Errors
///
/// Returns 401 without a valid admin token, 500 if the store fails.
pub async fn pending_shops(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Result<Envelope<Vec<PendingShopView>>> {
    let pending = moderation(&state).pending_shops().await?;
    Ok(Envelope::ok(
        pending.into_iter().map(PendingShopView::from).collect(),
    ))
}

#[derive(Debug, Serialize)]
pub struct TransitionResponse {
    pub id: String,
    /// Whether the status actually changed.
    pub changed: bool,
}

/// Approve a pending shop.
///
/// POST /api/v1/admin/shops/{id}/approve
///
/// A missing or non-pending shop is left untouched and still acknowledged.
///
/// # Errors
///
/// Returns 401 without a valid admin token, 400 for a malformed id.
pub async fn approve_shop(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Envelope<TransitionResponse>> {
    let shop_id: ShopId = parse_id(&id, "shop")?;
    let changed = moderation(&state).approve_shop(shop_id).await?;
    Ok(Envelope::with_message(
        TransitionResponse { id, changed },
        "Shop approved",
    ))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RejectRequest {
    pub reason: Option<String>,
}

/// Reject a shop from any state.
///
/// POST /api/v1/admin/shops/{id}/reject
///
/// # Errors
///
/// Returns 401 without a valid admin token, 400 for a malformed id.
pub async fn reject_shop(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Envelope<TransitionResponse>> {
    let shop_id: ShopId = parse_id(&id, "shop")?;
    // The body is optional; an empty one means no reason.
    let req: RejectRequest = if body.is_empty() {
        RejectRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|_| AppError::BadRequest("Invalid request body".to_string()))?
    };
    let reason = req.reason;
    let changed = moderation(&state).reject_shop(shop_id, reason).await?;
    Ok(Envelope::with_message(
        TransitionResponse { id, changed },
        "Shop rejected",
    ))
}

// ============================================================================
// Vendors
// ============================================================================

/// Approve a pending vendor account.
///
/// POST /api/v1/admin/vendors/{id}/approve
///
/// # Errors
///
/// Returns 401 without a valid admin token, 400 for a malformed id.
pub async fn approve_vendor(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Envelope<TransitionResponse>> {
    let vendor_id: VendorId = parse_id(&id, "vendor")?;
    let changed = moderation(&state).approve_vendor(vendor_id).await?;
    Ok(Envelope::with_message(
        TransitionResponse { id, changed },
        "Vendor approved",
    ))
}

/// Reject a vendor account.
///
/// POST /api/v1/admin/vendors/{id}/reject
///
/// # Errors
///
/// Returns 401 without a valid admin token, 400 for a malformed id.
pub async fn reject_vendor(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Envelope<TransitionResponse>> {
    let vendor_id: VendorId = parse_id(&id, "vendor")?;
    let changed = moderation(&state).reject_vendor(vendor_id).await?;
    Ok(Envelope::with_message(
        TransitionResponse { id, changed },
        "Vendor rejected",
    ))
}

// ============================================================================
// Credit
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreditRequest {
    pub amount: Decimal,
}

#[derive(Debug, Serialize)]
pub struct CreditResponse {
    pub id: String,
    pub credit_balance: String,
    pub credited_at: DateTime<Utc>,
}

/// Top up a shop wallet.
///
/// POST /api/v1/admin/shops/{id}/credit
///
/// # Errors
///
/// Returns 400 for a non-positive amount, 404 for an unknown shop.
pub async fn credit_shop(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<CreditRequest>,
) -> Result<Envelope<CreditResponse>> {
    let shop_id: ShopId = parse_id(&id, "shop")?;
    let balance = moderation(&state).credit_shop(shop_id, req.amount).await?;
    Ok(Envelope::with_message(
        CreditResponse {
            id,
            credit_balance: balance.to_string(),
            credited_at: Utc::now(),
        },
        "Shop credit added",
    ))
}

/// Top up a vendor wallet.
///
/// POST /api/v1/admin/vendors/{id}/credit
///
/// # Errors
///
/// Returns 400 for a non-positive amount, 404 for an unknown vendor.
pub async fn credit_vendor(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<CreditRequest>,
) -> Result<Envelope<CreditResponse>> {
    let vendor_id: VendorId = parse_id(&id, "vendor")?;
    let balance = moderation(&state).credit_vendor(vendor_id, req.amount).await?;
    Ok(Envelope::with_message(
        CreditResponse {
            id,
            credit_balance: balance.to_string(),
            credited_at: Utc::now(),
        },
        "Vendor credit added",
    ))
}
