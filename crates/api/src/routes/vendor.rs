//! Vendor-scoped shop routes. All handlers run behind `require_vendor`.

use axum::{extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use super::{ApiJson, Envelope, ShopView};
use crate::error::{AppError, Result};
use crate::middleware::CurrentVendor;
use crate::models::BillingDetails;
use crate::services::{CreateShopInput, ShopResolver, select_active};
use crate::state::AppState;

/// The request-context shop: the vendor's first owned shop, or null.
///
/// GET /api/v1/vendor/shop
///
/// # Errors
///
/// Returns 500 if the store fails.
pub async fn current_shop(
    State(state): State<AppState>,
    CurrentVendor(ctx): CurrentVendor,
) -> Result<Envelope<Option<ShopView>>> {
    let Some(shop_id) = ctx.shop_id else {
        return Ok(Envelope::ok(None));
    };

    let shop = state.stores().shops.get(shop_id).await?;
    Ok(Envelope::ok(shop.map(ShopView::from)))
}

#[derive(Debug, Serialize)]
pub struct MyShopsResponse {
    pub shops: Vec<ShopView>,
    pub active_shop: Option<ShopView>,
}

/// All of the vendor's shops, oldest first, plus the active one.
///
/// GET /api/v1/vendor/my-shops
///
/// # Errors
///
/// Returns 500 if the store fails.
pub async fn my_shops(
    State(state): State<AppState>,
    CurrentVendor(ctx): CurrentVendor,
) -> Result<Envelope<MyShopsResponse>> {
    let shops = ShopResolver::new(state.stores().shops.as_ref())
        .list_shops(ctx.vendor_id)
        .await?;
    let active_shop = select_active(&shops).cloned().map(ShopView::from);

    Ok(Envelope::ok(MyShopsResponse {
        shops: shops.into_iter().map(ShopView::from).collect(),
        active_shop,
    }))
}

/// Body for creating an additional shop. Billing fields are flat.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateShopRequest {
    pub shop_name: String,
    pub shop_url: Option<String>,
    pub shop_logo: Option<String>,
    pub billing_company: Option<String>,
    pub billing_ico: Option<String>,
    pub billing_dic: Option<String>,
    pub billing_ic_dph: Option<String>,
    pub billing_address: Option<String>,
    pub billing_city: Option<String>,
    pub billing_zip: Option<String>,
    pub billing_country: Option<String>,
    pub billing_contact_person: Option<String>,
    pub billing_phone: Option<String>,
    pub billing_email: Option<String>,
    pub copy_from_vendor: bool,
}

impl From<CreateShopRequest> for CreateShopInput {
    fn from(req: CreateShopRequest) -> Self {
        Self {
            shop_name: req.shop_name,
            shop_url: req.shop_url,
            shop_logo: req.shop_logo,
            billing: BillingDetails {
                company: req.billing_company,
                ico: req.billing_ico,
                dic: req.billing_dic,
                ic_dph: req.billing_ic_dph,
                address: req.billing_address,
                city: req.billing_city,
                zip: req.billing_zip,
                country: req.billing_country,
                contact_person: req.billing_contact_person,
                phone: req.billing_phone,
                email: req.billing_email,
            },
            copy_from_vendor: req.copy_from_vendor,
        }
    }
}

/// Create an additional shop. It starts `pending` and awaits approval.
///
/// POST /api/v1/vendor/shops
///
/// # Errors
///
/// Returns 400 if `shop_name` is blank.
pub async fn create_shop(
    State(state): State<AppState>,
    CurrentVendor(ctx): CurrentVendor,
    ApiJson(req): ApiJson<CreateShopRequest>,
) -> Result<(StatusCode, Envelope<ShopView>)> {
    let stores = state.stores();
    let vendor = stores
        .vendors
        .get(ctx.vendor_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let shop = ShopResolver::new(stores.shops.as_ref())
        .create_shop(&vendor, req.into())
        .await?;

    Ok((
        StatusCode::CREATED,
        Envelope::with_message(
            shop.into(),
            "Shop created and is waiting for administrator approval",
        ),
    ))
}
