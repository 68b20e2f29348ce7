//! Authentication routes: login, registration, logout and `/me`.

use axum::{extract::State, http::HeaderMap};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use megashop_core::{DisplayMode, ShopId, ShopStatus, VendorId, VendorStatus};

use super::{ApiJson, Envelope, ShopView};
use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{CurrentVendor, bearer_token};
use crate::models::{Shop, Vendor};
use crate::services::{
    AuthService, RegistrationInput, RegistrationService, ShopResolver, select_active,
};
use crate::state::AppState;

// ============================================================================
// Login
// ============================================================================

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Vendor summary returned by login.
#[derive(Debug, Serialize)]
pub struct LoginVendor {
    pub id: VendorId,
    pub email: String,
    pub company_name: String,
    pub status: VendorStatus,
}

/// Active shop summary returned by login.
#[derive(Debug, Serialize)]
pub struct LoginShop {
    pub id: ShopId,
    pub shop_name: String,
    pub status: ShopStatus,
    pub display_mode: DisplayMode,
    pub credit_balance: String,
}

impl From<Shop> for LoginShop {
    fn from(shop: Shop) -> Self {
        Self {
            id: shop.id,
            shop_name: shop.shop_name,
            status: shop.status,
            display_mode: shop.display_mode,
            credit_balance: shop.credit_balance.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub vendor: LoginVendor,
    pub shop: Option<LoginShop>,
}

/// Log a vendor in.
///
/// POST /api/v1/auth/login
///
/// # Errors
///
/// Returns 401 with one generic message for any credential failure.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Envelope<LoginResponse>> {
    let stores = state.stores();
    let outcome = AuthService::new(
        stores.vendors.as_ref(),
        stores.shops.as_ref(),
        state.passwords(),
        state.sessions(),
    )
    .login(&req.email, &req.password)
    .await?;

    set_sentry_user(&outcome.vendor.id, Some(outcome.vendor.email.as_str()));

    Ok(Envelope::ok(LoginResponse {
        token: outcome.session.token.expose().to_owned(),
        expires_at: outcome.session.expires_at,
        vendor: LoginVendor {
            id: outcome.vendor.id,
            email: outcome.vendor.email.into_inner(),
            company_name: outcome.vendor.company_name,
            status: outcome.vendor.status,
        },
        shop: outcome.active_shop.map(LoginShop::from),
    }))
}

// ============================================================================
// Registration
// ============================================================================

/// Registration request body. Only email and password are required.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub name: Option<String>,
    pub company_name: Option<String>,
    pub contact_person: Option<String>,
    pub shop_name: Option<String>,
    pub shop_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisteredVendor {
    pub id: VendorId,
    pub email: String,
    pub name: String,
    pub company_name: String,
    pub status: VendorStatus,
}

#[derive(Debug, Serialize)]
pub struct RegisteredShop {
    pub id: ShopId,
    pub shop_name: String,
    pub shop_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub vendor: RegisteredVendor,
    pub shop: RegisteredShop,
}

/// Register a vendor with its default shop.
///
/// POST /api/v1/auth/register
///
/// # Errors
///
/// Returns 400 for missing fields, a malformed email or a taken email.
pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<Envelope<RegisterResponse>> {
    let registered = RegistrationService::new(
        state.stores().vendors.as_ref(),
        state.passwords(),
        state.sessions(),
    )
    .register(RegistrationInput {
        email: req.email,
        password: req.password,
        name: req.name,
        company_name: req.company_name,
        contact_person: req.contact_person,
        shop_name: req.shop_name,
        shop_url: req.shop_url,
    })
    .await?;

    set_sentry_user(&registered.vendor.id, Some(registered.vendor.email.as_str()));

    Ok(Envelope::with_message(
        RegisterResponse {
            token: registered.session.token.expose().to_owned(),
            expires_at: registered.session.expires_at,
            vendor: RegisteredVendor {
                id: registered.vendor.id,
                email: registered.vendor.email.into_inner(),
                name: registered.vendor.name,
                company_name: registered.vendor.company_name,
                status: registered.vendor.status,
            },
            shop: RegisteredShop {
                id: registered.shop.id,
                shop_name: registered.shop.shop_name,
                shop_url: registered.shop.shop_url,
            },
        },
        "Registration successful",
    ))
}

// ============================================================================
// Logout
// ============================================================================

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub logged_out: bool,
}

/// Revoke the presented session.
///
/// POST /api/v1/auth/logout
///
/// Always acknowledges, whether or not a valid token was presented.
///
/// # Errors
///
/// Returns 500 only if the store fails while deleting the session.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Envelope<LogoutResponse>> {
    if let Some(token) = bearer_token(&headers) {
        let stores = state.stores();
        AuthService::new(
            stores.vendors.as_ref(),
            stores.shops.as_ref(),
            state.passwords(),
            state.sessions(),
        )
        .logout(token)
        .await?;
    }

    clear_sentry_user();
    Ok(Envelope::with_message(
        LogoutResponse { logged_out: true },
        "Logged out",
    ))
}

// ============================================================================
// Current identity
// ============================================================================

/// Vendor profile returned by `/me`.
#[derive(Debug, Serialize)]
pub struct VendorProfile {
    pub id: VendorId,
    pub email: String,
    pub name: String,
    pub company_name: String,
    pub contact_person: Option<String>,
    pub status: VendorStatus,
    pub credit_balance: String,
}

impl From<Vendor> for VendorProfile {
    fn from(vendor: Vendor) -> Self {
        Self {
            id: vendor.id,
            email: vendor.email.into_inner(),
            name: vendor.name,
            company_name: vendor.company_name,
            contact_person: vendor.contact_person,
            status: vendor.status,
            credit_balance: vendor.credit_balance.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub vendor: VendorProfile,
    pub shops: Vec<ShopView>,
    pub shop: Option<ShopView>,
}

/// Current vendor, its shops oldest first, and the active shop.
///
/// GET /api/v1/auth/me
///
/// # Errors
///
/// Returns 401 if the session's vendor no longer exists.
pub async fn me(
    State(state): State<AppState>,
    CurrentVendor(ctx): CurrentVendor,
) -> Result<Envelope<MeResponse>> {
    let stores = state.stores();
    let vendor = stores
        .vendors
        .get(ctx.vendor_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let shops = ShopResolver::new(stores.shops.as_ref())
        .list_shops(ctx.vendor_id)
        .await?;
    let active = select_active(&shops).cloned();

    Ok(Envelope::ok(MeResponse {
        vendor: vendor.into(),
        shops: shops.into_iter().map(ShopView::from).collect(),
        shop: active.map(ShopView::from),
    }))
}
