//! HTTP route handlers for the vendor API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                              - Liveness check
//! GET  /health/ready                        - Readiness check (store ping)
//!
//! # Auth
//! POST /api/v1/auth/login                   - Email/password login
//! POST /api/v1/auth/register                - Vendor registration
//! POST /api/v1/auth/logout                  - Revoke the presented session
//! GET  /api/v1/auth/me                      - Current vendor and shops (bearer)
//!
//! # Vendor (bearer)
//! GET  /api/v1/vendor/shop                  - Request-context shop
//! GET  /api/v1/vendor/my-shops              - All shops and the active one
//! POST /api/v1/vendor/shops                 - Create an additional shop
//!
//! # Admin (x-admin-token)
//! GET  /api/v1/admin/pending-shops          - Shops awaiting review
//! POST /api/v1/admin/shops/{id}/approve     - Approve a pending shop
//! POST /api/v1/admin/shops/{id}/reject      - Reject a shop
//! POST /api/v1/admin/shops/{id}/credit      - Top up a shop wallet
//! POST /api/v1/admin/vendors/{id}/approve   - Approve a pending vendor
//! POST /api/v1/admin/vendors/{id}/reject    - Reject a vendor
//! POST /api/v1/admin/vendors/{id}/credit    - Top up a vendor wallet
//! ```

pub mod admin;
pub mod auth;
pub mod vendor;

use axum::{
    Json, Router,
    body::Body,
    extract::{FromRequest, State},
    http::{Request, StatusCode},
    middleware::{from_fn, from_fn_with_state},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use megashop_core::{DisplayMode, ShopId, ShopStatus};

use crate::error::AppError;
use crate::middleware::{
    api_rate_limiter, auth_rate_limiter, request_id_middleware, require_vendor,
};
use crate::models::{BillingDetails, Shop};
use crate::state::AppState;

// =============================================================================
// Envelope
// =============================================================================

/// JSON body extractor whose rejections use the error envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Success envelope: `{"success": true, "data": ..., "message"?: ...}`.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
}

impl<T: Serialize> Envelope<T> {
    #[must_use]
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    #[must_use]
    pub fn with_message(data: T, message: &'static str) -> Self {
        Self {
            success: true,
            data,
            message: Some(message),
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

// =============================================================================
// Shared views
// =============================================================================

/// Full shop representation returned to its owner.
#[derive(Debug, Serialize)]
pub struct ShopView {
    pub id: ShopId,
    pub shop_name: String,
    pub shop_slug: String,
    pub shop_url: Option<String>,
    pub shop_logo: Option<String>,
    pub status: ShopStatus,
    pub display_mode: DisplayMode,
    pub credit_balance: String,
    pub billing: BillingDetails,
    pub created_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
}

impl From<Shop> for ShopView {
    fn from(shop: Shop) -> Self {
        Self {
            id: shop.id,
            shop_name: shop.shop_name,
            shop_slug: shop.shop_slug.into_inner(),
            shop_url: shop.shop_url,
            shop_logo: shop.shop_logo,
            status: shop.status,
            display_mode: shop.display_mode,
            credit_balance: shop.credit_balance.to_string(),
            billing: shop.billing,
            created_at: shop.created_at,
            approved_at: shop.approved_at,
            rejection_reason: shop.rejection_reason,
        }
    }
}

// =============================================================================
// Routers
// =============================================================================

/// Public auth routes.
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Routes that require a vendor bearer token.
fn vendor_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(auth::me))
        .route("/vendor/shop", get(vendor::current_shop))
        .route("/vendor/my-shops", get(vendor::my_shops))
        .route("/vendor/shops", post(vendor::create_shop))
        .route_layer(from_fn_with_state(state.clone(), require_vendor))
}

/// Administrative routes; each handler demands `RequireAdmin`.
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/pending-shops", get(admin::pending_shops))
        .route("/shops/{id}/approve", post(admin::approve_shop))
        .route("/shops/{id}/reject", post(admin::reject_shop))
        .route("/shops/{id}/credit", post(admin::credit_shop))
        .route("/vendors/{id}/approve", post(admin::approve_vendor))
        .route("/vendors/{id}/reject", post(admin::reject_vendor))
        .route("/vendors/{id}/credit", post(admin::credit_vendor))
}

/// Build the full application without rate limiting.
///
/// Used by tests, which drive the router in-process without a peer address.
pub fn app(state: AppState) -> Router {
    build(state, false)
}

/// Build the full application with the governor rate limiters.
///
/// The server must be run with connect info so the limiter can key on the
/// peer address when no proxy header is present.
pub fn app_with_rate_limits(state: AppState) -> Router {
    build(state, true)
}

fn build(state: AppState, rate_limited: bool) -> Router {
    let mut auth = auth_routes();
    if rate_limited {
        auth = auth.layer(auth_rate_limiter());
    }

    let mut api = Router::new()
        .nest("/auth", auth)
        .merge(vendor_routes(&state))
        .nest("/admin", admin_routes());
    if rate_limited {
        api = api.layer(api_rate_limiter());
    }

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/api/v1", api)
        .fallback(not_found)
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
                vendor_id = tracing::field::Empty,
            )
        }))
        .with_state(state)
}

// =============================================================================
// Health
// =============================================================================

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the store cannot be reached.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.stores().health.ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

async fn not_found() -> AppError {
    AppError::NotFound("Route".to_string())
}
