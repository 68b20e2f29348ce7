//! Vendor and administrator authorization.
//!
//! [`require_vendor`] guards every vendor-scoped route: it turns a bearer
//! token into a [`VendorContext`] stored in the request extensions, where
//! [`CurrentVendor`] picks it up. [`RequireAdmin`] guards the admin routes
//! with the static `x-admin-token` credential.
//!
//! Every failure (missing header, malformed header, unknown or expired
//! token) yields the same 401 response.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use sha2::{Digest, Sha256};

use crate::error::{AppError, set_sentry_user};
use crate::models::VendorContext;
use crate::services::ShopResolver;
use crate::state::AppState;

/// Header carrying the administrator credential.
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// The scheme is matched case-insensitively. Returns `None` when the header
/// is absent, not UTF-8, uses another scheme, or carries an empty token.
#[must_use]
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Middleware that authenticates a vendor from its bearer token.
///
/// On success the request continues with a [`VendorContext`] whose shop is
/// the vendor's first owned shop, if any.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` for any credential failure, or
/// `AppError::Database` if the session or shop lookup fails.
pub async fn require_vendor(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(token) = bearer_token(request.headers()) else {
        tracing::warn!(path = %request.uri().path(), "Missing or malformed bearer token");
        return Err(AppError::Unauthorized);
    };

    let Some(vendor_id) = state.sessions().validate(token).await? else {
        tracing::warn!(path = %request.uri().path(), "Unknown or expired bearer token");
        return Err(AppError::Unauthorized);
    };

    let shop_id = ShopResolver::new(state.stores().shops.as_ref())
        .first_owned_shop(vendor_id)
        .await?
        .map(|shop| shop.id);

    set_sentry_user(&vendor_id, None);
    tracing::Span::current().record("vendor_id", tracing::field::display(vendor_id));

    request
        .extensions_mut()
        .insert(VendorContext { vendor_id, shop_id });

    Ok(next.run(request).await)
}

/// Extractor for the context attached by [`require_vendor`].
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(CurrentVendor(ctx): CurrentVendor) -> String {
///     ctx.vendor_id.to_string()
/// }
/// ```
pub struct CurrentVendor(pub VendorContext);

impl<S> FromRequestParts<S> for CurrentVendor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<VendorContext>()
            .copied()
            .map(Self)
            .ok_or(AppError::Unauthorized)
    }
}

/// Extractor that requires a valid administrator token.
pub struct RequireAdmin;

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let presented = parts
            .headers
            .get(ADMIN_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty());

        let Some(presented) = presented else {
            tracing::warn!(path = %parts.uri.path(), "Admin request without token");
            return Err(AppError::Unauthorized);
        };

        let digest = Sha256::digest(presented.as_bytes());
        if !constant_time_eq(digest.as_slice(), state.admin_token_digest()) {
            tracing::warn!(path = %parts.uri.path(), "Admin request with wrong token");
            return Err(AppError::Unauthorized);
        }

        Ok(Self)
    }
}

/// Constant-time byte comparison to prevent timing attacks.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a.iter().zip(b) {
        result |= x ^ y;
    }

    result == 0
}
