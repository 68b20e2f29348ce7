//! HTTP middleware stack for the vendor API.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, transaction)
//! 2. `TraceLayer` (request span with `request_id` and `vendor_id` fields)
//! 3. Request ID
//! 4. CORS
//! 5. Rate limiting (governor), when enabled
//! 6. Vendor authorization on `/api/v1/auth/me` and `/api/v1/vendor/*`

pub mod auth;
pub mod rate_limit;
pub mod request_id;

pub use auth::{ADMIN_TOKEN_HEADER, CurrentVendor, RequireAdmin, bearer_token, require_vendor};
pub use rate_limit::{api_rate_limiter, auth_rate_limiter};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
