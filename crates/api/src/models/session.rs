//! Session domain types and per-request identity context.

use chrono::{DateTime, Utc};

use megashop_core::{SessionId, ShopId, VendorId};

/// A persisted vendor session.
///
/// Only the SHA-256 digest of the bearer token is ever stored.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub vendor_id: VendorId,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// A session is valid only while `now < expires_at`.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Input for inserting a session row.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub id: SessionId,
    pub vendor_id: VendorId,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}

/// Identity attached to every request that passed vendor authorization.
///
/// `shop_id` is the vendor's first owned shop by creation time, which is not
/// necessarily the active shop reported by `/auth/me`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VendorContext {
    pub vendor_id: VendorId,
    pub shop_id: Option<ShopId>,
}
