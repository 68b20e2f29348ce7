//! Substitutable persistence seams.
//!
//! Services never reach a global store handle. They receive the trait
//! objects bundled in [`Stores`], which is built either over `PostgreSQL`
//! ([`Stores::postgres`]) or over the in-process [`MemoryStore`]
//! ([`Stores::in_memory`]).

pub mod memory;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use megashop_core::{Credit, Email, ShopId, VendorId};

pub use memory::MemoryStore;

use crate::db::{RepositoryError, SessionRepository, ShopRepository, VendorRepository};
use crate::models::{
    NewSession, NewShop, NewVendor, PendingShop, Session, Shop, Vendor, VendorCredentials,
};

/// Vendor account persistence.
#[async_trait]
pub trait VendorStore: Send + Sync {
    /// Look up a vendor and its password hash by normalized email.
    async fn find_credentials_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<VendorCredentials>, RepositoryError>;

    async fn get(&self, id: VendorId) -> Result<Option<Vendor>, RepositoryError>;

    async fn email_exists(&self, email: &Email) -> Result<bool, RepositoryError>;

    /// Insert a vendor and its default shop as one unit.
    ///
    /// Either both rows exist afterwards or neither does. A duplicate email
    /// yields `RepositoryError::Conflict`.
    async fn create_with_shop(
        &self,
        vendor: NewVendor,
        shop: NewShop,
    ) -> Result<(Vendor, Shop), RepositoryError>;

    /// Move a `pending` vendor to `active`. Returns whether a row changed.
    async fn approve(&self, id: VendorId) -> Result<bool, RepositoryError>;

    /// Mark a vendor `rejected` from any state. Returns whether a row changed.
    async fn reject(&self, id: VendorId) -> Result<bool, RepositoryError>;

    /// Add to the vendor wallet and return the new balance.
    async fn add_credit(&self, id: VendorId, amount: Credit) -> Result<Credit, RepositoryError>;
}

/// Shop persistence and lifecycle transitions.
#[async_trait]
pub trait ShopStore: Send + Sync {
    /// All shops of a vendor, oldest first.
    async fn list_by_vendor(&self, vendor_id: VendorId) -> Result<Vec<Shop>, RepositoryError>;

    async fn get(&self, id: ShopId) -> Result<Option<Shop>, RepositoryError>;

    async fn create(&self, shop: NewShop) -> Result<Shop, RepositoryError>;

    /// Move a `pending` shop to `active`, stamping `approved_at`.
    ///
    /// Returns whether a row changed; a missing or non-pending shop is left
    /// untouched.
    async fn approve(&self, id: ShopId, at: DateTime<Utc>) -> Result<bool, RepositoryError>;

    /// Mark a shop `rejected` from any state, recording `reason`.
    async fn reject(&self, id: ShopId, reason: Option<String>) -> Result<bool, RepositoryError>;

    /// Pending shops with owner details, newest first.
    async fn list_pending(&self) -> Result<Vec<PendingShop>, RepositoryError>;

    /// Add to the shop wallet and return the new balance.
    async fn add_credit(&self, id: ShopId, amount: Credit) -> Result<Credit, RepositoryError>;
}

/// Session persistence keyed by token digest.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist a session. A duplicate token digest yields `Conflict`, never an overwrite.
    async fn insert(&self, session: NewSession) -> Result<Session, RepositoryError>;

    async fn find_by_token_hash(&self, token_hash: &str)
    -> Result<Option<Session>, RepositoryError>;

    /// Remove a session. Returns whether one existed.
    async fn delete_by_token_hash(&self, token_hash: &str) -> Result<bool, RepositoryError>;

    /// Delete every session whose expiry is at or before `now`. Returns how
    /// many were removed.
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError>;
}

/// Readiness check for the backing store.
#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// The store handles every service is constructed with.
#[derive(Clone)]
pub struct Stores {
    pub vendors: Arc<dyn VendorStore>,
    pub shops: Arc<dyn ShopStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub health: Arc<dyn StoreHealth>,
}

impl Stores {
    /// Stores backed by `PostgreSQL`, each call bounded by `timeout`.
    #[must_use]
    pub fn postgres(pool: PgPool, timeout: Duration) -> Self {
        Self {
            vendors: Arc::new(VendorRepository::new(pool.clone(), timeout)),
            shops: Arc::new(ShopRepository::new(pool.clone(), timeout)),
            sessions: Arc::new(SessionRepository::new(pool.clone(), timeout)),
            health: Arc::new(PgHealth { pool, timeout }),
        }
    }

    /// Stores backed by one shared in-process [`MemoryStore`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_memory(Arc::new(MemoryStore::new()))
    }

    /// Stores sharing an existing [`MemoryStore`], so tests can inspect it.
    #[must_use]
    pub fn from_memory(store: Arc<MemoryStore>) -> Self {
        Self {
            vendors: store.clone(),
            shops: store.clone(),
            sessions: store.clone(),
            health: store,
        }
    }
}

struct PgHealth {
    pool: PgPool,
    timeout: Duration,
}

#[async_trait]
impl StoreHealth for PgHealth {
    async fn ping(&self) -> Result<(), RepositoryError> {
        crate::db::bounded(self.timeout, async {
            sqlx::query("SELECT 1").execute(&self.pool).await?;
            Ok(())
        })
        .await
    }
}
