//! In-process store implementing every persistence trait.
//!
//! Intended for tests and local development. All state sits behind one
//! lock, so the vendor-plus-default-shop insert is atomic: every constraint
//! is checked before anything is written.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};

use megashop_core::{Credit, Email, ShopId, ShopStatus, VendorId, VendorStatus};

use super::{SessionStore, ShopStore, StoreHealth, VendorStore};
use crate::db::RepositoryError;
use crate::models::{
    BillingDetails, NewSession, NewShop, NewVendor, PendingShop, Session, Shop, Vendor,
    VendorCredentials,
};

#[derive(Default)]
struct State {
    vendors: HashMap<VendorId, VendorCredentials>,
    emails: HashMap<Email, VendorId>,
    /// Insertion order doubles as creation order.
    shops: Vec<Shop>,
    sessions: HashMap<String, Session>,
    last_created_at: Option<DateTime<Utc>>,
}

impl State {
    /// Strictly increasing creation timestamps, so ordering never ties.
    fn next_timestamp(&mut self) -> DateTime<Utc> {
        let mut now = Utc::now();
        if let Some(last) = self.last_created_at
            && now <= last
        {
            now = last + TimeDelta::microseconds(1);
        }
        self.last_created_at = Some(now);
        now
    }

    fn build_shop(&mut self, new: NewShop) -> Shop {
        Shop {
            id: new.id,
            vendor_id: new.vendor_id,
            shop_name: new.shop_name,
            shop_slug: new.shop_slug,
            shop_url: new.shop_url,
            shop_logo: new.shop_logo,
            status: new.status,
            display_mode: new.display_mode,
            credit_balance: Credit::ZERO,
            billing: new.billing,
            created_at: self.next_timestamp(),
            approved_at: None,
            rejection_reason: None,
        }
    }

    fn shop_mut(&mut self, id: ShopId) -> Option<&mut Shop> {
        self.shops.iter_mut().find(|s| s.id == id)
    }
}

/// Store holding vendors, shops and sessions in memory.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>, RepositoryError> {
        self.state
            .read()
            .map_err(|_| RepositoryError::DataCorruption("memory store lock poisoned".to_owned()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>, RepositoryError> {
        self.state
            .write()
            .map_err(|_| RepositoryError::DataCorruption("memory store lock poisoned".to_owned()))
    }

    /// Number of stored vendors.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn vendor_count(&self) -> Result<usize, RepositoryError> {
        Ok(self.read()?.vendors.len())
    }

    /// Number of stored sessions, expired ones included.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn session_count(&self) -> Result<usize, RepositoryError> {
        Ok(self.read()?.sessions.len())
    }
}

#[async_trait]
impl VendorStore for MemoryStore {
    async fn find_credentials_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<VendorCredentials>, RepositoryError> {
        let state = self.read()?;
        Ok(state
            .emails
            .get(email)
            .and_then(|id| state.vendors.get(id))
            .cloned())
    }

    async fn get(&self, id: VendorId) -> Result<Option<Vendor>, RepositoryError> {
        Ok(self.read()?.vendors.get(&id).map(|c| c.vendor.clone()))
    }

    async fn email_exists(&self, email: &Email) -> Result<bool, RepositoryError> {
        Ok(self.read()?.emails.contains_key(email))
    }

    async fn create_with_shop(
        &self,
        vendor: NewVendor,
        shop: NewShop,
    ) -> Result<(Vendor, Shop), RepositoryError> {
        let mut state = self.write()?;

        if state.emails.contains_key(&vendor.email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }
        if state.vendors.contains_key(&vendor.id) {
            return Err(RepositoryError::Conflict("vendor already exists".to_owned()));
        }
        if state.shops.iter().any(|s| s.id == shop.id) {
            return Err(RepositoryError::Conflict("shop already exists".to_owned()));
        }
        if shop.vendor_id != vendor.id {
            return Err(RepositoryError::Conflict(
                "default shop must belong to the new vendor".to_owned(),
            ));
        }

        let now = state.next_timestamp();
        let created = Vendor {
            id: vendor.id,
            email: vendor.email.clone(),
            name: vendor.name,
            company_name: vendor.company_name,
            contact_person: vendor.contact_person,
            status: VendorStatus::Pending,
            credit_balance: Credit::ZERO,
            billing: BillingDetails::default(),
            created_at: now,
            updated_at: now,
        };
        let shop = state.build_shop(shop);

        state.emails.insert(vendor.email, vendor.id);
        state.vendors.insert(
            vendor.id,
            VendorCredentials {
                vendor: created.clone(),
                password_hash: vendor.password_hash,
            },
        );
        state.shops.push(shop.clone());

        Ok((created, shop))
    }

    async fn approve(&self, id: VendorId) -> Result<bool, RepositoryError> {
        let mut state = self.write()?;
        match state.vendors.get_mut(&id) {
            Some(c) if c.vendor.status.is_approvable() => {
                c.vendor.status = VendorStatus::Active;
                c.vendor.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn reject(&self, id: VendorId) -> Result<bool, RepositoryError> {
        let mut state = self.write()?;
        match state.vendors.get_mut(&id) {
            Some(c) => {
                c.vendor.status = VendorStatus::Rejected;
                c.vendor.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn add_credit(&self, id: VendorId, amount: Credit) -> Result<Credit, RepositoryError> {
        let mut state = self.write()?;
        let creds = state.vendors.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        creds.vendor.credit_balance = creds.vendor.credit_balance.saturating_add(amount);
        Ok(creds.vendor.credit_balance)
    }
}

#[async_trait]
impl ShopStore for MemoryStore {
    async fn list_by_vendor(&self, vendor_id: VendorId) -> Result<Vec<Shop>, RepositoryError> {
        let state = self.read()?;
        let mut shops: Vec<Shop> = state
            .shops
            .iter()
            .filter(|s| s.vendor_id == vendor_id)
            .cloned()
            .collect();
        shops.sort_by_key(|s| s.created_at);
        Ok(shops)
    }

    async fn get(&self, id: ShopId) -> Result<Option<Shop>, RepositoryError> {
        Ok(self.read()?.shops.iter().find(|s| s.id == id).cloned())
    }

    async fn create(&self, shop: NewShop) -> Result<Shop, RepositoryError> {
        let mut state = self.write()?;
        if !state.vendors.contains_key(&shop.vendor_id) {
            return Err(RepositoryError::NotFound);
        }
        if state.shops.iter().any(|s| s.id == shop.id) {
            return Err(RepositoryError::Conflict("shop already exists".to_owned()));
        }
        let shop = state.build_shop(shop);
        state.shops.push(shop.clone());
        Ok(shop)
    }

    async fn approve(&self, id: ShopId, at: DateTime<Utc>) -> Result<bool, RepositoryError> {
        let mut state = self.write()?;
        match state.shop_mut(id) {
            Some(shop) if shop.status.is_approvable() => {
                shop.status = ShopStatus::Active;
                shop.approved_at = Some(at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn reject(&self, id: ShopId, reason: Option<String>) -> Result<bool, RepositoryError> {
        let mut state = self.write()?;
        match state.shop_mut(id) {
            Some(shop) => {
                shop.status = ShopStatus::Rejected;
                shop.rejection_reason = reason;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_pending(&self) -> Result<Vec<PendingShop>, RepositoryError> {
        let state = self.read()?;
        let mut pending = state
            .shops
            .iter()
            .filter(|s| s.status == ShopStatus::Pending)
            .map(|shop| {
                let owner = state
                    .vendors
                    .get(&shop.vendor_id)
                    .ok_or_else(|| {
                        RepositoryError::DataCorruption(format!("shop {} has no owner", shop.id))
                    })?;
                Ok(PendingShop {
                    shop: shop.clone(),
                    vendor_email: owner.vendor.email.clone(),
                    vendor_company: owner.vendor.company_name.clone(),
                })
            })
            .collect::<Result<Vec<_>, RepositoryError>>()?;
        pending.sort_by(|a, b| b.shop.created_at.cmp(&a.shop.created_at));
        Ok(pending)
    }

    async fn add_credit(&self, id: ShopId, amount: Credit) -> Result<Credit, RepositoryError> {
        let mut state = self.write()?;
        let shop = state.shop_mut(id).ok_or(RepositoryError::NotFound)?;
        shop.credit_balance = shop.credit_balance.saturating_add(amount);
        Ok(shop.credit_balance)
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn insert(&self, session: NewSession) -> Result<Session, RepositoryError> {
        let mut state = self.write()?;
        if state.sessions.contains_key(&session.token_hash) {
            return Err(RepositoryError::Conflict(
                "session token already exists".to_owned(),
            ));
        }
        let stored = Session {
            id: session.id,
            vendor_id: session.vendor_id,
            token_hash: session.token_hash.clone(),
            expires_at: session.expires_at,
            created_at: Utc::now(),
        };
        state.sessions.insert(session.token_hash, stored.clone());
        Ok(stored)
    }

    async fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<Session>, RepositoryError> {
        Ok(self.read()?.sessions.get(token_hash).cloned())
    }

    async fn delete_by_token_hash(&self, token_hash: &str) -> Result<bool, RepositoryError> {
        Ok(self.write()?.sessions.remove(token_hash).is_some())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError> {
        let mut state = self.write()?;
        let before = state.sessions.len();
        state.sessions.retain(|_, s| s.is_valid_at(now));
        Ok((before - state.sessions.len()) as u64)
    }
}

#[async_trait]
impl StoreHealth for MemoryStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        self.read().map(|_| ())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use megashop_core::{DisplayMode, SessionId, Slug};

    use super::*;

    fn new_vendor(email: &str) -> NewVendor {
        NewVendor {
            id: VendorId::new(),
            email: Email::parse(email).unwrap(),
            password_hash: "hash".to_owned(),
            name: "Jana".to_owned(),
            company_name: "Acme".to_owned(),
            contact_person: None,
        }
    }

    fn new_shop(vendor_id: VendorId, name: &str, status: ShopStatus) -> NewShop {
        NewShop {
            id: ShopId::new(),
            vendor_id,
            shop_name: name.to_owned(),
            shop_slug: Slug::from_name(name),
            shop_url: None,
            shop_logo: None,
            status,
            display_mode: DisplayMode::Free,
            billing: BillingDetails::default(),
        }
    }

    #[tokio::test]
    async fn test_create_with_shop_rejects_duplicate_email_without_writing() {
        let store = MemoryStore::new();
        let first = new_vendor("a@b.sk");
        let shop = new_shop(first.id, "One", ShopStatus::Active);
        store.create_with_shop(first, shop).await.unwrap();

        let dup = new_vendor(" A@B.sk ");
        let dup_shop = new_shop(dup.id, "Two", ShopStatus::Active);
        let dup_id = dup.id;
        let result = store.create_with_shop(dup, dup_shop).await;

        assert!(matches!(result, Err(RepositoryError::Conflict(_))));
        assert_eq!(store.vendor_count().unwrap(), 1);
        assert!(ShopStore::list_by_vendor(&store, dup_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_shop_insert_leaves_no_orphan_vendor() {
        let store = MemoryStore::new();
        let owner = new_vendor("owner@b.sk");
        let existing = new_shop(owner.id, "Taken", ShopStatus::Active);
        let taken_id = existing.id;
        store.create_with_shop(owner, existing).await.unwrap();

        let vendor = new_vendor("second@b.sk");
        let mut clashing = new_shop(vendor.id, "Clash", ShopStatus::Active);
        clashing.id = taken_id;

        let result = store.create_with_shop(vendor, clashing).await;

        assert!(matches!(result, Err(RepositoryError::Conflict(_))));
        let email = Email::parse("second@b.sk").unwrap();
        assert!(!store.email_exists(&email).await.unwrap());
    }

    #[tokio::test]
    async fn test_shops_listed_oldest_first() {
        let store = MemoryStore::new();
        let vendor = new_vendor("a@b.sk");
        let vendor_id = vendor.id;
        store
            .create_with_shop(vendor, new_shop(vendor_id, "First", ShopStatus::Active))
            .await
            .unwrap();
        store
            .create(new_shop(vendor_id, "Second", ShopStatus::Pending))
            .await
            .unwrap();
        store
            .create(new_shop(vendor_id, "Third", ShopStatus::Pending))
            .await
            .unwrap();

        let names: Vec<String> = ShopStore::list_by_vendor(&store, vendor_id)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.shop_name)
            .collect();
        assert_eq!(names, ["First", "Second", "Third"]);

        let pending: Vec<String> = store
            .list_pending()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.shop.shop_name)
            .collect();
        assert_eq!(pending, ["Third", "Second"]);
    }

    #[tokio::test]
    async fn test_approve_only_fires_from_pending() {
        let store = MemoryStore::new();
        let vendor = new_vendor("a@b.sk");
        let vendor_id = vendor.id;
        store
            .create_with_shop(vendor, new_shop(vendor_id, "Main", ShopStatus::Active))
            .await
            .unwrap();
        let rejected = store
            .create(new_shop(vendor_id, "Later", ShopStatus::Pending))
            .await
            .unwrap();
        ShopStore::reject(&store, rejected.id, Some("incomplete".into()))
            .await
            .unwrap();

        let changed = ShopStore::approve(&store, rejected.id, Utc::now())
            .await
            .unwrap();

        assert!(!changed);
        let shop = ShopStore::get(&store, rejected.id).await.unwrap().unwrap();
        assert_eq!(shop.status, ShopStatus::Rejected);
        assert_eq!(shop.approved_at, None);
        assert_eq!(shop.rejection_reason.as_deref(), Some("incomplete"));
    }

    #[tokio::test]
    async fn test_session_insert_never_overwrites() {
        let store = MemoryStore::new();
        let session = NewSession {
            id: SessionId::new(),
            vendor_id: VendorId::new(),
            token_hash: "digest".to_owned(),
            expires_at: Utc::now(),
        };
        store.insert(session.clone()).await.unwrap();

        let mut clash = session;
        clash.id = SessionId::new();
        clash.vendor_id = VendorId::new();
        let result = store.insert(clash).await;

        assert!(matches!(result, Err(RepositoryError::Conflict(_))));
        assert_eq!(store.session_count().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_purge_expired_keeps_live_sessions() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let session = |digest: &str, expires_at| NewSession {
            id: SessionId::new(),
            vendor_id: VendorId::new(),
            token_hash: digest.to_owned(),
            expires_at,
        };
        store
            .insert(session("expired", now - TimeDelta::hours(1)))
            .await
            .unwrap();
        store.insert(session("boundary", now)).await.unwrap();
        store
            .insert(session("live", now + TimeDelta::hours(1)))
            .await
            .unwrap();

        assert_eq!(store.purge_expired(now).await.unwrap(), 2);
        assert_eq!(store.session_count().unwrap(), 1);
        assert!(store.find_by_token_hash("live").await.unwrap().is_some());
        assert!(store.find_by_token_hash("expired").await.unwrap().is_none());

        assert_eq!(store.purge_expired(now).await.unwrap(), 0);
    }
}
