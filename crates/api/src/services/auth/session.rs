//! Bearer session issuance, validation and revocation.
//!
//! Tokens are 32 bytes from the OS-seeded thread RNG, hex-encoded to a
//! 64-character string. The store only ever sees the SHA-256 digest of a
//! token, so a leaked session table cannot be replayed.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use rand::RngCore;
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};

use megashop_core::{SessionId, VendorId};

use crate::db::RepositoryError;
use crate::models::NewSession;
use crate::store::SessionStore;

/// Raw token length in bytes (256 bits of entropy).
pub const TOKEN_BYTES: usize = 32;

/// An opaque bearer token handed to the client exactly once.
#[derive(Clone)]
pub struct SessionToken(SecretString);

impl SessionToken {
    fn generate() -> Self {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        Self(SecretString::from(hex::encode(bytes)))
    }

    /// The token text, for writing into a response body.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionToken([REDACTED])")
    }
}

/// A freshly minted session.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: SessionToken,
    pub expires_at: DateTime<Utc>,
}

/// Hex SHA-256 digest under which a token is stored.
#[must_use]
pub fn token_digest(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Issues, validates and revokes vendor sessions.
#[derive(Clone)]
pub struct SessionManager {
    sessions: Arc<dyn SessionStore>,
    ttl: TimeDelta,
}

impl SessionManager {
    #[must_use]
    pub fn new(sessions: Arc<dyn SessionStore>, ttl: TimeDelta) -> Self {
        Self { sessions, ttl }
    }

    /// Mint and persist a session for `vendor_id`.
    ///
    /// # Errors
    ///
    /// Returns the store error when the session cannot be persisted, including
    /// `RepositoryError::Conflict` on a digest collision. No token is
    /// returned in that case.
    pub async fn issue(&self, vendor_id: VendorId) -> Result<IssuedSession, RepositoryError> {
        self.issue_at(vendor_id, Utc::now()).await
    }

    /// [`issue`](Self::issue) with an explicit clock reading.
    ///
    /// # Errors
    ///
    /// See [`issue`](Self::issue).
    pub async fn issue_at(
        &self,
        vendor_id: VendorId,
        now: DateTime<Utc>,
    ) -> Result<IssuedSession, RepositoryError> {
        let token = SessionToken::generate();
        let expires_at = now + self.ttl;

        self.sessions
            .insert(NewSession {
                id: SessionId::new(),
                vendor_id,
                token_hash: token_digest(token.expose()),
                expires_at,
            })
            .await?;

        tracing::debug!(vendor_id = %vendor_id, %expires_at, "Session issued");
        Ok(IssuedSession { token, expires_at })
    }

    /// Resolve a presented token to its vendor.
    ///
    /// Returns `Ok(None)` when the token is unknown or expired. Pure read: no
    /// sliding expiry, no caching.
    ///
    /// # Errors
    ///
    /// Returns the store error if the lookup itself fails.
    pub async fn validate(&self, token: &str) -> Result<Option<VendorId>, RepositoryError> {
        self.validate_at(token, Utc::now()).await
    }

    /// [`validate`](Self::validate) with an explicit clock reading.
    ///
    /// # Errors
    ///
    /// See [`validate`](Self::validate).
    pub async fn validate_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<VendorId>, RepositoryError> {
        if token.is_empty() {
            return Ok(None);
        }

        let session = self.sessions.find_by_token_hash(&token_digest(token)).await?;

        Ok(session
            .filter(|s| s.is_valid_at(now))
            .map(|s| s.vendor_id))
    }

    /// Terminate the session behind `token`. Returns whether one existed.
    ///
    /// # Errors
    ///
    /// Returns the store error if the delete fails.
    pub async fn revoke(&self, token: &str) -> Result<bool, RepositoryError> {
        if token.is_empty() {
            return Ok(false);
        }
        self.sessions.delete_by_token_hash(&token_digest(token)).await
    }

    /// Delete sessions that have expired. Returns how many were removed.
    ///
    /// Expired rows are already rejected by [`validate`](Self::validate);
    /// this only reclaims storage and should be called periodically.
    ///
    /// # Errors
    ///
    /// Returns the store error if the delete fails.
    pub async fn purge_expired(&self) -> Result<u64, RepositoryError> {
        self.purge_expired_at(Utc::now()).await
    }

    /// [`purge_expired`](Self::purge_expired) with an explicit clock reading.
    ///
    /// # Errors
    ///
    /// See [`purge_expired`](Self::purge_expired).
    pub async fn purge_expired_at(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError> {
        let count = self.sessions.purge_expired(now).await?;
        if count > 0 {
            tracing::info!(count, "Purged expired vendor sessions");
        }
        Ok(count)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn manager() -> SessionManager {
        SessionManager::new(Arc::new(MemoryStore::new()), TimeDelta::days(30))
    }

    #[test]
    fn test_token_is_64_hex_chars() {
        let token = SessionToken::generate();
        assert_eq!(token.expose().len(), TOKEN_BYTES * 2);
        assert!(token.expose().chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token.expose(), SessionToken::generate().expose());
    }

    #[test]
    fn test_debug_redacts_token() {
        let token = SessionToken::generate();
        assert!(!format!("{token:?}").contains(token.expose()));
    }

    #[test]
    fn test_digest_is_stable_and_distinct_from_token() {
        let digest = token_digest("abc");
        assert_eq!(digest, token_digest("abc"));
        assert_eq!(digest.len(), 64);
        assert_ne!(digest, "abc");
    }

    #[tokio::test]
    async fn test_expiry_boundary() {
        let manager = manager();
        let vendor_id = VendorId::new();
        let issued_at = Utc::now();
        let issued = manager.issue_at(vendor_id, issued_at).await.unwrap();
        let token = issued.token.expose();

        assert_eq!(issued.expires_at, issued_at + TimeDelta::days(30));

        let just_before = issued.expires_at - TimeDelta::seconds(1);
        let just_after = issued.expires_at + TimeDelta::seconds(1);

        assert_eq!(
            manager.validate_at(token, just_before).await.unwrap(),
            Some(vendor_id)
        );
        assert_eq!(manager.validate_at(token, issued.expires_at).await.unwrap(), None);
        assert_eq!(manager.validate_at(token, just_after).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_unknown_and_empty_tokens_are_invalid() {
        let manager = manager();
        assert_eq!(manager.validate("deadbeef").await.unwrap(), None);
        assert_eq!(manager.validate("").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_new_login_mints_new_session() {
        let manager = manager();
        let vendor_id = VendorId::new();
        let first = manager.issue(vendor_id).await.unwrap();
        let second = manager.issue(vendor_id).await.unwrap();

        assert_ne!(first.token.expose(), second.token.expose());
        assert_eq!(manager.validate(first.token.expose()).await.unwrap(), Some(vendor_id));
        assert_eq!(manager.validate(second.token.expose()).await.unwrap(), Some(vendor_id));
    }

    #[tokio::test]
    async fn test_revoke_invalidates_token() {
        let manager = manager();
        let issued = manager.issue(VendorId::new()).await.unwrap();
        let token = issued.token.expose();

        assert!(manager.revoke(token).await.unwrap());
        assert_eq!(manager.validate(token).await.unwrap(), None);
        assert!(!manager.revoke(token).await.unwrap());
    }

    #[tokio::test]
    async fn test_purge_removes_only_expired_sessions() {
        let store = Arc::new(MemoryStore::new());
        let manager = SessionManager::new(store.clone(), TimeDelta::days(30));
        let now = Utc::now();
        let stale = manager
            .issue_at(VendorId::new(), now - TimeDelta::days(31))
            .await
            .unwrap();
        let fresh = manager.issue_at(VendorId::new(), now).await.unwrap();

        assert_eq!(manager.purge_expired_at(now).await.unwrap(), 1);
        assert_eq!(store.session_count().unwrap(), 1);
        assert_eq!(manager.validate_at(stale.token.expose(), now).await.unwrap(), None);
        assert!(
            manager
                .validate_at(fresh.token.expose(), now)
                .await
                .unwrap()
                .is_some()
        );
    }
}
