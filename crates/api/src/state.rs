//! Application state shared across handlers.

use std::sync::Arc;

use chrono::TimeDelta;
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};

use crate::config::VendorApiConfig;
use crate::services::{PasswordVerifier, SessionManager};
use crate::store::Stores;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Holds the store handles and the services
/// built over them; nothing in the crate reaches a global store.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    stores: Stores,
    passwords: PasswordVerifier,
    sessions: SessionManager,
    admin_token_digest: Vec<u8>,
}

impl AppState {
    /// Create application state from loaded configuration.
    #[must_use]
    pub fn new(config: &VendorApiConfig, stores: Stores, passwords: PasswordVerifier) -> Self {
        Self::from_parts(stores, passwords, config.session_ttl, &config.admin_token)
    }

    /// Create application state from explicit parts.
    ///
    /// # Arguments
    ///
    /// * `stores` - Persistence handles
    /// * `passwords` - Password hasher/verifier
    /// * `session_ttl` - Lifetime of issued sessions
    /// * `admin_token` - Credential expected in the `x-admin-token` header
    #[must_use]
    pub fn from_parts(
        stores: Stores,
        passwords: PasswordVerifier,
        session_ttl: TimeDelta,
        admin_token: &SecretString,
    ) -> Self {
        let sessions = SessionManager::new(stores.sessions.clone(), session_ttl);
        let admin_token_digest = Sha256::digest(admin_token.expose_secret().as_bytes()).to_vec();

        Self {
            inner: Arc::new(AppStateInner {
                stores,
                passwords,
                sessions,
                admin_token_digest,
            }),
        }
    }

    /// Get the store handles.
    #[must_use]
    pub fn stores(&self) -> &Stores {
        &self.inner.stores
    }

    /// Get the password verifier.
    #[must_use]
    pub fn passwords(&self) -> &PasswordVerifier {
        &self.inner.passwords
    }

    /// Get the session manager.
    #[must_use]
    pub fn sessions(&self) -> &SessionManager {
        &self.inner.sessions
    }

    /// SHA-256 digest of the configured admin token.
    #[must_use]
    pub fn admin_token_digest(&self) -> &[u8] {
        &self.inner.admin_token_digest
    }
}
