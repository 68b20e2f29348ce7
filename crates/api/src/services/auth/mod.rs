//! Authentication service.
//!
//! Login verifies a password and mints a session; logout revokes the
//! presented session. Every credential failure collapses to
//! [`AuthError::InvalidCredentials`] so callers cannot tell an unknown email
//! from a wrong password.

mod error;
pub mod password;
pub mod session;

pub use error::AuthError;
pub use password::PasswordVerifier;
pub use session::{IssuedSession, SessionManager, SessionToken};

use megashop_core::Email;

use crate::models::{Shop, Vendor};
use crate::services::shops::ShopResolver;
use crate::store::{ShopStore, VendorStore};

/// Result of a successful login.
#[derive(Debug)]
pub struct LoginOutcome {
    pub session: IssuedSession,
    pub vendor: Vendor,
    /// The vendor's active shop, if it owns any.
    pub active_shop: Option<Shop>,
}

/// Authentication service.
pub struct AuthService<'a> {
    vendors: &'a dyn VendorStore,
    shops: &'a dyn ShopStore,
    passwords: &'a PasswordVerifier,
    sessions: &'a SessionManager,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub fn new(
        vendors: &'a dyn VendorStore,
        shops: &'a dyn ShopStore,
        passwords: &'a PasswordVerifier,
        sessions: &'a SessionManager,
    ) -> Self {
        Self {
            vendors,
            shops,
            passwords,
            sessions,
        }
    }

    /// Login with email and password.
    ///
    /// The email is normalized before lookup. Vendor status is not checked:
    /// a `pending` vendor may log in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email is malformed or
    /// unknown, or the password is wrong.
    /// Returns `AuthError::SessionIssue` if authentication succeeded but the
    /// session could not be stored.
    /// Returns `AuthError::Repository` if a store lookup fails.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        let credentials = match Email::parse(email) {
            Ok(email) => self.vendors.find_credentials_by_email(&email).await?,
            Err(_) => None,
        };

        // Runs even when no vendor matched, against the dummy hash
        let matched = self
            .passwords
            .verify(password, credentials.as_ref().map(|c| c.password_hash.as_str()))
            .await?;

        let Some(credentials) = credentials.filter(|_| matched) else {
            tracing::warn!("Failed vendor login attempt");
            return Err(AuthError::InvalidCredentials);
        };
        let vendor = credentials.vendor;

        // Resolved before issuing, so a failed lookup leaves no orphan session
        let active_shop = ShopResolver::new(self.shops)
            .resolve_active_shop(vendor.id)
            .await?;

        let session = self.sessions.issue(vendor.id).await.map_err(|e| {
            tracing::error!(vendor_id = %vendor.id, error = %e, "Failed to issue session after login");
            AuthError::SessionIssue(e)
        })?;

        tracing::info!(vendor_id = %vendor.id, "Vendor logged in");

        Ok(LoginOutcome {
            session,
            vendor,
            active_shop,
        })
    }

    /// Revoke the session behind `token`.
    ///
    /// Unknown or already revoked tokens are not an error.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the store fails.
    pub async fn logout(&self, token: &str) -> Result<(), AuthError> {
        if self.sessions.revoke(token).await? {
            tracing::info!("Vendor session revoked");
        }
        Ok(())
    }
}
