//! Vendor registration.
//!
//! Creates a vendor together with one default shop in a single store call,
//! then mints a session so the caller is signed in immediately.

use megashop_core::{DisplayMode, Email, ShopId, ShopStatus, Slug, VendorId, default_shop_url};

use crate::db::RepositoryError;
use crate::models::billing::clean;
use crate::models::{BillingDetails, NewShop, NewVendor, Shop, Vendor};
use crate::services::auth::{AuthError, IssuedSession, PasswordVerifier, SessionManager};
use crate::store::VendorStore;

/// Raw sign-up form. Free-text fields may be blank.
#[derive(Debug, Clone, Default)]
pub struct RegistrationInput {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
    pub company_name: Option<String>,
    pub contact_person: Option<String>,
    pub shop_name: Option<String>,
    pub shop_url: Option<String>,
}

/// Identity fields after the fallback chain has run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    pub name: String,
    pub company_name: String,
    pub contact_person: Option<String>,
}

/// Fill missing identity fields.
///
/// Name falls back to contact person; company falls back to the shop name;
/// a name still missing then falls back to the (possibly filled) company.
#[must_use]
pub fn resolve_identity(
    name: Option<String>,
    company_name: Option<String>,
    contact_person: Option<String>,
    shop_name: Option<&str>,
) -> ResolvedIdentity {
    let contact_person = clean(contact_person);
    let company_name = clean(company_name).or_else(|| clean(shop_name.map(str::to_owned)));
    let name = clean(name)
        .or_else(|| contact_person.clone())
        .or_else(|| company_name.clone());

    ResolvedIdentity {
        name: name.unwrap_or_default(),
        company_name: company_name.unwrap_or_default(),
        contact_person,
    }
}

/// Name of the implicit shop: explicit shop name, else company, else the
/// local part of the email.
#[must_use]
pub fn default_shop_name(shop_name: Option<&str>, company_name: &str, email: &Email) -> String {
    shop_name
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| Some(company_name.trim()).filter(|s| !s.is_empty()))
        .unwrap_or_else(|| email.local_part())
        .to_owned()
}

/// A completed registration.
#[derive(Debug)]
pub struct Registered {
    pub session: IssuedSession,
    pub vendor: Vendor,
    pub shop: Shop,
}

/// Vendor sign-up orchestration.
pub struct RegistrationService<'a> {
    vendors: &'a dyn VendorStore,
    passwords: &'a PasswordVerifier,
    sessions: &'a SessionManager,
}

impl<'a> RegistrationService<'a> {
    #[must_use]
    pub fn new(
        vendors: &'a dyn VendorStore,
        passwords: &'a PasswordVerifier,
        sessions: &'a SessionManager,
    ) -> Self {
        Self {
            vendors,
            passwords,
            sessions,
        }
    }

    /// Register a vendor with its default shop and sign it in.
    ///
    /// The vendor starts `pending`; the implicit shop starts `active`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingField` if email or password is empty.
    /// Returns `AuthError::InvalidEmail` if the email is malformed.
    /// Returns `AuthError::EmailTaken` if the normalized email is registered,
    /// whether caught by the pre-check or by the store's unique constraint.
    /// Returns `AuthError::PasswordHash` if hashing fails.
    /// Returns `AuthError::SessionIssue` if the account was created but no
    /// session could be stored.
    pub async fn register(&self, input: RegistrationInput) -> Result<Registered, AuthError> {
        if input.email.trim().is_empty() {
            return Err(AuthError::MissingField("email"));
        }
        if input.password.is_empty() {
            return Err(AuthError::MissingField("password"));
        }
        let email = Email::parse(&input.email)?;

        let identity = resolve_identity(
            input.name,
            input.company_name,
            input.contact_person,
            input.shop_name.as_deref(),
        );

        if self.vendors.email_exists(&email).await? {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = self.passwords.hash(&input.password).await?;

        let shop_name = default_shop_name(
            input.shop_name.as_deref(),
            &identity.company_name,
            &email,
        );
        let shop_url = clean(input.shop_url).unwrap_or_else(|| default_shop_url(&shop_name));

        let vendor_id = VendorId::new();
        let new_vendor = NewVendor {
            id: vendor_id,
            email,
            password_hash,
            name: identity.name,
            company_name: identity.company_name,
            contact_person: identity.contact_person,
        };
        let new_shop = NewShop {
            id: ShopId::new(),
            vendor_id,
            shop_slug: Slug::from_name(&shop_name),
            shop_name,
            shop_url: Some(shop_url),
            shop_logo: None,
            status: ShopStatus::Active,
            display_mode: DisplayMode::Free,
            billing: BillingDetails::default(),
        };

        let (vendor, shop) = self
            .vendors
            .create_with_shop(new_vendor, new_shop)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::EmailTaken,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(vendor_id = %vendor.id, shop_id = %shop.id, "Vendor registered");

        let session = self.sessions.issue(vendor.id).await.map_err(|e| {
            tracing::error!(vendor_id = %vendor.id, error = %e, "Failed to issue session after registration");
            AuthError::SessionIssue(e)
        })?;

        Ok(Registered {
            session,
            vendor,
            shop,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use chrono::TimeDelta;
    use megashop_core::VendorStatus;

    use super::*;
    use crate::store::{MemoryStore, ShopStore};

    fn s(v: &str) -> Option<String> {
        Some(v.to_owned())
    }

    #[test]
    fn test_name_falls_back_to_contact_person() {
        let id = resolve_identity(None, s("Acme"), s("Jane"), None);
        assert_eq!(id.name, "Jane");
        assert_eq!(id.company_name, "Acme");
    }

    #[test]
    fn test_name_falls_back_to_company() {
        let id = resolve_identity(None, s("Acme"), None, None);
        assert_eq!(id.name, "Acme");
    }

    #[test]
    fn test_company_falls_back_to_shop_name_and_feeds_name() {
        let id = resolve_identity(s("  "), None, None, Some("MojShop"));
        assert_eq!(id.company_name, "MojShop");
        assert_eq!(id.name, "MojShop");
    }

    #[test]
    fn test_explicit_name_wins() {
        let id = resolve_identity(s("Peter"), s("Acme"), s("Jane"), None);
        assert_eq!(id.name, "Peter");
        assert_eq!(id.contact_person.as_deref(), Some("Jane"));
    }

    #[test]
    fn test_default_shop_name_chain() {
        let email = Email::parse("jana@b.sk").unwrap();
        assert_eq!(default_shop_name(Some("Kvety"), "Acme", &email), "Kvety");
        assert_eq!(default_shop_name(Some(" "), "Acme", &email), "Acme");
        assert_eq!(default_shop_name(None, "", &email), "jana");
    }

    struct Fixture {
        store: Arc<MemoryStore>,
        passwords: PasswordVerifier,
        sessions: SessionManager,
    }

    impl Fixture {
        fn new() -> Self {
            let store = Arc::new(MemoryStore::new());
            Self {
                passwords: PasswordVerifier::insecure_fast().unwrap(),
                sessions: SessionManager::new(store.clone(), TimeDelta::days(30)),
                store,
            }
        }

        fn service(&self) -> RegistrationService<'_> {
            RegistrationService::new(self.store.as_ref(), &self.passwords, &self.sessions)
        }
    }

    #[tokio::test]
    async fn test_register_creates_pending_vendor_with_active_shop() {
        let fx = Fixture::new();
        let registered = fx
            .service()
            .register(RegistrationInput {
                email: "a@b.sk".into(),
                password: "secret123".into(),
                shop_name: s("MojShop"),
                ..RegistrationInput::default()
            })
            .await
            .unwrap();

        assert_eq!(registered.vendor.status, VendorStatus::Pending);
        assert_eq!(registered.shop.status, ShopStatus::Active);
        assert_eq!(registered.shop.shop_slug.as_str(), "mojshop");
        assert_eq!(registered.shop.shop_url.as_deref(), Some("https://mojshop.sk"));

        let shops = fx.store.list_by_vendor(registered.vendor.id).await.unwrap();
        assert_eq!(shops.len(), 1);
        assert_eq!(
            fx.sessions
                .validate(registered.session.token.expose())
                .await
                .unwrap(),
            Some(registered.vendor.id)
        );
    }

    #[tokio::test]
    async fn test_register_rejects_empty_fields() {
        let fx = Fixture::new();
        let missing_password = fx
            .service()
            .register(RegistrationInput {
                email: "a@b.sk".into(),
                ..RegistrationInput::default()
            })
            .await;
        assert!(matches!(missing_password, Err(AuthError::MissingField("password"))));

        let missing_email = fx
            .service()
            .register(RegistrationInput {
                email: "   ".into(),
                password: "x".into(),
                ..RegistrationInput::default()
            })
            .await;
        assert!(matches!(missing_email, Err(AuthError::MissingField("email"))));
        assert_eq!(fx.store.vendor_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_normalized_email_conflicts() {
        let fx = Fixture::new();
        let input = |email: &str| RegistrationInput {
            email: email.into(),
            password: "secret123".into(),
            ..RegistrationInput::default()
        };

        fx.service().register(input("user@example.com")).await.unwrap();
        let second = fx.service().register(input(" User@Example.com ")).await;

        assert!(matches!(second, Err(AuthError::EmailTaken)));
        assert_eq!(fx.store.vendor_count().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_duplicates_only_one_wins() {
        let fx = Fixture::new();
        let input = || RegistrationInput {
            email: "race@b.sk".into(),
            password: "secret123".into(),
            ..RegistrationInput::default()
        };

        let service = fx.service();
        let (a, b) = tokio::join!(service.register(input()), service.register(input()));

        assert_eq!(usize::from(a.is_ok()) + usize::from(b.is_ok()), 1);
        assert!(matches!(a.err().or(b.err()), Some(AuthError::EmailTaken)));
        assert_eq!(fx.store.vendor_count().unwrap(), 1);
    }
}
