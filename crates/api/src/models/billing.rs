//! Billing snapshot attached to every shop.

use serde::{Deserialize, Serialize};

/// Country assumed when a shop is created without a billing country.
pub const DEFAULT_BILLING_COUNTRY: &str = "SK";

/// Company, registry and contact details captured when a shop is created.
///
/// All fields are optional. A field holding only whitespace is treated the
/// same as a missing one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingDetails {
    pub company: Option<String>,
    /// Company registration number (IČO).
    pub ico: Option<String>,
    /// Tax identification number (DIČ).
    pub dic: Option<String>,
    /// VAT identification number (IČ DPH).
    pub ic_dph: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl BillingDetails {
    /// Trim every field and drop the ones left empty.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            company: clean(self.company),
            ico: clean(self.ico),
            dic: clean(self.dic),
            ic_dph: clean(self.ic_dph),
            address: clean(self.address),
            city: clean(self.city),
            zip: clean(self.zip),
            country: clean(self.country),
            contact_person: clean(self.contact_person),
            phone: clean(self.phone),
            email: clean(self.email),
        }
    }

    /// Fill each blank field from `profile`, leaving supplied values untouched.
    #[must_use]
    pub fn fill_missing_from(self, profile: &Self) -> Self {
        let this = self.normalized();
        let profile = profile.clone().normalized();
        Self {
            company: this.company.or(profile.company),
            ico: this.ico.or(profile.ico),
            dic: this.dic.or(profile.dic),
            ic_dph: this.ic_dph.or(profile.ic_dph),
            address: this.address.or(profile.address),
            city: this.city.or(profile.city),
            zip: this.zip.or(profile.zip),
            country: this.country.or(profile.country),
            contact_person: this.contact_person.or(profile.contact_person),
            phone: this.phone.or(profile.phone),
            email: this.email.or(profile.email),
        }
    }

    /// Apply the default billing country when none was given.
    #[must_use]
    pub fn with_default_country(mut self) -> Self {
        if self.country.is_none() {
            self.country = Some(DEFAULT_BILLING_COUNTRY.to_owned());
        }
        self
    }
}

/// Trim an optional string, mapping blank input to `None`.
#[must_use]
pub fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}
