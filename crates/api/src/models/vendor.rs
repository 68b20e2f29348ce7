//! Vendor domain types.

use chrono::{DateTime, Utc};
use megashop_core::{Credit, Email, VendorId, VendorStatus};

use super::billing::BillingDetails;

/// A registered marketplace seller account.
#[derive(Debug, Clone)]
pub struct Vendor {
    pub id: VendorId,
    /// Normalized email, unique across vendors.
    pub email: Email,
    pub name: String,
    pub company_name: String,
    pub contact_person: Option<String>,
    /// Vendor-level lifecycle, independent of any shop's status.
    pub status: VendorStatus,
    /// Shared wallet usable across all owned shops.
    pub credit_balance: Credit,
    /// The vendor's own billing profile, copied into new shops on request.
    pub billing: BillingDetails,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vendor {
    /// The billing profile used when a shop asks to copy vendor details.
    ///
    /// Company, contact person and email default to the account fields when
    /// the stored profile leaves them blank.
    #[must_use]
    pub fn billing_profile(&self) -> BillingDetails {
        self.billing.clone().fill_missing_from(&BillingDetails {
            company: Some(self.company_name.clone()),
            contact_person: self.contact_person.clone(),
            email: Some(self.email.to_string()),
            ..BillingDetails::default()
        })
    }
}

/// A vendor together with the stored password hash, used only for login.
#[derive(Clone)]
pub struct VendorCredentials {
    pub vendor: Vendor,
    pub password_hash: String,
}

/// Input for inserting a vendor row.
#[derive(Clone)]
pub struct NewVendor {
    pub id: VendorId,
    pub email: Email,
    pub password_hash: String,
    pub name: String,
    pub company_name: String,
    pub contact_person: Option<String>,
}
