//! Domain models for the vendor identity service.
//!
//! These types represent validated domain objects separate from database
//! row types. Row structs live next to the queries in [`crate::db`].

pub mod billing;
pub mod session;
pub mod shop;
pub mod vendor;

pub use billing::BillingDetails;
pub use session::{NewSession, Session, VendorContext};
pub use shop::{NewShop, PendingShop, Shop};
pub use vendor::{NewVendor, Vendor, VendorCredentials};
