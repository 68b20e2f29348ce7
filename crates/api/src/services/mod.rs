//! Business logic services for the vendor identity service.
//!
//! # Services
//!
//! - `auth` - Password verification, session issuance/validation, login
//! - `registration` - Vendor sign-up with an implicit default shop
//! - `shops` - Active-shop resolution and multi-shop creation
//! - `moderation` - Administrator lifecycle transitions and credit top-ups
//!
//! Services borrow the store handles they need; none of them reach shared
//! global state.

pub mod auth;
pub mod moderation;
pub mod registration;
pub mod shops;

pub use auth::{AuthError, AuthService, PasswordVerifier, SessionManager, SessionToken};
pub use moderation::{ModerationError, ModerationService};
pub use registration::{Registered, RegistrationInput, RegistrationService};
pub use shops::{CreateShopInput, ShopError, ShopResolver, select_active};
