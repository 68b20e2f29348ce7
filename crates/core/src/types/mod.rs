//! Core types for Megashop.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod credit;
pub mod email;
pub mod id;
pub mod slug;
pub mod status;

pub use credit::{Credit, CreditError};
pub use email::{Email, EmailError};
pub use id::*;
pub use slug::{Slug, default_shop_url};
pub use status::*;
