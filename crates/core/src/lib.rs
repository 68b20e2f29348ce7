//! Megashop Core - Shared types library.
//!
//! This crate provides common types used across all Megashop components:
//! - `api` - Vendor identity service (login, sessions, shop moderation)
//! - `cli` - Command-line tools for migrations and shop moderation
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, credits, emails, slugs, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
