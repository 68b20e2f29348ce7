//! Megashop vendor identity service library.
//!
//! Authenticates vendor accounts, issues and validates bearer sessions,
//! resolves which of a vendor's shops a request acts against, and moderates
//! the shop lifecycle. Exposed as a library so the router can be driven
//! in-process by the integration tests and the CLI.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
