//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication and registration.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A required input field was empty.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Invalid email format (registration only; login reports `InvalidCredentials`).
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] megashop_core::EmailError),

    /// Wrong password or unknown email.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Vendor with this email already exists.
    #[error("email already registered")]
    EmailTaken,

    /// Authentication succeeded but no session could be stored.
    #[error("session could not be issued: {0}")]
    SessionIssue(#[source] RepositoryError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
