//! Unified error handling with Sentry integration.
//!
//! Every handler returns `Result<T, AppError>`. Server-side failures are
//! captured to Sentry before responding; the client only ever sees the
//! `{"success": false, "error": "..."}` envelope with a fixed message.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::{AuthError, ModerationError, ShopError};

/// Message for every credential failure at login.
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Message for every rejected bearer or admin token.
pub const UNAUTHORIZED: &str = "Unauthorized";

/// Message for every server-side failure.
pub const INTERNAL: &str = "Internal server error";

/// Application-level error type for the vendor API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication or registration failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Shop operation failed.
    #[error("Shop error: {0}")]
    Shop(#[from] ShopError),

    /// Moderation operation failed.
    #[error("Moderation error: {0}")]
    Moderation(#[from] ModerationError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing, invalid or expired credential.
    #[error("Unauthorized")]
    Unauthorized,

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(err) => match err {
                AuthError::MissingField(_) | AuthError::InvalidEmail(_) | AuthError::EmailTaken => {
                    StatusCode::BAD_REQUEST
                }
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::SessionIssue(_) | AuthError::Repository(_) | AuthError::PasswordHash => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Shop(err) => match err {
                ShopError::MissingField(_) => StatusCode::BAD_REQUEST,
                ShopError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Moderation(err) => match err {
                ModerationError::InvalidAmount(_) => StatusCode::BAD_REQUEST,
                ModerationError::NotFound(_) => StatusCode::NOT_FOUND,
                ModerationError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::Auth(err) => match err {
                AuthError::MissingField(field) => format!("{field} is required"),
                AuthError::InvalidEmail(_) => "Invalid email address".to_string(),
                AuthError::EmailTaken => "Email already registered".to_string(),
                AuthError::InvalidCredentials => INVALID_CREDENTIALS.to_string(),
                _ => INTERNAL.to_string(),
            },
            Self::Shop(ShopError::MissingField(field)) => format!("{field} is required"),
            Self::Moderation(err) => match err {
                ModerationError::InvalidAmount(e) => format!("Invalid amount: {e}"),
                ModerationError::NotFound(what) => format!("{} not found", capitalize(what)),
                ModerationError::Repository(_) => INTERNAL.to_string(),
            },
            Self::NotFound(what) => format!("{what} not found"),
            Self::Unauthorized => UNAUTHORIZED.to_string(),
            Self::BadRequest(msg) => msg.clone(),
            Self::Database(_) | Self::Shop(ShopError::Repository(_)) => {
                INTERNAL.to_string()
            }
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = json!({
            "success": false,
            "error": self.client_message(),
        });

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection, "Rejected request body");
        Self::BadRequest("Invalid request body".to_string())
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context for an authenticated vendor.
pub fn set_sentry_user(vendor_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(vendor_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
