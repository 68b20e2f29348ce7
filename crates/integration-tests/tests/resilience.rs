//! Store failures and health checks.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde_json::json;

use megashop_integration_tests::TestContext;
use megashop_vendor_api::db::RepositoryError;
use megashop_vendor_api::models::{NewSession, Session};
use megashop_vendor_api::store::{MemoryStore, SessionStore, StoreHealth, Stores};

/// A store that never answers in time.
struct TimedOutStore;

fn timed_out() -> RepositoryError {
    RepositoryError::Timeout(Duration::from_secs(5))
}

#[async_trait]
impl SessionStore for TimedOutStore {
    async fn insert(&self, _session: NewSession) -> Result<Session, RepositoryError> {
        Err(timed_out())
    }

    async fn find_by_token_hash(
        &self,
        _token_hash: &str,
    ) -> Result<Option<Session>, RepositoryError> {
        Err(timed_out())
    }

    async fn delete_by_token_hash(&self, _token_hash: &str) -> Result<bool, RepositoryError> {
        Err(timed_out())
    }

    async fn purge_expired(&self, _now: DateTime<Utc>) -> Result<u64, RepositoryError> {
        Err(timed_out())
    }
}

#[async_trait]
impl StoreHealth for TimedOutStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        Err(timed_out())
    }
}

fn context_with_timed_out_sessions() -> TestContext {
    let store = Arc::new(MemoryStore::new());
    let stores = Stores {
        sessions: Arc::new(TimedOutStore),
        health: Arc::new(TimedOutStore),
        ..Stores::from_memory(store.clone())
    };
    TestContext::with_stores(store, stores)
}

// ============================================================================
// Store failures
// ============================================================================

#[tokio::test]
async fn test_session_lookup_timeout_is_internal_error() {
    let ctx = context_with_timed_out_sessions();

    let resp = ctx.get("/api/v1/auth/me", Some("any-token")).await;

    assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp.body["success"], false);
    assert_eq!(resp.body["error"], "Internal server error");
}

#[tokio::test]
async fn test_registration_session_failure_hides_details() {
    let ctx = context_with_timed_out_sessions();

    let resp = ctx
        .post(
            "/api/v1/auth/register",
            None,
            json!({ "email": "late@shop.sk", "password": "correct horse battery" }),
        )
        .await;

    assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp.body["error"], "Internal server error");
    assert!(!resp.body.to_string().contains("timed out"));
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_liveness_is_ok() {
    let ctx = TestContext::new();

    let resp = ctx.get("/health", None).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, "ok");
}

#[tokio::test]
async fn test_readiness_follows_store() {
    let ctx = TestContext::new();
    assert_eq!(ctx.get("/health/ready", None).await.status, StatusCode::OK);

    let ctx = context_with_timed_out_sessions();
    assert_eq!(
        ctx.get("/health/ready", None).await.status,
        StatusCode::SERVICE_UNAVAILABLE
    );
}

#[tokio::test]
async fn test_unknown_route_uses_error_envelope() {
    let ctx = TestContext::new();

    let resp = ctx.get("/api/v1/nope", None).await;

    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.body["success"], false);
    assert_eq!(resp.body["error"], "Route not found");
}
