//! Integration tests for the Megashop vendor API.
//!
//! The full axum router is driven in-process with `tower::ServiceExt::oneshot`
//! over the in-memory store, so no database or running server is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p megashop-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `auth` - Login, registration, logout, `/me`
//! - `vendor_shops` - Shop resolution and multi-shop creation
//! - `admin` - Moderation, credit top-ups, admin authentication
//! - `resilience` - Store failures and health checks

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use chrono::TimeDelta;
use secrecy::SecretString;
use serde_json::{Value, json};
use tower::ServiceExt;

use megashop_core::{ShopId, VendorId};
use megashop_vendor_api::routes;
use megashop_vendor_api::services::PasswordVerifier;
use megashop_vendor_api::state::AppState;
use megashop_vendor_api::store::{MemoryStore, Stores};

/// Admin credential configured for every test context.
pub const ADMIN_TOKEN: &str = "k9Qz-Lm3v-Rt7x-Wp2e-Hb6n-Ys4c-Jd8f-Ua1g";

/// A response decoded for assertions.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    /// Parsed JSON body, or the raw text as a JSON string.
    pub body: Value,
}

/// A registered vendor and its default shop.
#[derive(Debug, Clone)]
pub struct RegisteredVendor {
    pub token: String,
    pub vendor_id: VendorId,
    pub shop_id: ShopId,
}

/// The router under test plus direct access to its store.
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub state: AppState,
    router: Router,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    /// Context over a fresh in-memory store.
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::build(store.clone(), Stores::from_memory(store))
    }

    /// Context over custom store handles; `store` still backs any handle
    /// the caller did not replace.
    #[must_use]
    pub fn with_stores(store: Arc<MemoryStore>, stores: Stores) -> Self {
        Self::build(store, stores)
    }

    fn build(store: Arc<MemoryStore>, stores: Stores) -> Self {
        let state = AppState::from_parts(
            stores,
            PasswordVerifier::insecure_fast().unwrap(),
            TimeDelta::days(30),
            &SecretString::from(ADMIN_TOKEN),
        );
        let router = routes::app(state.clone());
        Self {
            store,
            state,
            router,
        }
    }

    /// Send a request with optional bearer token, admin token and JSON body.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        bearer: Option<&str>,
        admin: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(token) = admin {
            builder = builder.header("x-admin-token", token);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, bearer: Option<&str>) -> TestResponse {
        self.send(Method::GET, uri, bearer, None, None).await
    }

    pub async fn post(&self, uri: &str, bearer: Option<&str>, body: Value) -> TestResponse {
        self.send(Method::POST, uri, bearer, None, Some(body)).await
    }

    pub async fn admin_get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None, Some(ADMIN_TOKEN), None)
            .await
    }

    pub async fn admin_post(&self, uri: &str, body: Option<Value>) -> TestResponse {
        self.send(Method::POST, uri, None, Some(ADMIN_TOKEN), body)
            .await
    }

    /// Register a vendor through the API and return its identifiers.
    pub async fn register(&self, email: &str, shop_name: &str) -> RegisteredVendor {
        let resp = self
            .post(
                "/api/v1/auth/register",
                None,
                json!({
                    "email": email,
                    "password": "correct horse battery",
                    "shop_name": shop_name,
                }),
            )
            .await;
        assert_eq!(resp.status, StatusCode::OK, "register failed: {:?}", resp.body);

        let data = &resp.body["data"];
        RegisteredVendor {
            token: data["token"].as_str().unwrap().to_owned(),
            vendor_id: data["vendor"]["id"].as_str().unwrap().parse().unwrap(),
            shop_id: data["shop"]["id"].as_str().unwrap().parse().unwrap(),
        }
    }

    /// Create an additional (pending) shop for a vendor through the API.
    pub async fn create_shop(&self, token: &str, body: Value) -> TestResponse {
        self.post("/api/v1/vendor/shops", Some(token), body).await
    }
}
