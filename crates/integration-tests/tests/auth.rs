//! Login, registration, logout and `/me` over the full router.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::{Method, StatusCode};
use serde_json::json;

use megashop_integration_tests::TestContext;

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn test_register_creates_vendor_and_active_default_shop() {
    let ctx = TestContext::new();

    let resp = ctx
        .post(
            "/api/v1/auth/register",
            None,
            json!({
                "email": "  Owner@MojShop.sk ",
                "password": "correct horse battery",
                "shop_name": "MojShop",
            }),
        )
        .await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["success"], true);
    assert_eq!(resp.body["message"], "Registration successful");

    let data = &resp.body["data"];
    assert!(!data["token"].as_str().unwrap().is_empty());
    assert_eq!(data["vendor"]["email"], "owner@mojshop.sk");
    assert_eq!(data["vendor"]["company_name"], "MojShop");
    assert_eq!(data["vendor"]["name"], "MojShop");
    assert_eq!(data["vendor"]["status"], "pending");
    assert_eq!(data["shop"]["shop_name"], "MojShop");
    assert_eq!(data["shop"]["shop_url"], "https://mojshop.sk");

    assert_eq!(ctx.store.vendor_count().unwrap(), 1);
}

#[tokio::test]
async fn test_register_requires_email_and_password() {
    let ctx = TestContext::new();

    let resp = ctx
        .post(
            "/api/v1/auth/register",
            None,
            json!({ "password": "correct horse battery" }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["success"], false);
    assert_eq!(resp.body["error"], "email is required");

    let resp = ctx
        .post(
            "/api/v1/auth/register",
            None,
            json!({ "email": "a@b.sk", "password": "" }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["error"], "password is required");

    assert_eq!(ctx.store.vendor_count().unwrap(), 0);
}

#[tokio::test]
async fn test_register_rejects_malformed_email() {
    let ctx = TestContext::new();

    let resp = ctx
        .post(
            "/api/v1/auth/register",
            None,
            json!({ "email": "not-an-email", "password": "secret" }),
        )
        .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["error"], "Invalid email address");
}

#[tokio::test]
async fn test_register_duplicate_email_after_normalization() {
    let ctx = TestContext::new();
    ctx.register("dup@shop.sk", "Dup").await;

    let resp = ctx
        .post(
            "/api/v1/auth/register",
            None,
            json!({ "email": "DUP@Shop.SK", "password": "other password" }),
        )
        .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["error"], "Email already registered");
    assert_eq!(ctx.store.vendor_count().unwrap(), 1);
}

#[tokio::test]
async fn test_malformed_json_body_uses_error_envelope() {
    let ctx = TestContext::new();

    let resp = ctx
        .send(
            Method::POST,
            "/api/v1/auth/login",
            None,
            None,
            Some(json!("not an object")),
        )
        .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["success"], false);
    assert_eq!(resp.body["error"], "Invalid request body");
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_login_returns_token_vendor_and_active_shop() {
    let ctx = TestContext::new();
    let registered = ctx.register("login@shop.sk", "Loginshop").await;

    let resp = ctx
        .post(
            "/api/v1/auth/login",
            None,
            json!({ "email": "LOGIN@shop.sk", "password": "correct horse battery" }),
        )
        .await;

    assert_eq!(resp.status, StatusCode::OK);
    let data = &resp.body["data"];
    assert!(!data["token"].as_str().unwrap().is_empty());
    assert_ne!(data["token"].as_str().unwrap(), registered.token);
    assert_eq!(data["vendor"]["id"], registered.vendor_id.to_string());
    assert_eq!(data["shop"]["id"], registered.shop_id.to_string());
    assert_eq!(data["shop"]["status"], "active");
    assert_eq!(data["shop"]["credit_balance"], "0.00");
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let ctx = TestContext::new();
    ctx.register("known@shop.sk", "Known").await;

    let unknown = ctx
        .post(
            "/api/v1/auth/login",
            None,
            json!({ "email": "nobody@shop.sk", "password": "correct horse battery" }),
        )
        .await;
    let wrong = ctx
        .post(
            "/api/v1/auth/login",
            None,
            json!({ "email": "known@shop.sk", "password": "wrong" }),
        )
        .await;
    let malformed = ctx
        .post(
            "/api/v1/auth/login",
            None,
            json!({ "email": "garbage", "password": "wrong" }),
        )
        .await;

    for resp in [&unknown, &wrong, &malformed] {
        assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    }
    assert_eq!(unknown.body, wrong.body);
    assert_eq!(wrong.body, malformed.body);
    assert_eq!(wrong.body["error"], "Invalid email or password");
}

#[tokio::test]
async fn test_login_with_blank_fields_is_generic_failure() {
    let ctx = TestContext::new();

    let resp = ctx.post("/api/v1/auth/login", None, json!({})).await;

    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.body["error"], "Invalid email or password");
}

#[tokio::test]
async fn test_pending_vendor_can_log_in() {
    let ctx = TestContext::new();
    ctx.register("pending@shop.sk", "Pendingshop").await;

    let resp = ctx
        .post(
            "/api/v1/auth/login",
            None,
            json!({ "email": "pending@shop.sk", "password": "correct horse battery" }),
        )
        .await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["data"]["vendor"]["status"], "pending");
}

// ============================================================================
// Sessions
// ============================================================================

#[tokio::test]
async fn test_me_returns_vendor_and_shops() {
    let ctx = TestContext::new();
    let registered = ctx.register("me@shop.sk", "Meshop").await;

    let resp = ctx.get("/api/v1/auth/me", Some(&registered.token)).await;

    assert_eq!(resp.status, StatusCode::OK);
    let data = &resp.body["data"];
    assert_eq!(data["vendor"]["email"], "me@shop.sk");
    assert_eq!(data["vendor"]["credit_balance"], "0.00");
    assert_eq!(data["shops"].as_array().unwrap().len(), 1);
    assert_eq!(data["shop"]["id"], registered.shop_id.to_string());
}

#[tokio::test]
async fn test_me_without_valid_bearer_is_unauthorized() {
    let ctx = TestContext::new();
    ctx.register("anon@shop.sk", "Anon").await;

    let missing = ctx.get("/api/v1/auth/me", None).await;
    let unknown = ctx.get("/api/v1/auth/me", Some("not-a-real-token")).await;

    for resp in [&missing, &unknown] {
        assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
        assert_eq!(resp.body["success"], false);
        assert_eq!(resp.body["error"], "Unauthorized");
    }
}

#[tokio::test]
async fn test_logout_revokes_session() {
    let ctx = TestContext::new();
    let registered = ctx.register("bye@shop.sk", "Bye").await;
    let sessions_before = ctx.store.session_count().unwrap();

    let resp = ctx
        .post("/api/v1/auth/logout", Some(&registered.token), json!({}))
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["data"]["logged_out"], true);
    assert_eq!(ctx.store.session_count().unwrap(), sessions_before - 1);

    let resp = ctx.get("/api/v1/auth/me", Some(&registered.token)).await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);

    // A second logout with the same token is still acknowledged.
    let resp = ctx
        .post("/api/v1/auth/logout", Some(&registered.token), json!({}))
        .await;
    assert_eq!(resp.status, StatusCode::OK);
}

#[tokio::test]
async fn test_logout_without_token_is_acknowledged() {
    let ctx = TestContext::new();

    let resp = ctx.post("/api/v1/auth/logout", None, json!({})).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["message"], "Logged out");
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let ctx = TestContext::new();

    let resp = ctx.get("/health", None).await;

    assert!(resp.headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn test_register_then_me_shows_default_shop_as_active() {
    let ctx = TestContext::new();

    let resp = ctx
        .post(
            "/api/v1/auth/register",
            None,
            json!({ "email": "a@b.sk", "password": "secret123", "shop_name": "MojShop" }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    let token = resp.body["data"]["token"].as_str().unwrap().to_owned();
    let shop_id = resp.body["data"]["shop"]["id"].clone();

    let resp = ctx.get("/api/v1/auth/me", Some(&token)).await;

    let data = &resp.body["data"];
    assert_eq!(data["vendor"]["status"], "pending");
    assert_eq!(data["shops"].as_array().unwrap().len(), 1);
    assert_eq!(data["shop"]["id"], shop_id);
    assert_eq!(data["shop"]["shop_name"], "MojShop");
    assert_eq!(data["shop"]["shop_slug"], "mojshop");
    assert_eq!(data["shop"]["status"], "active");
}
