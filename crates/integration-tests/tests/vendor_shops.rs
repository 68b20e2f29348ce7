//! Shop resolution and multi-shop creation behind the bearer middleware.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::StatusCode;
use serde_json::json;

use megashop_integration_tests::TestContext;

// ============================================================================
// Resolution
// ============================================================================

#[tokio::test]
async fn test_current_shop_is_default_shop() {
    let ctx = TestContext::new();
    let vendor = ctx.register("ctx@shop.sk", "Ctxshop").await;

    let resp = ctx.get("/api/v1/vendor/shop", Some(&vendor.token)).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["data"]["id"], vendor.shop_id.to_string());
    assert_eq!(resp.body["data"]["shop_slug"], "ctxshop");
    assert_eq!(resp.body["data"]["status"], "active");
    assert_eq!(resp.body["data"]["display_mode"], "free");
}

#[tokio::test]
async fn test_vendor_routes_require_bearer() {
    let ctx = TestContext::new();

    for uri in ["/api/v1/vendor/shop", "/api/v1/vendor/my-shops"] {
        let resp = ctx.get(uri, None).await;
        assert_eq!(resp.status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(resp.body["error"], "Unauthorized");
    }

    let resp = ctx
        .create_shop("forged-token", json!({ "shop_name": "Nope" }))
        .await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_my_shops_lists_oldest_first_with_active_shop() {
    let ctx = TestContext::new();
    let vendor = ctx.register("many@shop.sk", "Firstshop").await;
    ctx.create_shop(&vendor.token, json!({ "shop_name": "Second Shop" }))
        .await;

    let resp = ctx.get("/api/v1/vendor/my-shops", Some(&vendor.token)).await;

    assert_eq!(resp.status, StatusCode::OK);
    let shops = resp.body["data"]["shops"].as_array().unwrap();
    assert_eq!(shops.len(), 2);
    assert_eq!(shops[0]["id"], vendor.shop_id.to_string());
    assert_eq!(shops[1]["shop_slug"], "second-shop");
    assert_eq!(resp.body["data"]["active_shop"]["id"], vendor.shop_id.to_string());
}

#[tokio::test]
async fn test_context_shop_and_active_shop_can_differ() {
    let ctx = TestContext::new();
    let vendor = ctx.register("split@shop.sk", "Oldest").await;
    let resp = ctx
        .create_shop(&vendor.token, json!({ "shop_name": "Newer" }))
        .await;
    let newer_id = resp.body["data"]["id"].as_str().unwrap().to_owned();

    let resp = ctx
        .admin_post(&format!("/api/v1/admin/shops/{newer_id}/approve"), None)
        .await;
    assert_eq!(resp.body["data"]["changed"], true);
    let resp = ctx
        .admin_post(
            &format!("/api/v1/admin/shops/{}/reject", vendor.shop_id),
            None,
        )
        .await;
    assert_eq!(resp.body["data"]["changed"], true);

    // Request context: oldest owned shop, whatever its status
    let resp = ctx.get("/api/v1/vendor/shop", Some(&vendor.token)).await;
    assert_eq!(resp.body["data"]["id"], vendor.shop_id.to_string());
    assert_eq!(resp.body["data"]["shop_name"], "Oldest");
    assert_eq!(resp.body["data"]["status"], "rejected");

    // Active shop: oldest shop that is active
    let resp = ctx.get("/api/v1/auth/me", Some(&vendor.token)).await;
    assert_eq!(resp.body["data"]["shop"]["id"], newer_id);
    assert_eq!(resp.body["data"]["shop"]["shop_name"], "Newer");

    let resp = ctx.get("/api/v1/vendor/my-shops", Some(&vendor.token)).await;
    assert_eq!(resp.body["data"]["active_shop"]["id"], newer_id);
    assert_eq!(resp.body["data"]["shops"][0]["id"], vendor.shop_id.to_string());

    let resp = ctx
        .post(
            "/api/v1/auth/login",
            None,
            json!({ "email": "split@shop.sk", "password": "correct horse battery" }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["data"]["shop"]["id"], newer_id);
    assert_eq!(resp.body["data"]["shop"]["shop_name"], "Newer");

    // A rejected shop cannot be approved back
    let resp = ctx
        .admin_post(
            &format!("/api/v1/admin/shops/{}/approve", vendor.shop_id),
            None,
        )
        .await;
    assert_eq!(resp.body["data"]["changed"], false);
    let resp = ctx.get("/api/v1/vendor/shop", Some(&vendor.token)).await;
    assert_eq!(resp.body["data"]["status"], "rejected");
}

// ============================================================================
// Multi-shop creation
// ============================================================================

#[tokio::test]
async fn test_created_shop_is_pending_with_zero_credit() {
    let ctx = TestContext::new();
    let vendor = ctx.register("extra@shop.sk", "Extra").await;

    let resp = ctx
        .create_shop(
            &vendor.token,
            json!({ "shop_name": "  Outlet Store ", "shop_url": "https://outlet.example" }),
        )
        .await;

    assert_eq!(resp.status, StatusCode::CREATED);
    assert_eq!(
        resp.body["message"],
        "Shop created and is waiting for administrator approval"
    );
    let shop = &resp.body["data"];
    assert_eq!(shop["shop_name"], "Outlet Store");
    assert_eq!(shop["shop_slug"], "outlet-store");
    assert_eq!(shop["shop_url"], "https://outlet.example");
    assert_eq!(shop["status"], "pending");
    assert_eq!(shop["display_mode"], "free");
    assert_eq!(shop["credit_balance"], "0.00");
    assert_eq!(shop["billing"]["country"], "SK");
    assert!(shop["approved_at"].is_null());
}

#[tokio::test]
async fn test_create_shop_requires_name() {
    let ctx = TestContext::new();
    let vendor = ctx.register("noname@shop.sk", "Noname").await;

    let resp = ctx
        .create_shop(&vendor.token, json!({ "shop_name": "   " }))
        .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["error"], "shop_name is required");

    let resp = ctx.get("/api/v1/vendor/my-shops", Some(&vendor.token)).await;
    assert_eq!(resp.body["data"]["shops"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_copy_from_vendor_fills_only_blank_fields() {
    let ctx = TestContext::new();
    let resp = ctx
        .post(
            "/api/v1/auth/register",
            None,
            json!({
                "email": "billing@acme.sk",
                "password": "correct horse battery",
                "company_name": "Acme s.r.o.",
                "contact_person": "Jana Nova",
            }),
        )
        .await;
    let token = resp.body["data"]["token"].as_str().unwrap().to_owned();

    let resp = ctx
        .create_shop(
            &token,
            json!({
                "shop_name": "Acme Outlet",
                "billing_company": "Acme Outlet s.r.o.",
                "billing_city": "Kosice",
                "billing_email": "  ",
                "copy_from_vendor": true,
            }),
        )
        .await;

    assert_eq!(resp.status, StatusCode::CREATED);
    let billing = &resp.body["data"]["billing"];
    assert_eq!(billing["company"], "Acme Outlet s.r.o.");
    assert_eq!(billing["city"], "Kosice");
    assert_eq!(billing["contact_person"], "Jana Nova");
    assert_eq!(billing["email"], "billing@acme.sk");
    assert_eq!(billing["country"], "SK");
}

#[tokio::test]
async fn test_without_copy_billing_stays_blank() {
    let ctx = TestContext::new();
    let vendor = ctx.register("plain@shop.sk", "Plain").await;

    let resp = ctx
        .create_shop(&vendor.token, json!({ "shop_name": "Plain Two" }))
        .await;

    let billing = &resp.body["data"]["billing"];
    assert!(billing["company"].is_null());
    assert!(billing["email"].is_null());
    assert_eq!(billing["country"], "SK");
}

#[tokio::test]
async fn test_active_shop_survives_new_pending_shop() {
    let ctx = TestContext::new();
    let vendor = ctx.register("keep@shop.sk", "Keep").await;
    ctx.create_shop(&vendor.token, json!({ "shop_name": "Later" }))
        .await;

    let resp = ctx.get("/api/v1/auth/me", Some(&vendor.token)).await;

    assert_eq!(resp.body["data"]["shop"]["id"], vendor.shop_id.to_string());
    assert_eq!(resp.body["data"]["shops"].as_array().unwrap().len(), 2);
}
