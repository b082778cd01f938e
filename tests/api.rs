//! Integration tests for the REST API, driven in-process against the
//! in-memory store.
//!
//! Tests cover:
//! - POST/GET/PUT/DELETE /api/v1/jewelry
//! - POST /api/v1/analytics
//! - GET /api/v1/analytics/{item_id}
//! - GET /api/v1/analytics
//! - GET / and GET /health
//! - Error envelope for 400, 404, 409 and 422

#![allow(clippy::panic)]

mod common;

use axum::http::{Method, StatusCode};
use serde_json::{Value, json};

use common::*;
use jewelry_tryon_api::persistence::{DocumentPatch, Store};

fn ring(name: &str) -> Value {
    json!({
        "name": name,
        "type": "ring",
        "description": "Hand-finished gold band",
        "price": { "amount": 12500.0, "discount": 5.0 },
        "ar_config": { "color": "#C0C0C0", "size": 40 }
    })
}

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
async fn test_create_returns_201_with_short_code() {
    let server = setup_test_server();

    let (status, body) = post_json(&server.router, "/api/v1/jewelry", &ring("Band")).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"].as_bool(), Some(true));
    let item = &body["item"];
    let Some(item_id) = item["item_id"].as_str() else {
        panic!("missing item_id: {body}");
    };
    assert_eq!(item_id.len(), 8);
    assert_eq!(item["share_link"]["short_code"].as_str(), Some(item_id));
    assert_eq!(
        item["share_link"]["full_url"].as_str(),
        Some(format!("https://shop.test/try-on/{item_id}").as_str())
    );
    assert_eq!(item["status"].as_str(), Some("active"));
    assert_eq!(item["type"].as_str(), Some("ring"));
    assert_eq!(item["price"]["currency"].as_str(), Some("NPR"));
    assert_eq!(item["seo"]["meta_title"].as_str(), Some("Band - Virtual Try-On"));
    assert_eq!(item["analytics"]["views"].as_u64(), Some(0));
}

#[tokio::test]
async fn test_create_without_ar_config_uses_defaults() {
    let server = setup_test_server();
    let body = json!({
        "name": "Plain Studs",
        "type": "earrings",
        "price": { "amount": 800.0 }
    });

    let item_id = create_item(&server.router, &body).await;
    let (status, body) = get_request(&server.router, &format!("/api/v1/jewelry/{item_id}")).await;

    assert_eq!(status, StatusCode::OK);
    let ar = &body["item"]["ar_config"];
    assert_eq!(ar["color"].as_str(), Some("#FFD700"));
    assert_eq!(ar["size"].as_i64(), Some(30));
    assert_eq!(ar["position_offset"], json!({ "x": 0, "y": 0 }));
    assert_eq!(ar["landmarks"], json!([234, 454]));
    assert_eq!(ar["render_type"].as_str(), Some("circle"));
    assert_eq!(body["item"]["stock"]["available"].as_bool(), Some(true));
    assert_eq!(body["item"]["stock"]["low_stock_threshold"].as_i64(), Some(3));
}

#[tokio::test]
async fn test_get_counts_views() {
    let server = setup_test_server();
    let item_id = create_item(&server.router, &ring("Band")).await;
    let uri = format!("/api/v1/jewelry/{item_id}");

    for _ in 0..3 {
        let (status, _) = get_request(&server.router, &uri).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, body) = get_request(&server.router, &format!("/api/v1/analytics/{item_id}")).await;
    assert_eq!(body["stats"]["views"].as_u64(), Some(3));
}

#[tokio::test]
async fn test_get_missing_item_returns_404_envelope() {
    let server = setup_test_server();

    let (status, body) = get_request(&server.router, "/api/v1/jewelry/nope1234").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"].as_bool(), Some(false));
    assert!(body["error"].as_str().is_some_and(|e| e.contains("nope1234")));
}

#[tokio::test]
async fn test_list_paginates_forty_five_items() {
    let server = setup_test_server();
    for i in 0..45 {
        create_item(&server.router, &ring(&format!("Ring {i}"))).await;
    }

    let (status, body) = get_request(&server.router, "/api/v1/jewelry?page=1&page_size=20").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"].as_u64(), Some(20));
    assert_eq!(body["total_count"].as_u64(), Some(45));
    assert_eq!(body["total_pages"].as_u64(), Some(3));
    assert_eq!(body["page"].as_u64(), Some(1));
    assert_eq!(body["page_size"].as_u64(), Some(20));

    let (_, last) = get_request(&server.router, "/api/v1/jewelry?page=3&page_size=20").await;
    assert_eq!(last["count"].as_u64(), Some(5));
}

#[tokio::test]
async fn test_list_clamps_page_size() {
    let server = setup_test_server();
    create_item(&server.router, &ring("Band")).await;

    let (status, body) = get_request(&server.router, "/api/v1/jewelry?page=0&page_size=1000").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"].as_u64(), Some(1));
    assert_eq!(body["page_size"].as_u64(), Some(100));
}

#[tokio::test]
async fn test_list_filters_by_type() {
    let server = setup_test_server();
    create_item(&server.router, &ring("Band")).await;
    create_item(
        &server.router,
        &json!({ "name": "Chain", "type": "necklace", "price": { "amount": 1.0 } }),
    )
    .await;

    let (status, body) = get_request(&server.router, "/api/v1/jewelry?type=necklace").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_count"].as_u64(), Some(1));
    assert_eq!(body["items"][0]["name"].as_str(), Some("Chain"));
}

#[tokio::test]
async fn test_list_rejects_unknown_type() {
    let server = setup_test_server();

    let (status, body) = get_request(&server.router, "/api/v1/jewelry?type=tiara").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"].as_bool(), Some(false));
}

#[tokio::test]
async fn test_list_rejects_non_numeric_page() {
    let server = setup_test_server();

    let (status, body) = get_request(&server.router, "/api/v1/jewelry?page=first").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"].as_bool(), Some(false));
}

#[tokio::test]
async fn test_update_changes_only_supplied_fields() {
    let server = setup_test_server();
    let (_, created) = post_json(&server.router, "/api/v1/jewelry", &ring("Band")).await;
    let before = &created["item"];
    let Some(item_id) = before["item_id"].as_str() else {
        panic!("missing item_id: {created}");
    };

    let (status, body) = put_json(
        &server.router,
        &format!("/api/v1/jewelry/{item_id}"),
        &json!({ "name": "New Name" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let after = &body["item"];
    assert_eq!(after["name"].as_str(), Some("New Name"));
    assert_eq!(after["price"], before["price"]);
    assert_eq!(after["ar_config"], before["ar_config"]);
    assert_eq!(after["status"], before["status"]);
    assert_eq!(after["description"], before["description"]);
    assert_eq!(after["created_at"], before["created_at"]);

    let parse = |v: &Value| v.as_str().and_then(|s| s.parse::<chrono::DateTime<chrono::Utc>>().ok());
    let (Some(old), Some(new)) = (parse(&before["updated_at"]), parse(&after["updated_at"])) else {
        panic!("timestamps must parse");
    };
    assert!(new > old);
}

#[tokio::test]
async fn test_update_missing_item_returns_404() {
    let server = setup_test_server();

    let (status, _) = put_json(
        &server.router,
        "/api/v1/jewelry/nope1234",
        &json!({ "name": "x" }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_backwards_status_returns_409() {
    let server = setup_test_server();
    let item_id = create_item(&server.router, &ring("Band")).await;

    let (status, body) = put_json(
        &server.router,
        &format!("/api/v1/jewelry/{item_id}"),
        &json!({ "status": "draft" }),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"].as_bool(), Some(false));
}

#[tokio::test]
async fn test_delete_archives_item() {
    let server = setup_test_server();
    let item_id = create_item(&server.router, &ring("Band")).await;

    let (status, body) = delete_request(&server.router, &format!("/api/v1/jewelry/{item_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"].as_bool(), Some(true));
    assert_eq!(
        body["message"].as_str(),
        Some("Jewelry item deleted successfully")
    );

    let (_, active) = get_request(&server.router, "/api/v1/jewelry").await;
    assert_eq!(active["total_count"].as_u64(), Some(0));

    let (_, everything) = get_request(&server.router, "/api/v1/jewelry?status=").await;
    assert_eq!(everything["total_count"].as_u64(), Some(1));
    assert_eq!(everything["items"][0]["status"].as_str(), Some("archived"));

    let (_, archived) = get_request(&server.router, "/api/v1/jewelry?status=archived").await;
    assert_eq!(archived["total_count"].as_u64(), Some(1));
}

#[tokio::test]
async fn test_delete_missing_item_returns_404() {
    let server = setup_test_server();

    let (status, _) = delete_request(&server.router, "/api/v1/jewelry/nope1234").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Validation and malformed input
// ============================================================================

#[tokio::test]
async fn test_create_with_invalid_fields_returns_422() {
    let server = setup_test_server();
    let body = json!({
        "name": "",
        "type": "ring",
        "price": { "amount": -1.0 }
    });

    let (status, json) = post_json(&server.router, "/api/v1/jewelry", &body).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["success"].as_bool(), Some(false));
    assert!(json["details"]["name"].is_array(), "details: {json}");
    assert_eq!(server.store.item_count().await, 0);
}

#[tokio::test]
async fn test_create_with_out_of_range_ar_size_returns_422() {
    let server = setup_test_server();
    let body = json!({
        "name": "Huge",
        "type": "ring",
        "price": { "amount": 1.0 },
        "ar_config": { "size": 500 }
    });

    let (status, _) = post_json(&server.router, "/api/v1/jewelry", &body).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_malformed_json_returns_400_envelope() {
    let server = setup_test_server();

    let (status, body) = send_raw(
        &server.router,
        Method::POST,
        "/api/v1/jewelry",
        Some("{ not json".to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"].as_bool(), Some(false));
    assert!(body["code"].is_number());
}

#[tokio::test]
async fn test_unknown_jewelry_type_returns_400() {
    let server = setup_test_server();
    let body = json!({ "name": "Crown", "type": "tiara", "price": { "amount": 1.0 } });

    let (status, _) = post_json(&server.router, "/api/v1/jewelry", &body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ============================================================================
// Analytics
// ============================================================================

#[tokio::test]
async fn test_track_share_increments_shares() {
    let server = setup_test_server();
    let item_id = create_item(&server.router, &ring("Band")).await;
    for _ in 0..3 {
        let (status, body) = post_json(
            &server.router,
            "/api/v1/analytics",
            &json!({ "jewelry_id": item_id, "event_type": "share", "session_id": "s-1" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["event_id"].as_str().map(str::len), Some(16));
    }

    let (status, body) =
        get_request(&server.router, &format!("/api/v1/analytics/{item_id}")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["item_name"].as_str(), Some("Band"));
    assert_eq!(body["stats"]["shares"].as_u64(), Some(3));
    assert_eq!(body["recent_events"].as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn test_track_try_on_increments_try_ons() {
    let server = setup_test_server();
    let item_id = create_item(&server.router, &ring("Band")).await;

    let (status, _) = post_json(
        &server.router,
        "/api/v1/analytics",
        &json!({
            "jewelry_id": item_id,
            "event_type": "try_on",
            "user_data": { "device": "mobile", "location": { "country": "NP" } },
            "source": { "platform": "tiktok" },
            "duration_seconds": 12,
            "interactions": { "camera_started": true, "photo_captured": true }
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = get_request(&server.router, &format!("/api/v1/analytics/{item_id}")).await;
    assert_eq!(body["stats"]["try_ons"].as_u64(), Some(1));
    let event = &body["recent_events"][0];
    assert_eq!(event["interactions"]["photo_captured"].as_bool(), Some(true));
    assert_eq!(event["interactions"]["face_detected"].as_bool(), Some(false));
    assert_eq!(event["source"]["platform"].as_str(), Some("tiktok"));
    assert_eq!(event["duration_seconds"].as_i64(), Some(12));
}

#[tokio::test]
async fn test_track_for_unknown_item_still_succeeds() {
    let server = setup_test_server();

    let (status, body) = post_json(
        &server.router,
        "/api/v1/analytics",
        &json!({ "jewelry_id": "ghost123", "event_type": "view" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"].as_bool(), Some(true));
    assert_eq!(server.store.event_count().await, 1);
    assert_eq!(server.store.item_count().await, 0);
}

#[tokio::test]
async fn test_track_unknown_event_type_returns_400() {
    let server = setup_test_server();

    let (status, _) = post_json(
        &server.router,
        "/api/v1/analytics",
        &json!({ "jewelry_id": "ghost123", "event_type": "wishlist" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(server.store.event_count().await, 0);
}

#[tokio::test]
async fn test_item_analytics_missing_item_returns_404() {
    let server = setup_test_server();

    let (status, _) = get_request(&server.router, "/api/v1/analytics/ghost123").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_overall_conversion_rate() {
    let server = setup_test_server();
    let busy = create_item(&server.router, &ring("Busy")).await;
    let quiet = create_item(&server.router, &ring("Quiet")).await;

    let mut patch = DocumentPatch::new();
    patch.insert(
        "analytics".to_string(),
        json!({ "try_ons": 10, "conversions": 2 }),
    );
    assert!(matches!(server.store.update_item(&busy, &patch).await, Ok(true)));

    let (status, body) = get_request(&server.router, "/api/v1/analytics").await;

    assert_eq!(status, StatusCode::OK);
    let summary = &body["summary"];
    assert_eq!(summary["total_items"].as_u64(), Some(2));
    assert_eq!(summary["total_try_ons"].as_u64(), Some(10));
    assert_eq!(summary["total_conversions"].as_u64(), Some(2));
    assert_eq!(summary["conversion_rate"].as_f64(), Some(20.0));
    assert_eq!(body["top_items"][0]["item_id"].as_str(), Some(busy.as_str()));
    assert_eq!(body["top_items"][1]["item_id"].as_str(), Some(quiet.as_str()));
}

#[tokio::test]
async fn test_overall_on_empty_catalog() {
    let server = setup_test_server();

    let (status, body) = get_request(&server.router, "/api/v1/analytics").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"]["total_items"].as_u64(), Some(0));
    assert_eq!(body["summary"]["conversion_rate"].as_f64(), Some(0.0));
    assert_eq!(body["top_items"], json!([]));
}

// ============================================================================
// System
// ============================================================================

#[tokio::test]
async fn test_health_reports_environment() {
    let server = setup_test_server();

    let (status, body) = get_request(&server.router, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"].as_str(), Some("healthy"));
    assert_eq!(body["environment"].as_str(), Some("test"));
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_root_lists_endpoints() {
    let server = setup_test_server();

    let (status, body) = get_request(&server.router, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"].as_str(), Some("Jewelry AR Try-On API"));
    assert_eq!(body["docs"].as_str(), Some("/docs"));
    assert_eq!(body["endpoints"]["jewelry"].as_str(), Some("/api/v1/jewelry"));
}

#[tokio::test]
async fn test_root_analytics_link_resolves() {
    let server = setup_test_server();
    let item_id = create_item(&server.router, &ring("Band")).await;

    let (_, root) = get_request(&server.router, "/").await;
    let Some(analytics) = root["endpoints"]["analytics"].as_str() else {
        panic!("root has no analytics link: {root}");
    };
    assert_eq!(analytics, "/api/v1/analytics");

    let (status, body) = post_json(
        &server.router,
        analytics,
        &json!({ "jewelry_id": item_id, "event_type": "share" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"].as_str(), Some("Event tracked successfully"));

    let (status, body) = get_request(&server.router, &format!("{analytics}/{item_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stats"]["shares"].as_u64(), Some(1));

    let (status, body) = get_request(&server.router, analytics).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"]["total_shares"].as_u64(), Some(1));
}

#[tokio::test]
async fn test_unknown_route_returns_404_envelope() {
    let server = setup_test_server();

    let (status, body) = get_request(&server.router, "/api/v1/bracelets").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"].as_bool(), Some(false));
}
