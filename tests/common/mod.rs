//! Shared helpers for driving the router in-process.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use jewelry_tryon_api::api;
use jewelry_tryon_api::app_state::AppState;
use jewelry_tryon_api::config::{AppConfig, StoreBackend};
use jewelry_tryon_api::persistence::{MemoryStore, Store};

pub struct TestServer {
    pub router: Router,
    pub store: Arc<MemoryStore>,
}

pub fn setup_test_server() -> TestServer {
    let store = Arc::new(MemoryStore::new());
    let config = AppConfig {
        environment: "test".to_string(),
        store_backend: StoreBackend::Memory,
        share_base_url: "https://shop.test/try-on".to_string(),
        ..AppConfig::default()
    };
    let shared = Arc::clone(&store) as Arc<dyn Store>;
    TestServer {
        router: api::build_app(AppState::new(shared, config)),
        store,
    }
}

pub async fn send_raw(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<String>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body)),
        None => builder.body(Body::empty()),
    };
    let Ok(request) = request else {
        panic!("invalid request for {uri}");
    };
    let Ok(response) = router.clone().oneshot(request).await else {
        panic!("router failed for {uri}");
    };
    let status = response.status();
    let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
        panic!("unreadable body for {uri}");
    };
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

pub async fn get_request(router: &Router, uri: &str) -> (StatusCode, Value) {
    send_raw(router, Method::GET, uri, None).await
}

pub async fn delete_request(router: &Router, uri: &str) -> (StatusCode, Value) {
    send_raw(router, Method::DELETE, uri, None).await
}

pub async fn post_json(router: &Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    send_raw(router, Method::POST, uri, Some(body.to_string())).await
}

pub async fn put_json(router: &Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    send_raw(router, Method::PUT, uri, Some(body.to_string())).await
}

/// Creates an item through the API and returns its `item_id`.
pub async fn create_item(router: &Router, body: &Value) -> String {
    let (status, json) = post_json(router, "/api/v1/jewelry", body).await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {json}");
    let Some(item_id) = json["item"]["item_id"].as_str() else {
        panic!("response has no item_id: {json}");
    };
    item_id.to_string()
}
