//! REST API layer: route handlers, DTOs, extractors, and router composition.
//!
//! Resource endpoints are mounted under the configured API prefix
//! (`/api/v1` by default); `/` and `/health` stay at the root.

pub mod dto;
pub mod extract;
pub mod handlers;
pub mod openapi;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::HeaderValue;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;

/// Builds the API router with all REST endpoints.
///
/// An empty `api_prefix` mounts resource routes at the root.
pub fn build_router(api_prefix: &str) -> Router<AppState> {
    let router = if api_prefix.is_empty() {
        Router::new().merge(handlers::routes())
    } else {
        Router::new().nest(api_prefix, handlers::routes())
    };
    let router = router
        .merge(handlers::system::routes())
        .fallback(handlers::system::not_found_handler);

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(openapi::swagger_ui());

    router
}

/// Builds the complete application: routes, middleware, and state.
pub fn build_app(state: AppState) -> Router {
    let config = Arc::clone(&state.config);
    build_router(&config.api_prefix)
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs,
        )))
        .layer(cors_layer(&config.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS policy for the configured origins. An empty list or `*` allows
/// any origin without credentials.
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %o, "ignoring unparsable CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
