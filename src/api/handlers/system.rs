//! System endpoints: service metadata, health check, unmatched routes.

use axum::extract::State;
use axum::http::Uri;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::error::ApiError;

/// Resource paths advertised by `GET /`.
#[derive(Debug, Serialize, ToSchema)]
pub struct EndpointMap {
    jewelry: String,
    analytics: String,
    health: String,
}

/// Service metadata response.
#[derive(Debug, Serialize, ToSchema)]
pub struct RootResponse {
    success: bool,
    message: String,
    version: String,
    docs: String,
    endpoints: EndpointMap,
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    success: bool,
    status: String,
    timestamp: String,
    environment: String,
}

/// `GET /`: Service name, version, and entry points.
#[utoipa::path(
    get,
    path = "/",
    tag = "System",
    summary = "Service metadata",
    responses(
        (status = 200, description = "Service metadata", body = RootResponse),
    )
)]
pub async fn root_handler(State(state): State<AppState>) -> impl IntoResponse {
    let prefix = &state.config.api_prefix;
    Json(RootResponse {
        success: true,
        message: state.config.app_name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        docs: "/docs".to_string(),
        endpoints: EndpointMap {
            jewelry: format!("{prefix}/jewelry"),
            analytics: format!("{prefix}/analytics"),
            health: "/health".to_string(),
        },
    })
}

/// `GET /health`: Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health, the deployment environment, and the current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        success: true,
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        environment: state.config.environment.clone(),
    })
}

/// Fallback for unmatched paths, answered with the JSON error envelope.
pub async fn not_found_handler(uri: Uri) -> ApiError {
    ApiError::RouteNotFound(uri.path().to_string())
}

/// System routes mounted at the root level, outside the API prefix.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
}
