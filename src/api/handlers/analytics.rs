//! Analytics handlers: event tracking and reports.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{ItemAnalyticsResponse, OverallAnalyticsResponse, TrackEventResponse};
use crate::api::extract::ApiJson;
use crate::app_state::AppState;
use crate::domain::NewAnalyticsEvent;
use crate::error::{ApiError, ErrorResponse};

/// `POST /analytics`: Record an interaction event.
///
/// # Errors
///
/// Returns [`ApiError`] on malformed or invalid input.
#[utoipa::path(
    post,
    path = "/api/v1/analytics",
    tag = "Analytics",
    summary = "Track an event",
    description = "Stores the event and increments the matching counter on the item. Events for unknown items are stored without touching any counter.",
    request_body = NewAnalyticsEvent,
    responses(
        (status = 200, description = "Event recorded", body = TrackEventResponse),
        (status = 400, description = "Malformed JSON or unknown event type", body = ErrorResponse),
        (status = 422, description = "Field validation failed", body = ErrorResponse),
    )
)]
pub async fn track_event(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewAnalyticsEvent>,
) -> Result<impl IntoResponse, ApiError> {
    let event = state.analytics.track(input).await?;
    Ok(Json(TrackEventResponse {
        success: true,
        message: "Event tracked successfully".to_string(),
        event_id: event.event_id,
    }))
}

/// `GET /analytics/{item_id}`: Counters and recent events for one item.
///
/// # Errors
///
/// Returns [`ApiError::ItemNotFound`] if the item does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/analytics/{item_id}",
    tag = "Analytics",
    summary = "Item analytics",
    params(("item_id" = String, Path, description = "8-character item code")),
    responses(
        (status = 200, description = "Item analytics", body = ItemAnalyticsResponse),
        (status = 404, description = "Item not found", body = ErrorResponse),
    )
)]
pub async fn item_analytics(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let report = state.analytics.item_report(&item_id).await?;
    Ok(Json(ItemAnalyticsResponse::from(report)))
}

/// `GET /analytics`: Catalog-wide summary.
///
/// # Errors
///
/// Returns [`ApiError`] on store failure.
#[utoipa::path(
    get,
    path = "/api/v1/analytics",
    tag = "Analytics",
    summary = "Overall analytics",
    description = "Sums counters over active items and lists the five with the most try-ons.",
    responses(
        (status = 200, description = "Catalog summary", body = OverallAnalyticsResponse),
    )
)]
pub async fn overall_analytics(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let report = state.analytics.overall_report().await?;
    Ok(Json(OverallAnalyticsResponse::from(report)))
}

/// Analytics routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/analytics", get(overall_analytics).post(track_event))
        .route("/analytics/{item_id}", get(item_analytics))
}
