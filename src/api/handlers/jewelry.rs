//! Catalog handlers: create, list, get, update, delete.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{
    ItemListResponse, ItemMutationResponse, ItemResponse, ListParams, MessageResponse,
};
use crate::api::extract::{ApiJson, ApiQuery};
use crate::app_state::AppState;
use crate::domain::{JewelryUpdate, NewJewelryItem};
use crate::error::{ApiError, ErrorResponse};

/// `POST /jewelry`: Create a jewelry item.
///
/// # Errors
///
/// Returns [`ApiError`] on malformed or invalid input.
#[utoipa::path(
    post,
    path = "/api/v1/jewelry",
    tag = "Jewelry",
    summary = "Create a jewelry item",
    description = "Stores a new item with a generated 8-character `item_id`, share link, SEO block, and zeroed analytics.",
    request_body = NewJewelryItem,
    responses(
        (status = 201, description = "Item created", body = ItemMutationResponse),
        (status = 400, description = "Malformed JSON", body = ErrorResponse),
        (status = 422, description = "Field validation failed", body = ErrorResponse),
    )
)]
pub async fn create_jewelry(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewJewelryItem>,
) -> Result<impl IntoResponse, ApiError> {
    let item = state.catalog.create(input).await?;
    let response = ItemMutationResponse {
        success: true,
        message: "Jewelry item created successfully".to_string(),
        item,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// `GET /jewelry`: List items with pagination and filters.
///
/// # Errors
///
/// Returns [`ApiError::InvalidRequest`] for an unknown type or status filter.
#[utoipa::path(
    get,
    path = "/api/v1/jewelry",
    tag = "Jewelry",
    summary = "List jewelry items",
    description = "Returns a page of items, newest first. Only active items are listed unless `status` is given; an empty `status` lists every status.",
    params(ListParams),
    responses(
        (status = 200, description = "Paginated item list", body = ItemListResponse),
        (status = 400, description = "Invalid filter", body = ErrorResponse),
    )
)]
pub async fn list_jewelry(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state.catalog.list(params.into_query()?).await?;
    Ok(Json(ItemListResponse::from(page)))
}

/// `GET /jewelry/{item_id}`: Fetch one item and count a view.
///
/// # Errors
///
/// Returns [`ApiError::ItemNotFound`] if the item does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/jewelry/{item_id}",
    tag = "Jewelry",
    summary = "Get a jewelry item",
    description = "Returns the item and increments its view counter. The returned document reflects the state before the increment.",
    params(("item_id" = String, Path, description = "8-character item code")),
    responses(
        (status = 200, description = "Item found", body = ItemResponse),
        (status = 404, description = "Item not found", body = ErrorResponse),
    )
)]
pub async fn get_jewelry(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let item = state.catalog.get(&item_id).await?;
    Ok(Json(ItemResponse {
        success: true,
        item,
    }))
}

/// `PUT /jewelry/{item_id}`: Partially update an item.
///
/// # Errors
///
/// Returns [`ApiError`] on invalid input, a missing item, or a backwards
/// status change.
#[utoipa::path(
    put,
    path = "/api/v1/jewelry/{item_id}",
    tag = "Jewelry",
    summary = "Update a jewelry item",
    description = "Only fields present in the body are changed. `updated_at` is always refreshed.",
    params(("item_id" = String, Path, description = "8-character item code")),
    request_body = JewelryUpdate,
    responses(
        (status = 200, description = "Item updated", body = ItemMutationResponse),
        (status = 400, description = "Malformed JSON", body = ErrorResponse),
        (status = 404, description = "Item not found", body = ErrorResponse),
        (status = 409, description = "Status cannot move backwards", body = ErrorResponse),
        (status = 422, description = "Field validation failed", body = ErrorResponse),
    )
)]
pub async fn update_jewelry(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    ApiJson(update): ApiJson<JewelryUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    let item = state.catalog.update(&item_id, update).await?;
    Ok(Json(ItemMutationResponse {
        success: true,
        message: "Jewelry item updated successfully".to_string(),
        item,
    }))
}

/// `DELETE /jewelry/{item_id}`: Archive an item.
///
/// # Errors
///
/// Returns [`ApiError::ItemNotFound`] if the item does not exist.
#[utoipa::path(
    delete,
    path = "/api/v1/jewelry/{item_id}",
    tag = "Jewelry",
    summary = "Archive a jewelry item",
    description = "Soft delete: sets `status` to `archived`. The item and its events are kept.",
    params(("item_id" = String, Path, description = "8-character item code")),
    responses(
        (status = 200, description = "Item archived", body = MessageResponse),
        (status = 404, description = "Item not found", body = ErrorResponse),
    )
)]
pub async fn delete_jewelry(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.catalog.archive(&item_id).await?;
    Ok(Json(MessageResponse::new("Jewelry item deleted successfully")))
}

/// Catalog routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/jewelry", get(list_jewelry).post(create_jewelry))
        .route(
            "/jewelry/{item_id}",
            get(get_jewelry).put(update_jewelry).delete(delete_jewelry),
        )
}
