//! REST endpoint handlers organized by resource.

pub mod analytics;
pub mod jewelry;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes. Mounted under the configured API prefix.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(jewelry::routes())
        .merge(analytics::routes())
}
