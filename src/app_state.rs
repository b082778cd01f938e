//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::persistence::Store;
use crate::service::{AnalyticsService, CatalogService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Catalog operations.
    pub catalog: Arc<CatalogService>,
    /// Event tracking and reports.
    pub analytics: Arc<AnalyticsService>,
    /// Loaded configuration.
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Wires both services to `store`.
    #[must_use]
    pub fn new(store: Arc<dyn Store>, config: AppConfig) -> Self {
        let catalog = CatalogService::new(Arc::clone(&store), config.share_base_url.clone());
        Self {
            catalog: Arc::new(catalog),
            analytics: Arc::new(AnalyticsService::new(store)),
            config: Arc::new(config),
        }
    }
}
