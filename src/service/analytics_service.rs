//! Analytics service: event ingestion and reporting.

use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::domain::{
    AnalyticsEvent, ItemAnalytics, JewelryItem, NewAnalyticsEvent, OverallSummary, short_code,
};
use crate::error::ApiError;
use crate::persistence::Store;

/// Maximum number of events returned by [`AnalyticsService::item_report`].
pub const RECENT_EVENTS_LIMIT: u64 = 100;

/// Number of items in [`OverallReport::top_items`].
pub const TOP_ITEMS_LIMIT: u64 = 5;

/// Analytics for a single item.
#[derive(Debug, Clone)]
pub struct ItemReport {
    /// Item identifier.
    pub item_id: String,
    /// Item display name.
    pub item_name: String,
    /// Item counters.
    pub stats: ItemAnalytics,
    /// Most recent events for the item, newest first.
    pub recent_events: Vec<AnalyticsEvent>,
}

/// Catalog-wide analytics.
#[derive(Debug, Clone)]
pub struct OverallReport {
    /// Sums over active items.
    pub summary: OverallSummary,
    /// Active items with the most try-ons.
    pub top_items: Vec<JewelryItem>,
}

/// Orchestration layer for analytics.
#[derive(Debug, Clone)]
pub struct AnalyticsService {
    store: Arc<dyn Store>,
}

impl AnalyticsService {
    /// Creates a new `AnalyticsService`.
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Records an event and bumps the matching counter on its item.
    ///
    /// The event is stored even when `jewelry_id` names no item; the
    /// counter update is then a silent no-op. The two writes are not
    /// atomic with respect to each other.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] on invalid input, or a store error.
    pub async fn track(&self, input: NewAnalyticsEvent) -> Result<AnalyticsEvent, ApiError> {
        input.validate()?;

        let event = AnalyticsEvent::new(input, short_code::new_event_id(), Utc::now());
        self.store.insert_event(&event).await?;

        let counter = event.event_type.counter();
        let matched = self
            .store
            .increment_counter(&event.jewelry_id, counter, 1)
            .await?;
        if !matched {
            tracing::debug!(
                jewelry_id = %event.jewelry_id,
                "event references unknown item; counter not updated"
            );
        }

        tracing::info!(
            event_id = %event.event_id,
            jewelry_id = %event.jewelry_id,
            event_type = event.event_type.as_str(),
            "event tracked"
        );
        Ok(event)
    }

    /// Returns an item's counters and its most recent events.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ItemNotFound`] if the item does not exist.
    pub async fn item_report(&self, item_id: &str) -> Result<ItemReport, ApiError> {
        let item = self
            .store
            .find_item(item_id)
            .await?
            .ok_or_else(|| ApiError::ItemNotFound(item_id.to_string()))?;
        let recent_events = self
            .store
            .recent_events(item_id, RECENT_EVENTS_LIMIT)
            .await?;

        Ok(ItemReport {
            item_id: item.item_id,
            item_name: item.name,
            stats: item.analytics,
            recent_events,
        })
    }

    /// Sums counters over active items and ranks them by try-ons.
    ///
    /// # Errors
    ///
    /// Returns a store error on query failure.
    pub async fn overall_report(&self) -> Result<OverallReport, ApiError> {
        let totals = self.store.active_totals().await?;
        let top_items = self.store.top_active_items(TOP_ITEMS_LIMIT).await?;
        Ok(OverallReport {
            summary: OverallSummary::from(totals),
            top_items,
        })
    }
}
