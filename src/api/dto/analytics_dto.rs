//! Response bodies for the analytics endpoints.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{AnalyticsEvent, ItemAnalytics, JewelryItem, OverallSummary};
use crate::service::{ItemReport, OverallReport};

/// Response for `POST /analytics`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TrackEventResponse {
    /// Always `true`.
    pub success: bool,
    /// Human-readable confirmation.
    pub message: String,
    /// Identifier assigned to the stored event.
    pub event_id: String,
}

/// Response for `GET /analytics/{item_id}`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ItemAnalyticsResponse {
    /// Always `true`.
    pub success: bool,
    /// Item identifier.
    pub item_id: String,
    /// Item display name.
    pub item_name: String,
    /// Current counters.
    pub stats: ItemAnalytics,
    /// Up to 100 most recent events, newest first.
    pub recent_events: Vec<AnalyticsEvent>,
}

impl From<ItemReport> for ItemAnalyticsResponse {
    fn from(report: ItemReport) -> Self {
        Self {
            success: true,
            item_id: report.item_id,
            item_name: report.item_name,
            stats: report.stats,
            recent_events: report.recent_events,
        }
    }
}

/// Response for `GET /analytics`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OverallAnalyticsResponse {
    /// Always `true`.
    pub success: bool,
    /// Totals over active items.
    pub summary: OverallSummary,
    /// Up to five active items with the most try-ons.
    pub top_items: Vec<JewelryItem>,
}

impl From<OverallReport> for OverallAnalyticsResponse {
    fn from(report: OverallReport) -> Self {
        Self {
            success: true,
            summary: report.summary,
            top_items: report.top_items,
        }
    }
}
