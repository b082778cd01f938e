//! Persistence layer: the document store behind both services.
//!
//! [`Store`] is the seam between the services and the database. It
//! models two collections, `jewelry_items` and `analytics_events`, with
//! per-document atomic counter increments and a small set of reporting
//! queries. [`PostgresStore`] keeps each document as `JSONB`;
//! [`MemoryStore`] keeps them in process for tests and local runs.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    ActiveTotals, AnalyticsEvent, CounterField, ItemStatus, JewelryItem, JewelryType,
};
use crate::error::StoreError;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// Top-level fields to overwrite on an item document.
pub type DocumentPatch = serde_json::Map<String, serde_json::Value>;

/// Equality filter over `jewelry_items`. `None` fields match anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItemFilter {
    /// Match `type`.
    pub item_type: Option<JewelryType>,
    /// Match `status`.
    pub status: Option<ItemStatus>,
}

impl ItemFilter {
    /// Returns `true` if `item` satisfies every set criterion.
    #[must_use]
    pub fn matches(&self, item: &JewelryItem) -> bool {
        self.item_type.is_none_or(|t| t == item.item_type)
            && self.status.is_none_or(|s| s == item.status)
    }
}

/// Document store shared by the catalog and analytics services.
///
/// Every method is a single store round trip. No method spans more than
/// one document atomically except the read-only aggregates.
#[async_trait]
pub trait Store: std::fmt::Debug + Send + Sync {
    /// Checks connectivity.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store is unreachable.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Creates collections and indexes if they do not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on schema creation failure.
    async fn ensure_schema(&self) -> Result<(), StoreError>;

    /// Inserts a new item.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Duplicate`] if the `item_id` is taken.
    async fn insert_item(&self, item: &JewelryItem) -> Result<(), StoreError>;

    /// Fetches one item by `item_id`, whatever its status.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on query failure.
    async fn find_item(&self, item_id: &str) -> Result<Option<JewelryItem>, StoreError>;

    /// Lists items matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on query failure.
    async fn find_items(
        &self,
        filter: ItemFilter,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<JewelryItem>, StoreError>;

    /// Counts items matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on query failure.
    async fn count_items(&self, filter: ItemFilter) -> Result<u64, StoreError>;

    /// Overwrites the top-level fields in `patch`. Returns `false` if no
    /// item matched.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on query failure. [`MemoryStore`] also
    /// fails if the patched document no longer decodes as an item.
    async fn update_item(&self, item_id: &str, patch: &DocumentPatch)
    -> Result<bool, StoreError>;

    /// Sets `status` and `updated_at`. Returns `false` if no item matched.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on query failure.
    async fn set_status(
        &self,
        item_id: &str,
        status: ItemStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, StoreError>;

    /// Atomically adds `by` to `analytics.<counter>`. Returns `false`,
    /// without creating anything, if no item matched.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on query failure.
    async fn increment_counter(
        &self,
        item_id: &str,
        counter: CounterField,
        by: u64,
    ) -> Result<bool, StoreError>;

    /// Appends an analytics event.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Duplicate`] if the `event_id` is taken.
    async fn insert_event(&self, event: &AnalyticsEvent) -> Result<(), StoreError>;

    /// Returns up to `limit` events for `jewelry_id`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on query failure.
    async fn recent_events(
        &self,
        jewelry_id: &str,
        limit: u64,
    ) -> Result<Vec<AnalyticsEvent>, StoreError>;

    /// Sums the counters of all active items.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on query failure.
    async fn active_totals(&self) -> Result<ActiveTotals, StoreError>;

    /// Returns up to `limit` active items with the most try-ons.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on query failure.
    async fn top_active_items(&self, limit: u64) -> Result<Vec<JewelryItem>, StoreError>;
}
