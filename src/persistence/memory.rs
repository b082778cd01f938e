//! In-process document store.
//!
//! [`MemoryStore`] keeps both collections behind [`tokio::sync::RwLock`]s.
//! Writes take the collection's write lock for the whole read-modify-write,
//! which gives the same per-document atomicity the database provides.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{DocumentPatch, ItemFilter, Store};
use crate::domain::{
    ActiveTotals, AnalyticsEvent, CounterField, ItemStatus, JewelryItem,
};
use crate::error::StoreError;

/// Volatile store holding items keyed by `item_id` and an append-only
/// event log.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RwLock<HashMap<String, JewelryItem>>,
    events: RwLock<Vec<AnalyticsEvent>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored items, any status.
    pub async fn item_count(&self) -> usize {
        self.items.read().await.len()
    }

    /// Returns the number of stored events.
    pub async fn event_count(&self) -> usize {
        self.events.read().await.len()
    }
}

fn newest_first(a: &JewelryItem, b: &JewelryItem) -> std::cmp::Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| a.item_id.cmp(&b.item_id))
}

fn to_usize(n: u64) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn ensure_schema(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn insert_item(&self, item: &JewelryItem) -> Result<(), StoreError> {
        let mut map = self.items.write().await;
        if map.contains_key(&item.item_id) {
            return Err(StoreError::Duplicate(format!("item_id {}", item.item_id)));
        }
        map.insert(item.item_id.clone(), item.clone());
        Ok(())
    }

    async fn find_item(&self, item_id: &str) -> Result<Option<JewelryItem>, StoreError> {
        Ok(self.items.read().await.get(item_id).cloned())
    }

    async fn find_items(
        &self,
        filter: ItemFilter,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<JewelryItem>, StoreError> {
        let map = self.items.read().await;
        let mut matched: Vec<&JewelryItem> = map.values().filter(|i| filter.matches(i)).collect();
        matched.sort_by(|a, b| newest_first(a, b));
        Ok(matched
            .into_iter()
            .skip(to_usize(skip))
            .take(to_usize(limit))
            .cloned()
            .collect())
    }

    async fn count_items(&self, filter: ItemFilter) -> Result<u64, StoreError> {
        let map = self.items.read().await;
        let count = map.values().filter(|i| filter.matches(i)).count();
        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }

    async fn update_item(
        &self,
        item_id: &str,
        patch: &DocumentPatch,
    ) -> Result<bool, StoreError> {
        let mut map = self.items.write().await;
        let Some(item) = map.get_mut(item_id) else {
            return Ok(false);
        };
        let mut doc = serde_json::to_value(&*item)?;
        if let Some(fields) = doc.as_object_mut() {
            for (key, value) in patch {
                fields.insert(key.clone(), value.clone());
            }
        }
        *item = serde_json::from_value(doc)?;
        Ok(true)
    }

    async fn set_status(
        &self,
        item_id: &str,
        status: ItemStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let mut map = self.items.write().await;
        let Some(item) = map.get_mut(item_id) else {
            return Ok(false);
        };
        item.status = status;
        item.updated_at = updated_at;
        Ok(true)
    }

    async fn increment_counter(
        &self,
        item_id: &str,
        counter: CounterField,
        by: u64,
    ) -> Result<bool, StoreError> {
        let mut map = self.items.write().await;
        let Some(item) = map.get_mut(item_id) else {
            return Ok(false);
        };
        item.analytics.increment(counter, by);
        Ok(true)
    }

    async fn insert_event(&self, event: &AnalyticsEvent) -> Result<(), StoreError> {
        let mut log = self.events.write().await;
        if log.iter().any(|e| e.event_id == event.event_id) {
            return Err(StoreError::Duplicate(format!("event_id {}", event.event_id)));
        }
        log.push(event.clone());
        Ok(())
    }

    async fn recent_events(
        &self,
        jewelry_id: &str,
        limit: u64,
    ) -> Result<Vec<AnalyticsEvent>, StoreError> {
        let log = self.events.read().await;
        // Reverse first so that equal timestamps keep latest-inserted first.
        let mut matched: Vec<&AnalyticsEvent> = log
            .iter()
            .rev()
            .filter(|e| e.jewelry_id == jewelry_id)
            .collect();
        matched.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(matched
            .into_iter()
            .take(to_usize(limit))
            .cloned()
            .collect())
    }

    async fn active_totals(&self) -> Result<ActiveTotals, StoreError> {
        let map = self.items.read().await;
        let mut totals = ActiveTotals::default();
        for item in map.values().filter(|i| i.status == ItemStatus::Active) {
            totals.add(&item.analytics);
        }
        Ok(totals)
    }

    async fn top_active_items(&self, limit: u64) -> Result<Vec<JewelryItem>, StoreError> {
        let map = self.items.read().await;
        let mut active: Vec<&JewelryItem> = map
            .values()
            .filter(|i| i.status == ItemStatus::Active)
            .collect();
        active.sort_by(|a, b| {
            b.analytics
                .try_ons
                .cmp(&a.analytics.try_ons)
                .then_with(|| newest_first(a, b))
        });
        Ok(active.into_iter().take(to_usize(limit)).cloned().collect())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{JewelryType, NewJewelryItem, ShareLink};
    use chrono::Duration;

    fn make_item(code: &str, item_type: &str, offset_secs: i64) -> JewelryItem {
        let Ok(input) = serde_json::from_value::<NewJewelryItem>(serde_json::json!({
            "name": format!("Item {code}"),
            "type": item_type,
            "price": { "amount": 100.0 }
        })) else {
            panic!("valid input");
        };
        let link = ShareLink::new(code, "https://example.com/try-on");
        JewelryItem::new(input, link, Utc::now() + Duration::seconds(offset_secs))
    }

    #[tokio::test]
    async fn insert_and_find() {
        let store = MemoryStore::new();
        let item = make_item("AAAAAAAA", "ring", 0);
        assert!(store.insert_item(&item).await.is_ok());

        let Ok(Some(found)) = store.find_item("AAAAAAAA").await else {
            panic!("item not found");
        };
        assert_eq!(found, item);
        assert!(matches!(store.find_item("missing").await, Ok(None)));
    }

    #[tokio::test]
    async fn duplicate_item_id_is_rejected() {
        let store = MemoryStore::new();
        let item = make_item("AAAAAAAA", "ring", 0);
        let _ = store.insert_item(&item).await;
        let result = store.insert_item(&item).await;
        assert!(matches!(result, Err(StoreError::Duplicate(_))));
        assert_eq!(store.item_count().await, 1);
    }

    #[tokio::test]
    async fn find_items_filters_sorts_and_pages() {
        let store = MemoryStore::new();
        let _ = store.insert_item(&make_item("OLDRING1", "ring", -20)).await;
        let _ = store.insert_item(&make_item("NEWRING1", "ring", 0)).await;
        let _ = store.insert_item(&make_item("NECKLACE", "necklace", -10)).await;

        let filter = ItemFilter {
            item_type: Some(JewelryType::Ring),
            status: None,
        };
        let Ok(rings) = store.find_items(filter, 0, 10).await else {
            panic!("query failed");
        };
        let ids: Vec<&str> = rings.iter().map(|i| i.item_id.as_str()).collect();
        assert_eq!(ids, vec!["NEWRING1", "OLDRING1"]);

        let Ok(page) = store.find_items(ItemFilter::default(), 1, 1).await else {
            panic!("query failed");
        };
        assert_eq!(page.len(), 1);
        assert_eq!(page.first().map(|i| i.item_id.as_str()), Some("NECKLACE"));

        assert!(matches!(store.count_items(filter).await, Ok(2)));
    }

    #[tokio::test]
    async fn update_merges_top_level_fields() {
        let store = MemoryStore::new();
        let item = make_item("AAAAAAAA", "ring", 0);
        let _ = store.insert_item(&item).await;

        let mut patch = DocumentPatch::new();
        patch.insert("name".to_string(), serde_json::json!("Renamed"));
        assert!(matches!(store.update_item("AAAAAAAA", &patch).await, Ok(true)));
        assert!(matches!(store.update_item("missing", &patch).await, Ok(false)));

        let Ok(Some(found)) = store.find_item("AAAAAAAA").await else {
            panic!("item not found");
        };
        assert_eq!(found.name, "Renamed");
        assert_eq!(found.price, item.price);
        assert_eq!(found.ar_config, item.ar_config);
    }

    #[tokio::test]
    async fn update_that_breaks_the_document_is_rejected() {
        let store = MemoryStore::new();
        let item = make_item("AAAAAAAA", "ring", 0);
        let _ = store.insert_item(&item).await;

        let mut patch = DocumentPatch::new();
        patch.insert("price".to_string(), serde_json::json!("free"));
        let result = store.update_item("AAAAAAAA", &patch).await;
        assert!(matches!(result, Err(StoreError::Encoding(_))));

        let Ok(Some(found)) = store.find_item("AAAAAAAA").await else {
            panic!("item not found");
        };
        assert_eq!(found, item);
    }

    #[tokio::test]
    async fn increment_on_missing_item_is_a_no_op() {
        let store = MemoryStore::new();
        let result = store.increment_counter("missing", CounterField::Views, 1).await;
        assert!(matches!(result, Ok(false)));
        assert_eq!(store.item_count().await, 0);
    }

    #[tokio::test]
    async fn concurrent_increments_are_not_lost() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let _ = store.insert_item(&make_item("AAAAAAAA", "ring", 0)).await;

        let mut handles = Vec::new();
        for _ in 0..50 {
            let store = std::sync::Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                let _ = store
                    .increment_counter("AAAAAAAA", CounterField::TryOns, 1)
                    .await;
            }));
        }
        for h in handles {
            let _ = h.await;
        }

        let Ok(Some(found)) = store.find_item("AAAAAAAA").await else {
            panic!("item not found");
        };
        assert_eq!(found.analytics.try_ons, 50);
    }

    #[tokio::test]
    async fn aggregates_only_count_active_items() {
        let store = MemoryStore::new();
        let _ = store.insert_item(&make_item("ACTIVE01", "ring", 0)).await;
        let _ = store.insert_item(&make_item("ARCHIVED", "ring", 0)).await;
        let _ = store
            .increment_counter("ACTIVE01", CounterField::TryOns, 4)
            .await;
        let _ = store
            .increment_counter("ARCHIVED", CounterField::TryOns, 9)
            .await;
        let _ = store
            .set_status("ARCHIVED", ItemStatus::Archived, Utc::now())
            .await;

        let Ok(totals) = store.active_totals().await else {
            panic!("aggregate failed");
        };
        assert_eq!(totals.items, 1);
        assert_eq!(totals.try_ons, 4);

        let Ok(top) = store.top_active_items(5).await else {
            panic!("query failed");
        };
        assert_eq!(top.len(), 1);
    }
}
