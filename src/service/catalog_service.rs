//! Catalog service: create, read, list, update, and archive items.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use validator::Validate;

use crate::domain::{
    CounterField, ItemStatus, JewelryItem, JewelryType, JewelryUpdate, NewJewelryItem,
    PageRequest, ShareLink, short_code,
};
use crate::error::ApiError;
use crate::persistence::{ItemFilter, Store};

/// Parameters of a list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListQuery {
    /// Page window.
    pub page: PageRequest,
    /// Only items of this type.
    pub item_type: Option<JewelryType>,
    /// Only items in this status; `None` lists every status.
    pub status: Option<ItemStatus>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: PageRequest::default(),
            item_type: None,
            status: Some(ItemStatus::Active),
        }
    }
}

/// One page of items plus the totals needed to render pagination.
#[derive(Debug, Clone)]
pub struct ItemPage {
    /// Items on this page, newest first.
    pub items: Vec<JewelryItem>,
    /// Window that produced this page.
    pub page: PageRequest,
    /// Matching items across all pages.
    pub total_count: u64,
    /// `ceil(total_count / page_size)`.
    pub total_pages: u64,
}

/// Orchestration layer for catalog records.
#[derive(Debug, Clone)]
pub struct CatalogService {
    store: Arc<dyn Store>,
    share_base_url: String,
}

impl CatalogService {
    /// Creates a new `CatalogService`.
    #[must_use]
    pub fn new(store: Arc<dyn Store>, share_base_url: impl Into<String>) -> Self {
        Self {
            store,
            share_base_url: share_base_url.into(),
        }
    }

    /// Validates `input` and stores it as a new active item with a fresh
    /// short code and share link.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] on invalid input, or a store error.
    pub async fn create(&self, input: NewJewelryItem) -> Result<JewelryItem, ApiError> {
        input.validate()?;

        let item_id = short_code::new_item_id();
        let share_link = ShareLink::new(&item_id, &self.share_base_url);
        let item = JewelryItem::new(input, share_link, Utc::now());

        self.store.insert_item(&item).await?;

        tracing::info!(item_id = %item.item_id, item_type = %item.item_type, "item created");
        Ok(item)
    }

    /// Fetches an item and counts the fetch as a view.
    ///
    /// Every successful call increments `analytics.views`, including
    /// administrative reads. The returned document is the one read
    /// before the increment.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ItemNotFound`] if no item has this id.
    pub async fn get(&self, item_id: &str) -> Result<JewelryItem, ApiError> {
        let item = self.find(item_id).await?;
        self.store
            .increment_counter(item_id, CounterField::Views, 1)
            .await?;
        Ok(item)
    }

    /// Lists one page of items, newest first.
    ///
    /// # Errors
    ///
    /// Returns a store error on query failure.
    pub async fn list(&self, query: ListQuery) -> Result<ItemPage, ApiError> {
        let filter = ItemFilter {
            item_type: query.item_type,
            status: query.status,
        };
        let items = self
            .store
            .find_items(filter, query.page.skip(), query.page.page_size)
            .await?;
        let total_count = self.store.count_items(filter).await?;

        Ok(ItemPage {
            items,
            page: query.page,
            total_count,
            total_pages: query.page.total_pages(total_count),
        })
    }

    /// Applies a partial update and returns the updated item.
    ///
    /// Only fields present in `update` are written. `analytics` and
    /// `share_link` cannot be changed here.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] on invalid input,
    /// [`ApiError::ItemNotFound`] if the item does not exist, or
    /// [`ApiError::InvalidStatusTransition`] for a backwards status change.
    pub async fn update(
        &self,
        item_id: &str,
        update: JewelryUpdate,
    ) -> Result<JewelryItem, ApiError> {
        update.validate()?;
        let existing = self.find(item_id).await?;

        if let Some(next) = update.status
            && !existing.status.can_transition_to(next)
        {
            return Err(ApiError::InvalidStatusTransition {
                from: existing.status,
                to: next,
            });
        }

        let patch = update.into_patch(next_update_time(existing.updated_at))?;
        if !self.store.update_item(item_id, &patch).await? {
            return Err(ApiError::ItemNotFound(item_id.to_string()));
        }

        tracing::info!(%item_id, fields = patch.len().saturating_sub(1), "item updated");
        self.find(item_id).await
    }

    /// Soft-deletes an item by moving it to `archived`.
    ///
    /// The document and its events are kept.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ItemNotFound`] if the item does not exist.
    pub async fn archive(&self, item_id: &str) -> Result<(), ApiError> {
        let existing = self.find(item_id).await?;
        let matched = self
            .store
            .set_status(
                item_id,
                ItemStatus::Archived,
                next_update_time(existing.updated_at),
            )
            .await?;
        if !matched {
            return Err(ApiError::ItemNotFound(item_id.to_string()));
        }

        tracing::info!(%item_id, "item archived");
        Ok(())
    }

    async fn find(&self, item_id: &str) -> Result<JewelryItem, ApiError> {
        self.store
            .find_item(item_id)
            .await?
            .ok_or_else(|| ApiError::ItemNotFound(item_id.to_string()))
    }
}

/// Timestamp for a mutation, strictly after `previous`.
fn next_update_time(previous: DateTime<Utc>) -> DateTime<Utc> {
    Utc::now().max(previous + Duration::microseconds(1))
}
