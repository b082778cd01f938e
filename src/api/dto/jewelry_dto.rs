//! Response bodies for the catalog endpoints.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::JewelryItem;
use crate::service::ItemPage;

/// Response for `GET /jewelry/{item_id}`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ItemResponse {
    /// Always `true`.
    pub success: bool,
    /// The requested item.
    pub item: JewelryItem,
}

/// Response for create and update.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ItemMutationResponse {
    /// Always `true`.
    pub success: bool,
    /// Human-readable confirmation.
    pub message: String,
    /// The item as stored after the write.
    pub item: JewelryItem,
}

/// Response for `GET /jewelry`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ItemListResponse {
    /// Always `true`.
    pub success: bool,
    /// Items on this page, newest first.
    pub items: Vec<JewelryItem>,
    /// Number of items on this page.
    pub count: u64,
    /// Current page number.
    pub page: u64,
    /// Items per page after clamping.
    pub page_size: u64,
    /// Matching items across all pages.
    pub total_count: u64,
    /// Total number of pages.
    pub total_pages: u64,
}

impl From<ItemPage> for ItemListResponse {
    fn from(page: ItemPage) -> Self {
        Self {
            success: true,
            count: u64::try_from(page.items.len()).unwrap_or(u64::MAX),
            items: page.items,
            page: page.page.page,
            page_size: page.page.page_size,
            total_count: page.total_count,
            total_pages: page.total_pages,
        }
    }
}
