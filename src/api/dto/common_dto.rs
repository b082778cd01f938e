//! Shared DTO types used across multiple endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{ItemStatus, JewelryType, PageRequest, pagination};
use crate::error::ApiError;
use crate::service::ListQuery;

/// Query parameters for `GET /jewelry`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Page number (1-indexed). Defaults to 1; values below 1 are raised to 1.
    #[serde(default = "default_page")]
    pub page: i64,
    /// Items per page. Defaults to 20, clamped to `1..=100`.
    #[serde(default = "default_page_size")]
    pub page_size: i64,
    /// Only items of this type.
    #[serde(rename = "type")]
    pub item_type: Option<String>,
    /// Only items in this status. Defaults to `active`; an empty value
    /// lists every status.
    pub status: Option<String>,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    i64::try_from(pagination::DEFAULT_PAGE_SIZE).unwrap_or(20)
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
            item_type: None,
            status: None,
        }
    }
}

impl ListParams {
    /// Converts raw parameters into a service query.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] for an unknown type or status.
    pub fn into_query(self) -> Result<ListQuery, ApiError> {
        let item_type = match self.item_type.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<JewelryType>()?),
        };
        let status = match self.status.as_deref().map(str::trim) {
            None => Some(ItemStatus::Active),
            Some("") => None,
            Some(raw) => Some(raw.parse::<ItemStatus>()?),
        };
        Ok(ListQuery {
            page: PageRequest::clamped(self.page, self.page_size),
            item_type,
            status,
        })
    }
}

/// Response carrying only a confirmation message.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageResponse {
    /// Always `true`.
    pub success: bool,
    /// Human-readable confirmation.
    pub message: String,
}

impl MessageResponse {
    /// Creates a successful message response.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
