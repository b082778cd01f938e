//! Jewelry catalog records.
//!
//! [`JewelryItem`] is the stored document. It is created from a
//! validated [`NewJewelryItem`], modified through [`JewelryUpdate`]
//! patches, and archived (never removed) on delete. The `analytics`
//! block is only ever touched through counter increments.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::analytics::ItemAnalytics;
use crate::error::ApiError;

/// Number of description characters copied into `seo.meta_description`.
pub const META_DESCRIPTION_LEN: usize = 160;

/// QR rendering service used for share links.
const QR_CODE_ENDPOINT: &str = "https://api.qrserver.com/v1/create-qr-code/?size=200x200&data=";

/// Kind of jewelry piece. Determines which face landmarks the client anchors to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum JewelryType {
    /// Earrings.
    Earrings,
    /// Necklace.
    Necklace,
    /// Ring.
    Ring,
    /// Bracelet.
    Bracelet,
}

impl JewelryType {
    /// Returns the wire name of the type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Earrings => "earrings",
            Self::Necklace => "necklace",
            Self::Ring => "ring",
            Self::Bracelet => "bracelet",
        }
    }
}

impl fmt::Display for JewelryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JewelryType {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "earrings" => Ok(Self::Earrings),
            "necklace" => Ok(Self::Necklace),
            "ring" => Ok(Self::Ring),
            "bracelet" => Ok(Self::Bracelet),
            other => Err(ApiError::InvalidRequest(format!(
                "unknown jewelry type: {other}"
            ))),
        }
    }
}

/// Publication state of an item.
///
/// Items only move forward: `draft -> active -> archived`, or straight
/// from `active` to `archived` on delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    /// Not yet published.
    Draft,
    /// Visible in the catalog.
    #[default]
    Active,
    /// Soft-deleted.
    Archived,
}

impl ItemStatus {
    /// Returns the wire name of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Archived => "archived",
        }
    }

    /// Returns `true` if an item in this status may be moved to `next`.
    /// Staying in the same status is always allowed.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Draft, Self::Draft)
                | (Self::Active, Self::Active)
                | (Self::Archived, Self::Archived)
                | (Self::Draft, Self::Active)
                | (Self::Active, Self::Archived)
        )
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemStatus {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "active" => Ok(Self::Active),
            "archived" => Ok(Self::Archived),
            other => Err(ApiError::InvalidRequest(format!("unknown status: {other}"))),
        }
    }
}

/// Price of an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct Price {
    /// Non-negative amount in `currency` units.
    #[validate(range(min = 0.0))]
    pub amount: f64,
    /// ISO currency code.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Optional discount percentage in `[0, 100]`.
    #[serde(default)]
    #[validate(range(min = 0.0, max = 100.0))]
    pub discount: Option<f64>,
}

fn default_currency() -> String {
    "NPR".to_string()
}

/// Image URLs. Never populated by the API; kept for the client schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Images {
    /// Thumbnail URL.
    #[serde(default)]
    pub thumbnail: Option<String>,
    /// Main image URL.
    #[serde(default)]
    pub main: Option<String>,
    /// Ordered gallery URLs.
    #[serde(default)]
    pub gallery: Vec<String>,
}

/// Pixel offset applied to the rendered overlay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PositionOffset {
    /// Horizontal offset.
    #[serde(default)]
    pub x: i64,
    /// Vertical offset.
    #[serde(default)]
    pub y: i64,
}

/// Rendering configuration consumed by the try-on client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct ArConfig {
    /// Overlay colour as a hex string.
    #[serde(default = "default_color")]
    pub color: String,
    /// Overlay size in `[10, 100]`.
    #[serde(default = "default_size")]
    #[validate(range(min = 10, max = 100))]
    pub size: i64,
    /// Offset from the anchor landmark.
    #[serde(default)]
    pub position_offset: PositionOffset,
    /// Face-mesh landmark indices the overlay anchors to.
    #[serde(default = "default_landmarks")]
    pub landmarks: Vec<i64>,
    /// Render strategy (`circle`, `image`, `3d_model`).
    #[serde(default = "default_render_type")]
    pub render_type: String,
}

fn default_color() -> String {
    "#FFD700".to_string()
}

const fn default_size() -> i64 {
    30
}

fn default_landmarks() -> Vec<i64> {
    vec![234, 454]
}

fn default_render_type() -> String {
    "circle".to_string()
}

impl Default for ArConfig {
    fn default() -> Self {
        Self {
            color: default_color(),
            size: default_size(),
            position_offset: PositionOffset::default(),
            landmarks: default_landmarks(),
            render_type: default_render_type(),
        }
    }
}

/// Descriptive metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct ItemMetadata {
    /// Material, e.g. `"gold"`.
    #[serde(default)]
    pub material: Option<String>,
    /// Free-form weight, e.g. `"4g"`.
    #[serde(default)]
    pub weight: Option<String>,
    /// Search tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Category.
    #[serde(default)]
    pub category: Option<String>,
    /// Subcategory.
    #[serde(default)]
    pub subcategory: Option<String>,
}

/// Stock levels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct Stock {
    /// Whether the item can be ordered.
    #[serde(default = "default_available")]
    pub available: bool,
    /// Units on hand.
    #[serde(default)]
    #[validate(range(min = 0))]
    pub quantity: i64,
    /// Quantity at or below which stock is considered low.
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: i64,
}

const fn default_available() -> bool {
    true
}

const fn default_low_stock_threshold() -> i64 {
    3
}

impl Default for Stock {
    fn default() -> Self {
        Self {
            available: default_available(),
            quantity: 0,
            low_stock_threshold: default_low_stock_threshold(),
        }
    }
}

/// Shareable try-on link. Generated at creation and immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ShareLink {
    /// Same value as the item's `item_id`.
    pub short_code: String,
    /// Public try-on URL.
    pub full_url: String,
    /// QR code image URL encoding `full_url`.
    pub qr_code: String,
}

impl ShareLink {
    /// Builds the share link for `short_code` under `base_url`.
    #[must_use]
    pub fn new(short_code: &str, base_url: &str) -> Self {
        let full_url = format!("{}/{short_code}", base_url.trim_end_matches('/'));
        let qr_code = format!("{QR_CODE_ENDPOINT}{full_url}");
        Self {
            short_code: short_code.to_string(),
            full_url,
            qr_code,
        }
    }
}

/// Search-engine metadata derived from the item at creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Seo {
    /// `"<name> - Virtual Try-On"`.
    #[serde(default)]
    pub meta_title: String,
    /// First 160 characters of the description.
    #[serde(default)]
    pub meta_description: String,
    /// Keywords.
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl Seo {
    /// Derives SEO fields from an item's name and description.
    #[must_use]
    pub fn derive(name: &str, description: Option<&str>) -> Self {
        Self {
            meta_title: format!("{name} - Virtual Try-On"),
            meta_description: description
                .map(|d| d.chars().take(META_DESCRIPTION_LEN).collect())
                .unwrap_or_default(),
            keywords: Vec::new(),
        }
    }
}

/// A stored catalog record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct JewelryItem {
    /// Public short identifier, unique across all items.
    pub item_id: String,
    /// Display name.
    pub name: String,
    /// Kind of piece.
    #[serde(rename = "type")]
    pub item_type: JewelryType,
    /// Optional long description.
    #[serde(default)]
    pub description: Option<String>,
    /// Pricing.
    pub price: Price,
    /// Image URLs.
    #[serde(default)]
    pub images: Images,
    /// Client rendering configuration.
    #[serde(default)]
    pub ar_config: ArConfig,
    /// Descriptive metadata.
    #[serde(default)]
    pub metadata: ItemMetadata,
    /// Stock levels.
    #[serde(default)]
    pub stock: Stock,
    /// Share link.
    pub share_link: ShareLink,
    /// Interaction counters.
    #[serde(default)]
    pub analytics: ItemAnalytics,
    /// SEO metadata.
    #[serde(default)]
    pub seo: Seo,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last mutation time.
    pub updated_at: DateTime<Utc>,
    /// Creator, if known.
    #[serde(default)]
    pub created_by: Option<String>,
    /// Publication state.
    #[serde(default)]
    pub status: ItemStatus,
}

impl JewelryItem {
    /// Builds a fresh, active item from validated input.
    ///
    /// The share link's short code becomes the item identifier. All
    /// optional blocks fall back to their defaults and counters start
    /// at zero.
    #[must_use]
    pub fn new(input: NewJewelryItem, share_link: ShareLink, now: DateTime<Utc>) -> Self {
        let seo = Seo::derive(&input.name, input.description.as_deref());
        Self {
            item_id: share_link.short_code.clone(),
            name: input.name,
            item_type: input.item_type,
            description: input.description,
            price: input.price,
            images: Images::default(),
            ar_config: input.ar_config.unwrap_or_default(),
            metadata: input.metadata.unwrap_or_default(),
            stock: input.stock.unwrap_or_default(),
            share_link,
            analytics: ItemAnalytics::default(),
            seo,
            created_at: now,
            updated_at: now,
            created_by: input.created_by,
            status: ItemStatus::Active,
        }
    }
}

/// Input for creating an item.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewJewelryItem {
    /// Display name, 1 to 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    /// Kind of piece.
    #[serde(rename = "type")]
    pub item_type: JewelryType,
    /// Optional description, at most 1000 characters.
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    /// Pricing.
    #[validate(nested)]
    pub price: Price,
    /// Metadata; defaults when absent.
    #[serde(default)]
    #[validate(nested)]
    pub metadata: Option<ItemMetadata>,
    /// Rendering configuration; defaults when absent.
    #[serde(default)]
    #[validate(nested)]
    pub ar_config: Option<ArConfig>,
    /// Stock levels; defaults when absent.
    #[serde(default)]
    #[validate(nested)]
    pub stock: Option<Stock>,
    /// Creator, if known.
    #[serde(default)]
    pub created_by: Option<String>,
}

/// Partial update of an item.
///
/// Only fields present in the request are written; absent fields keep
/// their stored value. `description` distinguishes an explicit `null`
/// (clear it) from absence. Nested blocks are replaced as a whole, with
/// their own defaults filling any missing inner fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct JewelryUpdate {
    /// New name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    /// New type.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<JewelryType>,
    /// New description; `null` clears it.
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(length(max = 1000))]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    /// Replacement pricing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub price: Option<Price>,
    /// Replacement metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub metadata: Option<ItemMetadata>,
    /// Replacement rendering configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub ar_config: Option<ArConfig>,
    /// Replacement stock levels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub stock: Option<Stock>,
    /// New status, subject to the forward-only transition rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ItemStatus>,
}

impl JewelryUpdate {
    /// Converts the update into a top-level document patch stamped
    /// with `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Internal`] if the patch cannot be serialized.
    pub fn into_patch(
        self,
        updated_at: DateTime<Utc>,
    ) -> Result<serde_json::Map<String, serde_json::Value>, ApiError> {
        let value = serde_json::to_value(self)
            .map_err(|e| ApiError::Internal(format!("cannot encode update: {e}")))?;
        let serde_json::Value::Object(mut patch) = value else {
            return Err(ApiError::Internal("update is not an object".to_string()));
        };
        let stamp = serde_json::to_value(updated_at)
            .map_err(|e| ApiError::Internal(format!("cannot encode timestamp: {e}")))?;
        patch.insert("updated_at".to_string(), stamp);
        Ok(patch)
    }
}

/// Marks a field as present even when its value is `null`.
fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
