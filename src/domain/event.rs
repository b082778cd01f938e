//! Analytics events: immutable records of a single user interaction.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::analytics::CounterField;

/// Kind of interaction being recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// Item detail was displayed.
    View,
    /// Virtual try-on was started.
    TryOn,
    /// Item was shared.
    Share,
    /// A call to action was clicked.
    Click,
    /// Item was purchased.
    Purchase,
}

impl EventType {
    /// Returns the wire name of the event type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::TryOn => "try_on",
            Self::Share => "share",
            Self::Click => "click",
            Self::Purchase => "purchase",
        }
    }

    /// Counter on the referenced item bumped when this event is tracked.
    ///
    /// Field names are the event name with an `s` suffix.
    #[must_use]
    pub const fn counter(&self) -> CounterField {
        match self {
            Self::View => CounterField::Views,
            Self::TryOn => CounterField::TryOns,
            Self::Share => CounterField::Shares,
            Self::Click => CounterField::Clicks,
            Self::Purchase => CounterField::Purchases,
        }
    }
}

/// Client environment details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserData {
    /// Device class.
    #[serde(default)]
    pub device: Option<String>,
    /// Browser.
    #[serde(default)]
    pub browser: Option<String>,
    /// Operating system.
    #[serde(default)]
    pub os: Option<String>,
    /// Coarse location, e.g. `{"country": "NP", "city": "Kathmandu"}`.
    #[serde(default)]
    pub location: Option<HashMap<String, String>>,
    /// Client IP address.
    #[serde(default)]
    pub ip_address: Option<String>,
}

/// Where the visitor came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TrafficSource {
    /// Platform, e.g. `tiktok`, `instagram`, `direct`.
    #[serde(default)]
    pub platform: Option<String>,
    /// Referrer URL.
    #[serde(default)]
    pub referrer: Option<String>,
    /// Campaign tag.
    #[serde(default)]
    pub campaign: Option<String>,
}

/// Try-on session milestones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Interactions {
    /// Camera permission granted and stream started.
    #[serde(default)]
    pub camera_started: bool,
    /// A face was detected in the stream.
    #[serde(default)]
    pub face_detected: bool,
    /// A snapshot was taken.
    #[serde(default)]
    pub photo_captured: bool,
    /// The snapshot was shared.
    #[serde(default)]
    pub shared: bool,
}

/// A stored analytics event. Never updated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AnalyticsEvent {
    /// Unique event identifier.
    pub event_id: String,
    /// `item_id` of the referenced item. Not checked for existence.
    pub jewelry_id: String,
    /// Interaction kind.
    pub event_type: EventType,
    /// Server-side ingestion time.
    pub timestamp: DateTime<Utc>,
    /// Client session correlation key.
    #[serde(default)]
    pub session_id: Option<String>,
    /// Client environment.
    #[serde(default)]
    pub user_data: UserData,
    /// Traffic source.
    #[serde(default)]
    pub source: TrafficSource,
    /// Time spent, in seconds.
    #[serde(default)]
    pub duration_seconds: Option<i64>,
    /// Session milestones.
    #[serde(default)]
    pub interactions: Interactions,
}

impl AnalyticsEvent {
    /// Stamps a validated input with its identifier and ingestion time.
    #[must_use]
    pub fn new(input: NewAnalyticsEvent, event_id: String, timestamp: DateTime<Utc>) -> Self {
        Self {
            event_id,
            jewelry_id: input.jewelry_id,
            event_type: input.event_type,
            timestamp,
            session_id: input.session_id,
            user_data: input.user_data.unwrap_or_default(),
            source: input.source.unwrap_or_default(),
            duration_seconds: input.duration_seconds,
            interactions: input.interactions.unwrap_or_default(),
        }
    }
}

/// Input for `POST /analytics`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewAnalyticsEvent {
    /// `item_id` of the item the event refers to.
    #[validate(length(min = 1))]
    pub jewelry_id: String,
    /// Interaction kind.
    pub event_type: EventType,
    /// Client session correlation key.
    #[serde(default)]
    pub session_id: Option<String>,
    /// Client environment.
    #[serde(default)]
    pub user_data: Option<UserData>,
    /// Traffic source.
    #[serde(default)]
    pub source: Option<TrafficSource>,
    /// Time spent, in seconds.
    #[serde(default)]
    #[validate(range(min = 0))]
    pub duration_seconds: Option<i64>,
    /// Session milestones.
    #[serde(default)]
    pub interactions: Option<Interactions>,
}
