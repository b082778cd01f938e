//! Domain layer: catalog records, analytics events, and reporting types.
//!
//! These types are the stored document shapes. They know nothing about
//! HTTP or the concrete store; validation rules live on the input types
//! ([`NewJewelryItem`], [`JewelryUpdate`], [`NewAnalyticsEvent`]).

pub mod analytics;
pub mod event;
pub mod jewelry;
pub mod pagination;
pub mod short_code;

pub use analytics::{ActiveTotals, CounterField, ItemAnalytics, OverallSummary};
pub use event::{AnalyticsEvent, EventType, NewAnalyticsEvent};
pub use jewelry::{
    ItemStatus, JewelryItem, JewelryType, JewelryUpdate, NewJewelryItem, ShareLink,
};
pub use pagination::PageRequest;
