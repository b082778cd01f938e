//! Per-item counters and catalog-wide reporting figures.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Counter block embedded in every [`super::JewelryItem`].
///
/// Only mutated through atomic increments, never through item updates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ItemAnalytics {
    /// Detail-page views, including every `GET /jewelry/{id}`.
    #[serde(default)]
    pub views: u64,
    /// Virtual try-on sessions.
    #[serde(default)]
    pub try_ons: u64,
    /// Shares.
    #[serde(default)]
    pub shares: u64,
    /// Completed conversions.
    #[serde(default)]
    pub conversions: u64,
    /// Revenue attributed to the item.
    #[serde(default)]
    pub revenue_generated: f64,
    /// Clicks.
    #[serde(default)]
    pub clicks: u64,
    /// Purchase events.
    #[serde(default)]
    pub purchases: u64,
}

impl ItemAnalytics {
    /// Adds `by` to the given counter, saturating at `u64::MAX`.
    pub fn increment(&mut self, counter: CounterField, by: u64) {
        let slot = match counter {
            CounterField::Views => &mut self.views,
            CounterField::TryOns => &mut self.try_ons,
            CounterField::Shares => &mut self.shares,
            CounterField::Clicks => &mut self.clicks,
            CounterField::Purchases => &mut self.purchases,
        };
        *slot = slot.saturating_add(by);
    }
}

/// Name of an incrementable counter inside `analytics`.
///
/// The string names are part of the stored schema and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CounterField {
    /// `analytics.views`
    Views,
    /// `analytics.try_ons`
    TryOns,
    /// `analytics.shares`
    Shares,
    /// `analytics.clicks`
    Clicks,
    /// `analytics.purchases`
    Purchases,
}

impl CounterField {
    /// Returns the field name inside the `analytics` block.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Views => "views",
            Self::TryOns => "try_ons",
            Self::Shares => "shares",
            Self::Clicks => "clicks",
            Self::Purchases => "purchases",
        }
    }
}

impl fmt::Display for CounterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw sums over all active items, as returned by the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActiveTotals {
    /// Number of active items.
    pub items: u64,
    /// Sum of `analytics.views`.
    pub views: u64,
    /// Sum of `analytics.try_ons`.
    pub try_ons: u64,
    /// Sum of `analytics.shares`.
    pub shares: u64,
    /// Sum of `analytics.conversions`.
    pub conversions: u64,
    /// Sum of `analytics.revenue_generated`.
    pub revenue: f64,
}

impl ActiveTotals {
    /// Folds one item's counters into the totals.
    pub fn add(&mut self, analytics: &ItemAnalytics) {
        self.items = self.items.saturating_add(1);
        self.views = self.views.saturating_add(analytics.views);
        self.try_ons = self.try_ons.saturating_add(analytics.try_ons);
        self.shares = self.shares.saturating_add(analytics.shares);
        self.conversions = self.conversions.saturating_add(analytics.conversions);
        self.revenue += analytics.revenue_generated;
    }
}

/// Catalog-wide summary reported by `GET /analytics`.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OverallSummary {
    /// Number of active items.
    pub total_items: u64,
    /// Total views.
    pub total_views: u64,
    /// Total try-ons.
    pub total_try_ons: u64,
    /// Total shares.
    pub total_shares: u64,
    /// Total conversions.
    pub total_conversions: u64,
    /// Total attributed revenue.
    pub total_revenue: f64,
    /// `conversions / try_ons * 100`, two decimals, 0 when there are no try-ons.
    pub conversion_rate: f64,
}

impl From<ActiveTotals> for OverallSummary {
    fn from(t: ActiveTotals) -> Self {
        Self {
            total_items: t.items,
            total_views: t.views,
            total_try_ons: t.try_ons,
            total_shares: t.shares,
            total_conversions: t.conversions,
            total_revenue: t.revenue,
            conversion_rate: conversion_rate(t.conversions, t.try_ons),
        }
    }
}

/// Percentage of try-ons that converted, rounded to two decimals.
///
/// Returns `0.0` when `try_ons` is zero.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn conversion_rate(conversions: u64, try_ons: u64) -> f64 {
    if try_ons == 0 {
        return 0.0;
    }
    let rate = conversions as f64 / try_ons as f64 * 100.0;
    (rate * 100.0).round() / 100.0
}
