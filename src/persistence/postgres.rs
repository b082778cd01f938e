//! PostgreSQL implementation of the document store.
//!
//! Each collection is a table with the whole document in a `JSONB`
//! column plus copies of the fields used for filtering, ordering, and
//! uniqueness. Counter increments and partial updates are single
//! `UPDATE` statements, so they are atomic per row.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;

use super::{DocumentPatch, ItemFilter, Store};
use crate::config::AppConfig;
use crate::domain::{
    ActiveTotals, AnalyticsEvent, CounterField, ItemStatus, JewelryItem,
};
use crate::error::StoreError;

/// PostgreSQL-backed store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a store over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool sized from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the database is unreachable.
    pub async fn connect(config: &AppConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await?;
        Ok(Self::new(pool))
    }
}

/// Maps unique-constraint violations to [`StoreError::Duplicate`].
fn map_insert_error(err: sqlx::Error, key: String) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Duplicate(key),
        _ => StoreError::Database(err),
    }
}

fn to_i64(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

fn to_u64(n: i64) -> u64 {
    u64::try_from(n).unwrap_or(0)
}

#[async_trait]
impl Store for PostgresStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("collections and indexes ready");
        Ok(())
    }

    async fn insert_item(&self, item: &JewelryItem) -> Result<(), StoreError> {
        let doc = serde_json::to_value(item)?;
        sqlx::query(
            "INSERT INTO jewelry_items (item_id, item_type, status, created_at, doc) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&item.item_id)
        .bind(item.item_type.as_str())
        .bind(item.status.as_str())
        .bind(item.created_at)
        .bind(doc)
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, format!("item_id {}", item.item_id)))?;
        Ok(())
    }

    async fn find_item(&self, item_id: &str) -> Result<Option<JewelryItem>, StoreError> {
        let row = sqlx::query_scalar::<_, Json<JewelryItem>>(
            "SELECT doc FROM jewelry_items WHERE item_id = $1",
        )
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|Json(item)| item))
    }

    async fn find_items(
        &self,
        filter: ItemFilter,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<JewelryItem>, StoreError> {
        let rows = sqlx::query_scalar::<_, Json<JewelryItem>>(
            "SELECT doc FROM jewelry_items \
             WHERE ($1::text IS NULL OR item_type = $1) \
               AND ($2::text IS NULL OR status = $2) \
             ORDER BY created_at DESC, item_id ASC \
             OFFSET $3 LIMIT $4",
        )
        .bind(filter.item_type.map(|t| t.as_str()))
        .bind(filter.status.map(|s| s.as_str()))
        .bind(to_i64(skip))
        .bind(to_i64(limit))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|Json(item)| item).collect())
    }

    async fn count_items(&self, filter: ItemFilter) -> Result<u64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM jewelry_items \
             WHERE ($1::text IS NULL OR item_type = $1) \
               AND ($2::text IS NULL OR status = $2)",
        )
        .bind(filter.item_type.map(|t| t.as_str()))
        .bind(filter.status.map(|s| s.as_str()))
        .fetch_one(&self.pool)
        .await?;
        Ok(to_u64(count))
    }

    async fn update_item(
        &self,
        item_id: &str,
        patch: &DocumentPatch,
    ) -> Result<bool, StoreError> {
        let patch = serde_json::Value::Object(patch.clone());
        let result = sqlx::query(
            "UPDATE jewelry_items \
             SET doc = doc || $2::jsonb, \
                 item_type = COALESCE($2::jsonb ->> 'type', item_type), \
                 status = COALESCE($2::jsonb ->> 'status', status) \
             WHERE item_id = $1",
        )
        .bind(item_id)
        .bind(patch)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_status(
        &self,
        item_id: &str,
        status: ItemStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let stamp = serde_json::to_value(updated_at)?;
        let result = sqlx::query(
            "UPDATE jewelry_items \
             SET status = $2, \
                 doc = jsonb_set(jsonb_set(doc, '{status}', to_jsonb($2::text)), '{updated_at}', $3::jsonb) \
             WHERE item_id = $1",
        )
        .bind(item_id)
        .bind(status.as_str())
        .bind(stamp)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn increment_counter(
        &self,
        item_id: &str,
        counter: CounterField,
        by: u64,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE jewelry_items \
             SET doc = jsonb_set( \
                 doc, \
                 ARRAY['analytics', $2::text], \
                 to_jsonb(COALESCE((doc #>> ARRAY['analytics', $2::text])::bigint, 0) + $3::bigint), \
                 true) \
             WHERE item_id = $1",
        )
        .bind(item_id)
        .bind(counter.as_str())
        .bind(to_i64(by))
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_event(&self, event: &AnalyticsEvent) -> Result<(), StoreError> {
        let doc = serde_json::to_value(event)?;
        sqlx::query(
            "INSERT INTO analytics_events \
             (event_id, jewelry_id, event_type, occurred_at, session_id, doc) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&event.event_id)
        .bind(&event.jewelry_id)
        .bind(event.event_type.as_str())
        .bind(event.timestamp)
        .bind(event.session_id.as_deref())
        .bind(doc)
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, format!("event_id {}", event.event_id)))?;
        Ok(())
    }

    async fn recent_events(
        &self,
        jewelry_id: &str,
        limit: u64,
    ) -> Result<Vec<AnalyticsEvent>, StoreError> {
        let rows = sqlx::query_scalar::<_, Json<AnalyticsEvent>>(
            "SELECT doc FROM analytics_events WHERE jewelry_id = $1 \
             ORDER BY occurred_at DESC, id DESC LIMIT $2",
        )
        .bind(jewelry_id)
        .bind(to_i64(limit))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|Json(event)| event).collect())
    }

    async fn active_totals(&self) -> Result<ActiveTotals, StoreError> {
        let (items, views, try_ons, shares, conversions, revenue) =
            sqlx::query_as::<_, (i64, i64, i64, i64, i64, f64)>(
                "SELECT COUNT(*)::bigint, \
                        COALESCE(SUM((doc #>> '{analytics,views}')::bigint), 0)::bigint, \
                        COALESCE(SUM((doc #>> '{analytics,try_ons}')::bigint), 0)::bigint, \
                        COALESCE(SUM((doc #>> '{analytics,shares}')::bigint), 0)::bigint, \
                        COALESCE(SUM((doc #>> '{analytics,conversions}')::bigint), 0)::bigint, \
                        COALESCE(SUM((doc #>> '{analytics,revenue_generated}')::float8), 0)::float8 \
                 FROM jewelry_items WHERE status = 'active'",
            )
            .fetch_one(&self.pool)
            .await?;

        Ok(ActiveTotals {
            items: to_u64(items),
            views: to_u64(views),
            try_ons: to_u64(try_ons),
            shares: to_u64(shares),
            conversions: to_u64(conversions),
            revenue,
        })
    }

    async fn top_active_items(&self, limit: u64) -> Result<Vec<JewelryItem>, StoreError> {
        let rows = sqlx::query_scalar::<_, Json<JewelryItem>>(
            "SELECT doc FROM jewelry_items WHERE status = 'active' \
             ORDER BY COALESCE((doc #>> '{analytics,try_ons}')::bigint, 0) DESC, created_at DESC \
             LIMIT $1",
        )
        .bind(to_i64(limit))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|Json(item)| item).collect())
    }
}
