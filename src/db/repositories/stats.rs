//! Daily statistics repository
//!
//! Database operations for per-item daily engagement rollups.
//!
//! Each item has at most one row per calendar day. Recording metrics
//! for an existing (item, day) pair replaces that row's metrics rather
//! than inserting a duplicate.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{DailyMetrics, DailyStat, DailySummary};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Daily statistics repository trait
#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Record metrics for an item on a given day, replacing any
    /// existing row for that pair. Returns the upserted row.
    async fn record(
        &self,
        news_item_id: i64,
        date: NaiveDate,
        metrics: &DailyMetrics,
    ) -> Result<DailyStat>;

    /// Get the stat row for an item on a given day
    async fn get(&self, news_item_id: i64, date: NaiveDate) -> Result<Option<DailyStat>>;

    /// Aggregate engagement across all items for a single day
    async fn summary_for_date(&self, date: NaiveDate) -> Result<DailySummary>;

    /// Check whether a stat row exists for an item on a given day
    async fn exists(&self, news_item_id: i64, date: NaiveDate) -> Result<bool>;

    /// Count all stat rows
    async fn count(&self) -> Result<i64>;
}

/// SQLx-based stats repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxStatsRepository {
    pool: DynDatabasePool,
}

impl SqlxStatsRepository {
    /// Create a new SQLx stats repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn StatsRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl StatsRepository for SqlxStatsRepository {
    async fn record(
        &self,
        news_item_id: i64,
        date: NaiveDate,
        metrics: &DailyMetrics,
    ) -> Result<DailyStat> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                record_sqlite(self.pool.as_sqlite().unwrap(), news_item_id, date, metrics).await
            }
            DatabaseDriver::Mysql => {
                record_mysql(self.pool.as_mysql().unwrap(), news_item_id, date, metrics).await
            }
        }
    }

    async fn get(&self, news_item_id: i64, date: NaiveDate) -> Result<Option<DailyStat>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_stat_sqlite(self.pool.as_sqlite().unwrap(), news_item_id, date).await
            }
            DatabaseDriver::Mysql => {
                get_stat_mysql(self.pool.as_mysql().unwrap(), news_item_id, date).await
            }
        }
    }

    async fn summary_for_date(&self, date: NaiveDate) -> Result<DailySummary> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                summary_sqlite(self.pool.as_sqlite().unwrap(), date).await
            }
            DatabaseDriver::Mysql => summary_mysql(self.pool.as_mysql().unwrap(), date).await,
        }
    }

    async fn exists(&self, news_item_id: i64, date: NaiveDate) -> Result<bool> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                stat_exists_sqlite(self.pool.as_sqlite().unwrap(), news_item_id, date).await
            }
            DatabaseDriver::Mysql => {
                stat_exists_mysql(self.pool.as_mysql().unwrap(), news_item_id, date).await
            }
        }
    }

    async fn count(&self) -> Result<i64> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => count_stats_sqlite(self.pool.as_sqlite().unwrap()).await,
            DatabaseDriver::Mysql => count_stats_mysql(self.pool.as_mysql().unwrap()).await,
        }
    }
}

const STAT_COLUMNS: &str = "id, news_item_id, date, views, unique_views, likes, shares, comments, \
     avg_read_time, bounce_rate, engagement_rate, \
     direct_visits, social_visits, search_visits, referral_visits, created_at";

const SUMMARY_SQL: &str = "\
    SELECT COALESCE(SUM(views), 0) as views, \
           COALESCE(SUM(unique_views), 0) as unique_views, \
           COALESCE(SUM(likes), 0) as likes, \
           COALESCE(SUM(shares), 0) as shares, \
           COALESCE(SUM(comments), 0) as comments \
    FROM news_stats WHERE date = ?";

// ============================================================================
// SQLite implementations
// ============================================================================

async fn record_sqlite(
    pool: &SqlitePool,
    news_item_id: i64,
    date: NaiveDate,
    metrics: &DailyMetrics,
) -> Result<DailyStat> {
    sqlx::query(
        r#"
        INSERT INTO news_stats
            (news_item_id, date, views, unique_views, likes, shares, comments,
             avg_read_time, bounce_rate, engagement_rate,
             direct_visits, social_visits, search_visits, referral_visits, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(news_item_id, date) DO UPDATE SET
            views = excluded.views,
            unique_views = excluded.unique_views,
            likes = excluded.likes,
            shares = excluded.shares,
            comments = excluded.comments,
            avg_read_time = excluded.avg_read_time,
            bounce_rate = excluded.bounce_rate,
            engagement_rate = excluded.engagement_rate,
            direct_visits = excluded.direct_visits,
            social_visits = excluded.social_visits,
            search_visits = excluded.search_visits,
            referral_visits = excluded.referral_visits
        "#,
    )
    .bind(news_item_id)
    .bind(date)
    .bind(metrics.views)
    .bind(metrics.unique_views)
    .bind(metrics.likes)
    .bind(metrics.shares)
    .bind(metrics.comments)
    .bind(metrics.avg_read_time)
    .bind(metrics.bounce_rate)
    .bind(metrics.engagement_rate)
    .bind(metrics.direct_visits)
    .bind(metrics.social_visits)
    .bind(metrics.search_visits)
    .bind(metrics.referral_visits)
    .bind(Utc::now())
    .execute(pool)
    .await
    .context("Failed to record daily stats")?;

    get_stat_sqlite(pool, news_item_id, date)
        .await?
        .context("Daily stat missing after upsert")
}

async fn get_stat_sqlite(
    pool: &SqlitePool,
    news_item_id: i64,
    date: NaiveDate,
) -> Result<Option<DailyStat>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM news_stats WHERE news_item_id = ? AND date = ?",
        STAT_COLUMNS
    ))
    .bind(news_item_id)
    .bind(date)
    .fetch_optional(pool)
    .await
    .context("Failed to get daily stat")?;

    match row {
        Some(row) => Ok(Some(row_to_stat_sqlite(&row)?)),
        None => Ok(None),
    }
}

async fn summary_sqlite(pool: &SqlitePool, date: NaiveDate) -> Result<DailySummary> {
    let row = sqlx::query(SUMMARY_SQL)
        .bind(date)
        .fetch_one(pool)
        .await
        .context("Failed to aggregate daily summary")?;

    Ok(DailySummary {
        views: row.get("views"),
        unique_views: row.get("unique_views"),
        likes: row.get("likes"),
        shares: row.get("shares"),
        comments: row.get("comments"),
    })
}

async fn stat_exists_sqlite(pool: &SqlitePool, news_item_id: i64, date: NaiveDate) -> Result<bool> {
    let row = sqlx::query(
        "SELECT COUNT(*) as count FROM news_stats WHERE news_item_id = ? AND date = ?",
    )
    .bind(news_item_id)
    .bind(date)
    .fetch_one(pool)
    .await
    .context("Failed to check stat existence")?;

    let count: i64 = row.get("count");
    Ok(count > 0)
}

async fn count_stats_sqlite(pool: &SqlitePool) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM news_stats")
        .fetch_one(pool)
        .await
        .context("Failed to count stats")?;
    Ok(row.get("count"))
}

fn row_to_stat_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<DailyStat> {
    Ok(DailyStat {
        id: row.get("id"),
        news_item_id: row.get("news_item_id"),
        date: row.get("date"),
        views: row.get("views"),
        unique_views: row.get("unique_views"),
        likes: row.get("likes"),
        shares: row.get("shares"),
        comments: row.get("comments"),
        avg_read_time: row.get("avg_read_time"),
        bounce_rate: row.get("bounce_rate"),
        engagement_rate: row.get("engagement_rate"),
        direct_visits: row.get("direct_visits"),
        social_visits: row.get("social_visits"),
        search_visits: row.get("search_visits"),
        referral_visits: row.get("referral_visits"),
        created_at: row.get("created_at"),
    })
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn record_mysql(
    pool: &MySqlPool,
    news_item_id: i64,
    date: NaiveDate,
    metrics: &DailyMetrics,
) -> Result<DailyStat> {
    sqlx::query(
        r#"
        INSERT INTO news_stats
            (news_item_id, date, views, unique_views, likes, shares, comments,
             avg_read_time, bounce_rate, engagement_rate,
             direct_visits, social_visits, search_visits, referral_visits, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON DUPLICATE KEY UPDATE
            views = VALUES(views),
            unique_views = VALUES(unique_views),
            likes = VALUES(likes),
            shares = VALUES(shares),
            comments = VALUES(comments),
            avg_read_time = VALUES(avg_read_time),
            bounce_rate = VALUES(bounce_rate),
            engagement_rate = VALUES(engagement_rate),
            direct_visits = VALUES(direct_visits),
            social_visits = VALUES(social_visits),
            search_visits = VALUES(search_visits),
            referral_visits = VALUES(referral_visits)
        "#,
    )
    .bind(news_item_id)
    .bind(date)
    .bind(metrics.views)
    .bind(metrics.unique_views)
    .bind(metrics.likes)
    .bind(metrics.shares)
    .bind(metrics.comments)
    .bind(metrics.avg_read_time)
    .bind(metrics.bounce_rate)
    .bind(metrics.engagement_rate)
    .bind(metrics.direct_visits)
    .bind(metrics.social_visits)
    .bind(metrics.search_visits)
    .bind(metrics.referral_visits)
    .bind(Utc::now())
    .execute(pool)
    .await
    .context("Failed to record daily stats")?;

    get_stat_mysql(pool, news_item_id, date)
        .await?
        .context("Daily stat missing after upsert")
}

async fn get_stat_mysql(
    pool: &MySqlPool,
    news_item_id: i64,
    date: NaiveDate,
) -> Result<Option<DailyStat>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM news_stats WHERE news_item_id = ? AND date = ?",
        STAT_COLUMNS
    ))
    .bind(news_item_id)
    .bind(date)
    .fetch_optional(pool)
    .await
    .context("Failed to get daily stat")?;

    match row {
        Some(row) => Ok(Some(row_to_stat_mysql(&row)?)),
        None => Ok(None),
    }
}

async fn summary_mysql(pool: &MySqlPool, date: NaiveDate) -> Result<DailySummary> {
    let row = sqlx::query(SUMMARY_SQL)
        .bind(date)
        .fetch_one(pool)
        .await
        .context("Failed to aggregate daily summary")?;

    Ok(DailySummary {
        views: row.get("views"),
        unique_views: row.get("unique_views"),
        likes: row.get("likes"),
        shares: row.get("shares"),
        comments: row.get("comments"),
    })
}

async fn stat_exists_mysql(pool: &MySqlPool, news_item_id: i64, date: NaiveDate) -> Result<bool> {
    let row = sqlx::query(
        "SELECT COUNT(*) as count FROM news_stats WHERE news_item_id = ? AND date = ?",
    )
    .bind(news_item_id)
    .bind(date)
    .fetch_one(pool)
    .await
    .context("Failed to check stat existence")?;

    let count: i64 = row.get("count");
    Ok(count > 0)
}

async fn count_stats_mysql(pool: &MySqlPool) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM news_stats")
        .fetch_one(pool)
        .await
        .context("Failed to count stats")?;
    Ok(row.get("count"))
}

fn row_to_stat_mysql(row: &sqlx::mysql::MySqlRow) -> Result<DailyStat> {
    Ok(DailyStat {
        id: row.get("id"),
        news_item_id: row.get("news_item_id"),
        date: row.get("date"),
        views: row.get("views"),
        unique_views: row.get("unique_views"),
        likes: row.get("likes"),
        shares: row.get("shares"),
        comments: row.get("comments"),
        avg_read_time: row.get("avg_read_time"),
        bounce_rate: row.get("bounce_rate"),
        engagement_rate: row.get("engagement_rate"),
        direct_visits: row.get("direct_visits"),
        social_visits: row.get("social_visits"),
        search_visits: row.get("search_visits"),
        referral_visits: row.get("referral_visits"),
        created_at: row.get("created_at"),
    })
}
