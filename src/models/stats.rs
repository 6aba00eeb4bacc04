//! Daily statistics model
//!
//! Per-item engagement rollups, one row per (news_item_id, date).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One day of engagement metrics for a news item.
///
/// Unique on (news_item_id, date); recording for an existing pair
/// updates the row in place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyStat {
    pub id: i64,
    pub news_item_id: i64,
    pub date: NaiveDate,
    pub views: i64,
    pub unique_views: i64,
    pub likes: i64,
    pub shares: i64,
    pub comments: i64,
    /// Average read time in seconds
    pub avg_read_time: f64,
    pub bounce_rate: f64,
    pub engagement_rate: f64,
    pub direct_visits: i64,
    pub social_visits: i64,
    pub search_visits: i64,
    pub referral_visits: i64,
    pub created_at: DateTime<Utc>,
}

/// Metrics payload for recording a daily stat
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailyMetrics {
    pub views: i64,
    pub unique_views: i64,
    pub likes: i64,
    pub shares: i64,
    pub comments: i64,
    pub avg_read_time: f64,
    pub bounce_rate: f64,
    pub engagement_rate: f64,
    pub direct_visits: i64,
    pub social_visits: i64,
    pub search_visits: i64,
    pub referral_visits: i64,
}

/// Aggregated engagement across all items for a single day
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailySummary {
    pub views: i64,
    pub unique_views: i64,
    pub likes: i64,
    pub shares: i64,
    pub comments: i64,
}
