//! Statistics service
//!
//! Daily engagement recording (one row per item per day, upserted) and
//! the aggregated overview behind the service stats endpoint.

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::db::repositories::{
    CategoryRepository, CommentRepository, NewsItemRepository, StatsRepository, TagRepository,
};
use crate::models::{DailyMetrics, DailyStat, DailySummary};

/// Aggregated service-wide totals plus today's engagement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceOverview {
    /// Published news items
    pub total_news: i64,
    /// Active categories
    pub total_categories: i64,
    /// Active tags
    pub total_tags: i64,
    /// Approved comments
    pub total_comments: i64,
    /// Views summed across published items
    pub total_views: i64,
    /// Today's engagement summed over all items
    pub today: DailySummary,
}

/// Statistics service
pub struct StatsService {
    stats: Arc<dyn StatsRepository>,
    news: Arc<dyn NewsItemRepository>,
    categories: Arc<dyn CategoryRepository>,
    tags: Arc<dyn TagRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl StatsService {
    /// Create a new statistics service
    pub fn new(
        stats: Arc<dyn StatsRepository>,
        news: Arc<dyn NewsItemRepository>,
        categories: Arc<dyn CategoryRepository>,
        tags: Arc<dyn TagRepository>,
        comments: Arc<dyn CommentRepository>,
    ) -> Self {
        Self {
            stats,
            news,
            categories,
            tags,
            comments,
        }
    }

    /// Record a day of metrics for an item; recording the same
    /// (item, date) pair again replaces the row in place.
    pub async fn record(
        &self,
        news_item_id: i64,
        date: NaiveDate,
        metrics: &DailyMetrics,
    ) -> Result<DailyStat> {
        self.stats
            .record(news_item_id, date, metrics)
            .await
            .context("Failed to record daily stats")
    }

    /// Whether a stat row exists for (item, date)
    pub async fn exists(&self, news_item_id: i64, date: NaiveDate) -> Result<bool> {
        self.stats
            .exists(news_item_id, date)
            .await
            .context("Failed to check stat existence")
    }

    /// Today's engagement summed over all items
    pub async fn today_summary(&self) -> Result<DailySummary> {
        let today = Utc::now().date_naive();
        self.stats
            .summary_for_date(today)
            .await
            .context("Failed to aggregate today's stats")
    }

    /// Service-wide totals for the stats endpoint
    pub async fn overview(&self) -> Result<ServiceOverview> {
        let total_news = self.news.count().await.context("Failed to count news items")?;
        let total_categories = self
            .categories
            .count()
            .await
            .context("Failed to count categories")?;
        let total_tags = self.tags.count().await.context("Failed to count tags")?;
        let total_comments = self
            .comments
            .count()
            .await
            .context("Failed to count comments")?;
        let total_views = self
            .news
            .total_views()
            .await
            .context("Failed to sum view counts")?;
        let today = self.today_summary().await?;

        Ok(ServiceOverview {
            total_news,
            total_categories,
            total_tags,
            total_comments,
            total_views,
            today,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{
        SqlxCategoryRepository, SqlxCommentRepository, SqlxNewsItemRepository, SqlxStatsRepository,
        SqlxTagRepository,
    };
    use crate::db::{create_test_pool, migrations, DynDatabasePool};
    use crate::models::{CreateCategoryInput, CreateNewsItemInput};

    async fn setup() -> (DynDatabasePool, StatsService, i64) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let categories = SqlxCategoryRepository::boxed(pool.clone());
        let category = categories
            .create(&CreateCategoryInput {
                name: "أخبار".to_string(),
                name_en: None,
                description: None,
                description_en: None,
                icon: None,
                color: None,
                display_order: 1,
            })
            .await
            .unwrap();

        let news = SqlxNewsItemRepository::boxed(pool.clone());
        let mut input = CreateNewsItemInput::new(
            "عنوان".to_string(),
            "tracked-item".to_string(),
            "ملخص".to_string(),
            "محتوى".to_string(),
            category.id,
        );
        input.view_count = 40;
        let item = news.create(&input).await.unwrap();

        let service = StatsService::new(
            SqlxStatsRepository::boxed(pool.clone()),
            news,
            categories,
            SqlxTagRepository::boxed(pool.clone()),
            SqlxCommentRepository::boxed(pool.clone()),
        );

        (pool, service, item.id)
    }

    fn metrics(views: i64) -> DailyMetrics {
        DailyMetrics {
            views,
            unique_views: views / 2,
            likes: 3,
            shares: 1,
            comments: 2,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_record_upserts_per_day() {
        let (_pool, service, item_id) = setup().await;
        let today = Utc::now().date_naive();

        let first = service.record(item_id, today, &metrics(100)).await.unwrap();
        assert_eq!(first.views, 100);

        let second = service.record(item_id, today, &metrics(150)).await.unwrap();
        assert_eq!(second.views, 150);
        assert_eq!(second.id, first.id);
    }

    #[tokio::test]
    async fn test_today_summary_sums_rows() {
        let (_pool, service, item_id) = setup().await;
        let today = Utc::now().date_naive();

        service.record(item_id, today, &metrics(80)).await.unwrap();

        let summary = service.today_summary().await.unwrap();
        assert_eq!(summary.views, 80);
        assert_eq!(summary.unique_views, 40);
        assert_eq!(summary.likes, 3);
    }

    #[tokio::test]
    async fn test_overview_totals() {
        let (_pool, service, item_id) = setup().await;
        let today = Utc::now().date_naive();

        service.record(item_id, today, &metrics(60)).await.unwrap();

        let overview = service.overview().await.unwrap();
        assert_eq!(overview.total_news, 1);
        assert_eq!(overview.total_categories, 1);
        assert_eq!(overview.total_tags, 0);
        assert_eq!(overview.total_comments, 0);
        assert_eq!(overview.total_views, 40);
        assert_eq!(overview.today.views, 60);
    }
}
