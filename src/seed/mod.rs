//! Initial data loader
//!
//! Loads the embedded dataset behind the admin load-data endpoint.
//! Idempotent: every entity is matched by its natural key (category
//! name, tag name, news slug, comment (item, email, content), setting
//! key, stat (item, date)) and skipped when it already exists, so
//! retrying after a partial failure converges instead of duplicating.

pub mod data;

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::db::repositories::{
    CategoryRepository, CommentRepository, NewsItemRepository, SettingsRepository,
    StatsRepository, TagRepository,
};
use crate::models::Setting;

/// Per-entity counts of rows actually inserted by a load run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedReport {
    pub categories: u32,
    pub tags: u32,
    pub news_items: u32,
    pub comments: u32,
    pub settings: u32,
    pub stats: u32,
}

/// Seed loader over the repository layer
pub struct SeedLoader {
    categories: Arc<dyn CategoryRepository>,
    tags: Arc<dyn TagRepository>,
    news: Arc<dyn NewsItemRepository>,
    comments: Arc<dyn CommentRepository>,
    settings: Arc<dyn SettingsRepository>,
    stats: Arc<dyn StatsRepository>,
}

impl SeedLoader {
    pub fn new(
        categories: Arc<dyn CategoryRepository>,
        tags: Arc<dyn TagRepository>,
        news: Arc<dyn NewsItemRepository>,
        comments: Arc<dyn CommentRepository>,
        settings: Arc<dyn SettingsRepository>,
        stats: Arc<dyn StatsRepository>,
    ) -> Self {
        Self {
            categories,
            tags,
            news,
            comments,
            settings,
            stats,
        }
    }

    /// Load the embedded dataset, skipping rows that already exist
    pub async fn load(&self) -> Result<SeedReport> {
        let mut report = SeedReport::default();

        self.load_categories(&mut report).await?;
        self.load_tags(&mut report).await?;
        self.load_news_items(&mut report).await?;
        self.load_comments(&mut report).await?;
        self.load_settings(&mut report).await?;
        self.load_stats(&mut report).await?;

        tracing::info!(
            categories = report.categories,
            tags = report.tags,
            news_items = report.news_items,
            comments = report.comments,
            settings = report.settings,
            stats = report.stats,
            "Seed data loaded"
        );

        Ok(report)
    }

    async fn load_categories(&self, report: &mut SeedReport) -> Result<()> {
        for input in data::categories() {
            if self
                .categories
                .get_by_name(&input.name)
                .await
                .context("Failed to check category existence")?
                .is_none()
            {
                self.categories
                    .create(&input)
                    .await
                    .with_context(|| format!("Failed to seed category '{}'", input.name))?;
                report.categories += 1;
            }
        }
        Ok(())
    }

    async fn load_tags(&self, report: &mut SeedReport) -> Result<()> {
        for input in data::tags() {
            if self
                .tags
                .get_by_name(&input.name)
                .await
                .context("Failed to check tag existence")?
                .is_none()
            {
                self.tags
                    .create(&input)
                    .await
                    .with_context(|| format!("Failed to seed tag '{}'", input.name))?;
                report.tags += 1;
            }
        }
        Ok(())
    }

    async fn load_news_items(&self, report: &mut SeedReport) -> Result<()> {
        for entry in data::news_items() {
            if self
                .news
                .get_by_slug(&entry.input.slug)
                .await
                .context("Failed to check news item existence")?
                .is_some()
            {
                continue;
            }

            let category = self
                .categories
                .get_by_name(entry.category_name)
                .await
                .context("Failed to resolve seed category")?
                .with_context(|| format!("Seed category '{}' missing", entry.category_name))?;

            let mut input = entry.input;
            input.category_id = category.id;

            let item = self
                .news
                .create(&input)
                .await
                .with_context(|| format!("Failed to seed news item '{}'", input.slug))?;

            for tag_name in entry.tag_names {
                let tag = self
                    .tags
                    .get_by_name(tag_name)
                    .await
                    .context("Failed to resolve seed tag")?
                    .with_context(|| format!("Seed tag '{}' missing", tag_name))?;
                self.tags
                    .attach_to_item(tag.id, item.id)
                    .await
                    .context("Failed to attach seed tag")?;
            }

            report.news_items += 1;
        }
        Ok(())
    }

    async fn load_comments(&self, report: &mut SeedReport) -> Result<()> {
        for entry in data::comments() {
            let item = self
                .news
                .get_by_slug(entry.slug)
                .await
                .context("Failed to resolve seed news item")?
                .with_context(|| format!("Seed news item '{}' missing", entry.slug))?;

            if self
                .comments
                .exists(item.id, entry.user_email, entry.content)
                .await
                .context("Failed to check comment existence")?
            {
                continue;
            }

            let comment = self
                .comments
                .create(&crate::models::CreateCommentInput {
                    news_item_id: item.id,
                    user_name: entry.user_name.to_string(),
                    user_email: entry.user_email.to_string(),
                    content: entry.content.to_string(),
                })
                .await
                .context("Failed to seed comment")?;

            // Seed comments ship pre-approved and count toward the item
            if self
                .comments
                .approve(comment.id)
                .await
                .context("Failed to approve seed comment")?
            {
                self.news
                    .adjust_comment_count(item.id, 1)
                    .await
                    .context("Failed to roll up seed comment count")?;
            }

            report.comments += 1;
        }
        Ok(())
    }

    async fn load_settings(&self, report: &mut SeedReport) -> Result<()> {
        for entry in data::settings() {
            if self
                .settings
                .get(entry.key)
                .await
                .context("Failed to check setting existence")?
                .is_some()
            {
                continue;
            }

            self.settings
                .upsert(&Setting {
                    key: entry.key.to_string(),
                    value: entry.value.to_string(),
                    value_type: entry.value_type,
                    description: Some(entry.description.to_string()),
                    category: Some(entry.category.to_string()),
                    is_public: entry.is_public,
                    updated_at: Utc::now(),
                })
                .await
                .with_context(|| format!("Failed to seed setting '{}'", entry.key))?;
            report.settings += 1;
        }
        Ok(())
    }

    async fn load_stats(&self, report: &mut SeedReport) -> Result<()> {
        let today = Utc::now().date_naive();

        for (index, entry) in data::news_items().iter().enumerate() {
            let item = self
                .news
                .get_by_slug(&entry.input.slug)
                .await
                .context("Failed to resolve seed news item")?
                .with_context(|| format!("Seed news item '{}' missing", entry.input.slug))?;

            let ordinal = (index + 1) as i64;
            for days_ago in 0..data::STATS_DAYS {
                let date = today - Duration::days(days_ago);
                if self
                    .stats
                    .exists(item.id, date)
                    .await
                    .context("Failed to check stat existence")?
                {
                    continue;
                }

                let metrics = data::daily_metrics(days_ago, ordinal);
                self.stats
                    .record(item.id, date, &metrics)
                    .await
                    .context("Failed to seed daily stats")?;
                report.stats += 1;
            }
        }
        Ok(())
    }
}
