//! News service
//!
//! Business logic for the public news surface:
//! - Paginated, filtered listing of active items
//! - Detail lookup by slug with view counting
//! - Category and tag enrichment of list entries
//!
//! News responses are never cached: listings must reflect writes
//! immediately and every detail hit must reflect its own view count
//! increment. Only the category and tag listings are cached, in their
//! own services.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::db::repositories::{CategoryRepository, NewsItemRepository, TagRepository};
use crate::models::{Category, ListParams, NewsFilter, NewsItem, PagedResult};

/// Compact category projection embedded in list entries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySummary {
    pub id: i64,
    pub name: String,
    pub name_en: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
}

impl From<&Category> for CategorySummary {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
            name_en: category.name_en.clone(),
            icon: category.icon.clone(),
            color: category.color.clone(),
        }
    }
}

/// News item enriched with its category and tag names
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItemView {
    #[serde(flatten)]
    pub item: NewsItem,
    pub category: Option<CategorySummary>,
    pub tags: Vec<String>,
}

/// News service for the public read surface
pub struct NewsService {
    news: Arc<dyn NewsItemRepository>,
    categories: Arc<dyn CategoryRepository>,
    tags: Arc<dyn TagRepository>,
}

impl NewsService {
    /// Create a new news service
    pub fn new(
        news: Arc<dyn NewsItemRepository>,
        categories: Arc<dyn CategoryRepository>,
        tags: Arc<dyn TagRepository>,
    ) -> Self {
        Self {
            news,
            categories,
            tags,
        }
    }

    /// List active news items, newest-priority first.
    ///
    /// A page beyond the last yields an empty `items` array with
    /// accurate totals rather than an error.
    pub async fn list(
        &self,
        filter: &NewsFilter,
        params: &ListParams,
    ) -> Result<PagedResult<NewsItemView>> {
        let page = self
            .news
            .list_active(filter, params)
            .await
            .context("Failed to list news items")?;

        let views = self.enrich(page.items).await?;
        Ok(PagedResult {
            items: views,
            total: page.total,
            page: page.page,
            per_page: page.per_page,
        })
    }

    /// Get an active item by slug, counting the view.
    ///
    /// Returns `None` for unknown slugs and for items that exist but are
    /// not currently visible (unpublished or expired). Each successful
    /// lookup increments the view counter by exactly one and the
    /// returned item reflects the incremented count.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<NewsItemView>> {
        let item = match self
            .news
            .get_by_slug(slug)
            .await
            .context("Failed to get news item by slug")?
        {
            Some(item) if item.is_active() => item,
            _ => return Ok(None),
        };

        self.news
            .increment_view_count(item.id)
            .await
            .context("Failed to increment view count")?;

        let mut item = item;
        item.view_count += 1;

        let mut views = self.enrich(vec![item]).await?;
        Ok(views.pop())
    }

    /// Attach category summaries and tag names to a batch of items
    async fn enrich(&self, items: Vec<NewsItem>) -> Result<Vec<NewsItemView>> {
        // One category lookup per distinct ID in the batch
        let mut category_cache: HashMap<i64, Option<CategorySummary>> = HashMap::new();

        let mut views = Vec::with_capacity(items.len());
        for item in items {
            let category = match category_cache.get(&item.category_id) {
                Some(cached) => cached.clone(),
                None => {
                    let summary = self
                        .categories
                        .get_by_id(item.category_id)
                        .await
                        .context("Failed to load category for news item")?
                        .map(|c| CategorySummary::from(&c));
                    category_cache.insert(item.category_id, summary.clone());
                    summary
                }
            };

            let tags = self
                .tags
                .get_for_item(item.id)
                .await
                .context("Failed to load tags for news item")?
                .into_iter()
                .map(|t| t.name)
                .collect();

            views.push(NewsItemView {
                item,
                category,
                tags,
            });
        }

        Ok(views)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{
        SqlxCategoryRepository, SqlxNewsItemRepository, SqlxTagRepository,
    };
    use crate::db::{create_test_pool, migrations, DynDatabasePool};
    use crate::models::{CreateCategoryInput, CreateNewsItemInput, CreateTagInput};

    async fn setup() -> (DynDatabasePool, NewsService, i64) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let categories = SqlxCategoryRepository::boxed(pool.clone());
        let category = categories
            .create(&CreateCategoryInput {
                name: "سياسة".to_string(),
                name_en: Some("Politics".to_string()),
                description: None,
                description_en: None,
                icon: Some("🏛️".to_string()),
                color: Some("#1f77b4".to_string()),
                display_order: 1,
            })
            .await
            .expect("Failed to create category");

        let service = NewsService::new(
            SqlxNewsItemRepository::boxed(pool.clone()),
            categories,
            SqlxTagRepository::boxed(pool.clone()),
        );

        (pool, service, category.id)
    }

    fn input(slug: &str, category_id: i64) -> CreateNewsItemInput {
        CreateNewsItemInput::new(
            format!("عنوان {}", slug),
            slug.to_string(),
            "ملخص".to_string(),
            "محتوى".to_string(),
            category_id,
        )
    }

    #[tokio::test]
    async fn test_list_enriches_with_category_and_tags() {
        let (pool, service, category_id) = setup().await;

        let news = SqlxNewsItemRepository::new(pool.clone());
        let item = news.create(&input("tagged-item", category_id)).await.unwrap();

        let tags = SqlxTagRepository::new(pool.clone());
        let tag = tags
            .create(&CreateTagInput {
                name: "عاجل".to_string(),
                name_en: Some("Breaking".to_string()),
                description: None,
                color: None,
            })
            .await
            .unwrap();
        tags.attach_to_item(tag.id, item.id).await.unwrap();

        let page = service
            .list(&NewsFilter::default(), &ListParams::default())
            .await
            .unwrap();

        assert_eq!(page.len(), 1);
        let view = &page.items[0];
        assert_eq!(view.item.slug, "tagged-item");
        let category = view.category.as_ref().expect("category missing");
        assert_eq!(category.name, "سياسة");
        assert_eq!(category.name_en.as_deref(), Some("Politics"));
        assert_eq!(view.tags, vec!["عاجل".to_string()]);
    }

    #[tokio::test]
    async fn test_get_by_slug_counts_each_view() {
        let (pool, service, category_id) = setup().await;

        let news = SqlxNewsItemRepository::new(pool.clone());
        news.create(&input("counted", category_id)).await.unwrap();

        let first = service
            .get_by_slug("counted")
            .await
            .unwrap()
            .expect("item not found");
        assert_eq!(first.item.view_count, 1);

        let second = service
            .get_by_slug("counted")
            .await
            .unwrap()
            .expect("item not found");
        assert_eq!(second.item.view_count, 2);
    }

    #[tokio::test]
    async fn test_get_by_slug_hides_inactive_items() {
        let (pool, service, category_id) = setup().await;

        let news = SqlxNewsItemRepository::new(pool.clone());
        let mut draft = input("hidden-draft", category_id);
        draft.status = Some(crate::models::NewsStatus::Draft);
        draft.is_published = false;
        news.create(&draft).await.unwrap();

        assert!(service.get_by_slug("hidden-draft").await.unwrap().is_none());
        assert!(service.get_by_slug("no-such-slug").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_inactive_lookup_does_not_count_views() {
        let (pool, service, category_id) = setup().await;

        let news = SqlxNewsItemRepository::new(pool.clone());
        let mut draft = input("silent-draft", category_id);
        draft.status = Some(crate::models::NewsStatus::Draft);
        draft.is_published = false;
        let created = news.create(&draft).await.unwrap();

        let _ = service.get_by_slug("silent-draft").await.unwrap();

        let reloaded = news.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(reloaded.view_count, 0);
    }

    #[tokio::test]
    async fn test_list_beyond_last_page_keeps_metadata() {
        let (pool, service, category_id) = setup().await;

        let news = SqlxNewsItemRepository::new(pool.clone());
        for i in 0..3 {
            news.create(&input(&format!("item-{}", i), category_id))
                .await
                .unwrap();
        }

        let page = service
            .list(&NewsFilter::default(), &ListParams::new(9, 10))
            .await
            .unwrap();

        assert!(page.is_empty());
        assert_eq!(page.total, 3);
        assert_eq!(page.total_pages(), 1);
    }

    #[tokio::test]
    async fn test_list_reflects_new_items_immediately() {
        let (pool, service, category_id) = setup().await;

        let news = SqlxNewsItemRepository::new(pool.clone());
        news.create(&input("first", category_id)).await.unwrap();

        let page = service
            .list(&NewsFilter::default(), &ListParams::default())
            .await
            .unwrap();
        assert_eq!(page.total, 1);

        news.create(&input("second", category_id)).await.unwrap();

        // No caching on the news surface: the next read sees the write
        let fresh = service
            .list(&NewsFilter::default(), &ListParams::default())
            .await
            .unwrap();
        assert_eq!(fresh.total, 2);
    }
}
