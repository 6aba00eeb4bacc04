//! Tag service
//!
//! Business logic for news tags: the public top-tags listing (cached)
//! and tag/item association for the seed loader.

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{Cache, CacheLayer};
use crate::db::repositories::TagRepository;
use crate::models::{CreateTagInput, Tag};

/// Default cache TTL for the top-tags listing (5 minutes)
const TAG_CACHE_TTL_SECS: u64 = 300;

/// Cache key for the top-tags listing
const CACHE_KEY_TOP_TAGS: &str = "tags:top";

/// Number of tags exposed by the public listing
const TOP_TAGS_LIMIT: usize = 20;

/// Tag service
pub struct TagService {
    repo: Arc<dyn TagRepository>,
    cache: Arc<Cache>,
    cache_ttl: Duration,
}

impl TagService {
    /// Create a new tag service
    pub fn new(repo: Arc<dyn TagRepository>, cache: Arc<Cache>) -> Self {
        Self {
            repo,
            cache,
            cache_ttl: Duration::from_secs(TAG_CACHE_TTL_SECS),
        }
    }

    /// Top active tags by usage, capped at 20. Cached; a failing cache
    /// never fails the request.
    pub async fn top_tags(&self) -> Result<Vec<Tag>> {
        match self.cache.get::<Vec<Tag>>(CACHE_KEY_TOP_TAGS).await {
            Ok(Some(cached)) => return Ok(cached),
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(error = %err, "Cache read failed for top tags");
            }
        }

        let tags = self
            .repo
            .list_top(TOP_TAGS_LIMIT)
            .await
            .context("Failed to list top tags")?;

        if let Err(err) = self
            .cache
            .set(CACHE_KEY_TOP_TAGS, &tags, self.cache_ttl)
            .await
        {
            tracing::warn!(error = %err, "Cache write failed for top tags");
        }

        Ok(tags)
    }

    /// Create a tag and drop the cached listing
    pub async fn create(&self, input: &CreateTagInput) -> Result<Tag> {
        let tag = self.repo.create(input).await.context("Failed to create tag")?;
        self.invalidate_cache().await;
        Ok(tag)
    }

    /// Look up a tag by its Arabic name
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Tag>> {
        self.repo
            .get_by_name(name)
            .await
            .context("Failed to get tag by name")
    }

    /// Attach a tag to a news item; a fresh association bumps the tag's
    /// usage counter, re-attaching is a no-op.
    pub async fn attach_to_item(&self, tag_id: i64, news_item_id: i64) -> Result<()> {
        self.repo
            .attach_to_item(tag_id, news_item_id)
            .await
            .context("Failed to attach tag to news item")?;
        self.invalidate_cache().await;
        Ok(())
    }

    /// Number of active tags
    pub async fn count(&self) -> Result<i64> {
        self.repo.count().await.context("Failed to count tags")
    }

    /// Drop the cached listing
    pub async fn invalidate_cache(&self) {
        if let Err(err) = self.cache.delete(CACHE_KEY_TOP_TAGS).await {
            tracing::warn!(error = %err, "Cache invalidation failed for top tags");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::create_cache;
    use crate::config::CacheConfig;
    use crate::db::repositories::SqlxTagRepository;
    use crate::db::{create_test_pool, migrations, DynDatabasePool};
    use crate::models::{CreateCategoryInput, CreateNewsItemInput};
    use crate::db::repositories::{CategoryRepository, NewsItemRepository};
    use crate::db::repositories::{SqlxCategoryRepository, SqlxNewsItemRepository};

    async fn setup() -> (DynDatabasePool, TagService) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let repo = SqlxTagRepository::boxed(pool.clone());
        let cache = create_cache(&CacheConfig::default())
            .await
            .expect("Failed to create cache");
        (pool.clone(), TagService::new(repo, cache))
    }

    fn input(name: &str) -> CreateTagInput {
        CreateTagInput {
            name: name.to_string(),
            name_en: None,
            description: None,
            color: None,
        }
    }

    async fn create_item(pool: &DynDatabasePool, slug: &str) -> i64 {
        let categories = SqlxCategoryRepository::new(pool.clone());
        let category = categories
            .create(&CreateCategoryInput {
                name: format!("تصنيف {}", slug),
                name_en: None,
                description: None,
                description_en: None,
                icon: None,
                color: None,
                display_order: 1,
            })
            .await
            .unwrap();

        let news = SqlxNewsItemRepository::new(pool.clone());
        news.create(&CreateNewsItemInput::new(
            format!("عنوان {}", slug),
            slug.to_string(),
            "ملخص".to_string(),
            "محتوى".to_string(),
            category.id,
        ))
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn test_top_tags_reflect_usage() {
        let (pool, service) = setup().await;

        let quiet = service.create(&input("هادئ")).await.unwrap();
        let busy = service.create(&input("مشغول")).await.unwrap();

        let item_a = create_item(&pool, "item-a").await;
        let item_b = create_item(&pool, "item-b").await;
        service.attach_to_item(busy.id, item_a).await.unwrap();
        service.attach_to_item(busy.id, item_b).await.unwrap();
        service.attach_to_item(quiet.id, item_a).await.unwrap();

        let tags = service.top_tags().await.unwrap();
        assert_eq!(tags[0].name, "مشغول");
        assert_eq!(tags[0].usage_count, 2);
        assert_eq!(tags[1].name, "هادئ");
    }

    #[tokio::test]
    async fn test_attach_invalidates_cached_listing() {
        let (pool, service) = setup().await;

        let tag = service.create(&input("وسم")).await.unwrap();
        let item = create_item(&pool, "cached-item").await;

        // Populate the cache with usage_count 0
        let before = service.top_tags().await.unwrap();
        assert_eq!(before[0].usage_count, 0);

        service.attach_to_item(tag.id, item).await.unwrap();

        let after = service.top_tags().await.unwrap();
        assert_eq!(after[0].usage_count, 1);
    }
}
