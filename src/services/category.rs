//! Category service
//!
//! Business logic for news categories. The public listing (active
//! categories with published-item counts) is cached; cache failures
//! degrade to direct database reads.

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{Cache, CacheLayer};
use crate::db::repositories::CategoryRepository;
use crate::models::{Category, CategoryWithCount, CreateCategoryInput};

/// Default cache TTL for the category listing (5 minutes)
const CATEGORY_CACHE_TTL_SECS: u64 = 300;

/// Cache key for the public category listing
const CACHE_KEY_CATEGORY_LIST: &str = "categories:list";

/// Category service
pub struct CategoryService {
    repo: Arc<dyn CategoryRepository>,
    cache: Arc<Cache>,
    cache_ttl: Duration,
}

impl CategoryService {
    /// Create a new category service
    pub fn new(repo: Arc<dyn CategoryRepository>, cache: Arc<Cache>) -> Self {
        Self {
            repo,
            cache,
            cache_ttl: Duration::from_secs(CATEGORY_CACHE_TTL_SECS),
        }
    }

    /// Active categories with their published news counts, ordered by
    /// display_order then ID. Cached; a failing cache never fails the
    /// request.
    pub async fn list_with_counts(&self) -> Result<Vec<CategoryWithCount>> {
        match self
            .cache
            .get::<Vec<CategoryWithCount>>(CACHE_KEY_CATEGORY_LIST)
            .await
        {
            Ok(Some(cached)) => return Ok(cached),
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(error = %err, "Cache read failed for category list");
            }
        }

        let categories = self
            .repo
            .list_active_with_counts()
            .await
            .context("Failed to list categories")?;

        if let Err(err) = self
            .cache
            .set(CACHE_KEY_CATEGORY_LIST, &categories, self.cache_ttl)
            .await
        {
            tracing::warn!(error = %err, "Cache write failed for category list");
        }

        Ok(categories)
    }

    /// Create a category and drop the cached listing
    pub async fn create(&self, input: &CreateCategoryInput) -> Result<Category> {
        let category = self
            .repo
            .create(input)
            .await
            .context("Failed to create category")?;
        self.invalidate_cache().await;
        Ok(category)
    }

    /// Look up a category by its Arabic name
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Category>> {
        self.repo
            .get_by_name(name)
            .await
            .context("Failed to get category by name")
    }

    /// Number of active categories
    pub async fn count(&self) -> Result<i64> {
        self.repo.count().await.context("Failed to count categories")
    }

    /// Drop the cached listing
    pub async fn invalidate_cache(&self) {
        if let Err(err) = self.cache.delete(CACHE_KEY_CATEGORY_LIST).await {
            tracing::warn!(error = %err, "Cache invalidation failed for category list");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::create_cache;
    use crate::config::CacheConfig;
    use crate::db::repositories::SqlxCategoryRepository;
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> CategoryService {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let repo = SqlxCategoryRepository::boxed(pool);
        let cache = create_cache(&CacheConfig::default())
            .await
            .expect("Failed to create cache");
        CategoryService::new(repo, cache)
    }

    fn input(name: &str, order: i32) -> CreateCategoryInput {
        CreateCategoryInput {
            name: name.to_string(),
            name_en: None,
            description: None,
            description_en: None,
            icon: None,
            color: None,
            display_order: order,
        }
    }

    #[tokio::test]
    async fn test_list_ordered_by_display_order() {
        let service = setup().await;

        service.create(&input("اقتصاد", 2)).await.unwrap();
        service.create(&input("سياسة", 1)).await.unwrap();

        let categories = service.list_with_counts().await.unwrap();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].category.name, "سياسة");
        assert_eq!(categories[1].category.name, "اقتصاد");
    }

    #[tokio::test]
    async fn test_create_invalidates_cached_listing() {
        let service = setup().await;

        service.create(&input("أولى", 1)).await.unwrap();
        let before = service.list_with_counts().await.unwrap();
        assert_eq!(before.len(), 1);

        service.create(&input("ثانية", 2)).await.unwrap();

        let after = service.list_with_counts().await.unwrap();
        assert_eq!(after.len(), 2);
    }

    #[tokio::test]
    async fn test_get_by_name() {
        let service = setup().await;

        service.create(&input("محليات", 1)).await.unwrap();

        let found = service.get_by_name("محليات").await.unwrap();
        assert!(found.is_some());
        assert!(service.get_by_name("غير موجود").await.unwrap().is_none());
    }
}
