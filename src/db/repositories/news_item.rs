//! News item repository
//!
//! Database operations for news items.
//!
//! This module provides:
//! - `NewsItemRepository` trait defining the interface for news data access
//! - `SqlxNewsItemRepository` implementing the trait for SQLite and MySQL
//!
//! Public listings only return active items: published and not
//! expired. Ordering is priority first, then publication time, with
//! the item ID as a stable tiebreaker.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{CreateNewsItemInput, ListParams, NewsFilter, NewsItem, NewsStatus, PagedResult};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// News item repository trait
#[async_trait]
pub trait NewsItemRepository: Send + Sync {
    /// Create a new news item
    async fn create(&self, input: &CreateNewsItemInput) -> Result<NewsItem>;

    /// Get news item by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<NewsItem>>;

    /// Get news item by slug, regardless of publication state
    async fn get_by_slug(&self, slug: &str) -> Result<Option<NewsItem>>;

    /// List active news items with filters and pagination.
    ///
    /// A page past the end of the result set returns an empty page with
    /// an accurate total.
    async fn list_active(
        &self,
        filter: &NewsFilter,
        params: &ListParams,
    ) -> Result<PagedResult<NewsItem>>;

    /// Increment the view counter by one
    async fn increment_view_count(&self, id: i64) -> Result<()>;

    /// Adjust the approved comment counter by a signed delta
    async fn adjust_comment_count(&self, id: i64, delta: i64) -> Result<()>;

    /// Count published news items
    async fn count(&self) -> Result<i64>;

    /// Sum of view counters across published items
    async fn total_views(&self) -> Result<i64>;
}

/// SQLx-based news item repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxNewsItemRepository {
    pool: DynDatabasePool,
}

impl SqlxNewsItemRepository {
    /// Create a new SQLx news item repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn NewsItemRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl NewsItemRepository for SqlxNewsItemRepository {
    async fn create(&self, input: &CreateNewsItemInput) -> Result<NewsItem> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                create_item_sqlite(self.pool.as_sqlite().unwrap(), input).await
            }
            DatabaseDriver::Mysql => create_item_mysql(self.pool.as_mysql().unwrap(), input).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<NewsItem>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_item_by_id_sqlite(self.pool.as_sqlite().unwrap(), id).await
            }
            DatabaseDriver::Mysql => get_item_by_id_mysql(self.pool.as_mysql().unwrap(), id).await,
        }
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<NewsItem>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_item_by_slug_sqlite(self.pool.as_sqlite().unwrap(), slug).await
            }
            DatabaseDriver::Mysql => {
                get_item_by_slug_mysql(self.pool.as_mysql().unwrap(), slug).await
            }
        }
    }

    async fn list_active(
        &self,
        filter: &NewsFilter,
        params: &ListParams,
    ) -> Result<PagedResult<NewsItem>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                list_active_sqlite(self.pool.as_sqlite().unwrap(), filter, params).await
            }
            DatabaseDriver::Mysql => {
                list_active_mysql(self.pool.as_mysql().unwrap(), filter, params).await
            }
        }
    }

    async fn increment_view_count(&self, id: i64) -> Result<()> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                increment_view_count_sqlite(self.pool.as_sqlite().unwrap(), id).await
            }
            DatabaseDriver::Mysql => {
                increment_view_count_mysql(self.pool.as_mysql().unwrap(), id).await
            }
        }
    }

    async fn adjust_comment_count(&self, id: i64, delta: i64) -> Result<()> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                adjust_comment_count_sqlite(self.pool.as_sqlite().unwrap(), id, delta).await
            }
            DatabaseDriver::Mysql => {
                adjust_comment_count_mysql(self.pool.as_mysql().unwrap(), id, delta).await
            }
        }
    }

    async fn count(&self) -> Result<i64> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => count_items_sqlite(self.pool.as_sqlite().unwrap()).await,
            DatabaseDriver::Mysql => count_items_mysql(self.pool.as_mysql().unwrap()).await,
        }
    }

    async fn total_views(&self) -> Result<i64> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => total_views_sqlite(self.pool.as_sqlite().unwrap()).await,
            DatabaseDriver::Mysql => total_views_mysql(self.pool.as_mysql().unwrap()).await,
        }
    }
}

const ITEM_COLUMNS: &str = "n.id, n.title, n.title_en, n.slug, n.summary, n.summary_en, \
     n.content, n.content_en, n.featured_image, n.featured_image_alt, n.gallery_images, \
     n.category_id, n.status, n.is_published, n.is_featured, n.is_breaking, n.priority, \
     n.published_at, n.expires_at, n.created_at, n.updated_at, \
     n.author_id, n.author_name, n.editor_id, \
     n.view_count, n.like_count, n.share_count, n.comment_count, \
     n.meta_title, n.meta_description, n.meta_keywords";

const INSERT_SQL: &str = "\
    INSERT INTO news_items \
        (title, title_en, slug, summary, summary_en, content, content_en, \
         gallery_images, category_id, status, is_published, is_featured, is_breaking, \
         priority, published_at, expires_at, created_at, updated_at, author_name, \
         view_count, like_count, share_count, comment_count, meta_title, meta_description) \
    VALUES (?, ?, ?, ?, ?, ?, ?, '[]', ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?)";

/// Build the WHERE clause for an active-items list query.
///
/// The fragment expects one timestamp bind (the current time, for the
/// expiry check) followed by the optional filter binds in declaration
/// order.
fn active_where_clause(filter: &NewsFilter) -> String {
    let mut clause = String::from(
        "n.is_published = 1 \
         AND (n.expires_at IS NULL OR n.expires_at > ?)",
    );

    if filter.category.is_some() {
        clause.push_str(
            " AND EXISTS (SELECT 1 FROM news_categories c \
             WHERE c.id = n.category_id AND c.name = ?)",
        );
    }
    if filter.tag.is_some() {
        clause.push_str(
            " AND EXISTS (SELECT 1 FROM news_item_tags nt \
             INNER JOIN news_tags t ON t.id = nt.tag_id \
             WHERE nt.news_item_id = n.id AND t.name = ?)",
        );
    }
    if filter.featured.is_some() {
        clause.push_str(" AND n.is_featured = ?");
    }
    if filter.breaking.is_some() {
        clause.push_str(" AND n.is_breaking = ?");
    }

    clause
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_item_sqlite(pool: &SqlitePool, input: &CreateNewsItemInput) -> Result<NewsItem> {
    let now = Utc::now();
    let status = input.status.unwrap_or(NewsStatus::Published);

    let result = sqlx::query(INSERT_SQL)
        .bind(&input.title)
        .bind(&input.title_en)
        .bind(&input.slug)
        .bind(&input.summary)
        .bind(&input.summary_en)
        .bind(&input.content)
        .bind(&input.content_en)
        .bind(input.category_id)
        .bind(status.as_str())
        .bind(input.is_published)
        .bind(input.is_featured)
        .bind(input.is_breaking)
        .bind(input.priority)
        .bind(input.published_at)
        .bind(input.expires_at)
        .bind(now)
        .bind(now)
        .bind(&input.author_name)
        .bind(input.view_count)
        .bind(input.like_count)
        .bind(input.share_count)
        .bind(&input.meta_title)
        .bind(&input.meta_description)
        .execute(pool)
        .await
        .context("Failed to create news item")?;

    let id = result.last_insert_rowid();

    get_item_by_id_sqlite(pool, id)
        .await?
        .context("Created news item not found")
}

async fn get_item_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<NewsItem>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM news_items n WHERE n.id = ?",
        ITEM_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get news item by ID")?;

    match row {
        Some(row) => Ok(Some(row_to_item_sqlite(&row)?)),
        None => Ok(None),
    }
}

async fn get_item_by_slug_sqlite(pool: &SqlitePool, slug: &str) -> Result<Option<NewsItem>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM news_items n WHERE n.slug = ?",
        ITEM_COLUMNS
    ))
    .bind(slug)
    .fetch_optional(pool)
    .await
    .context("Failed to get news item by slug")?;

    match row {
        Some(row) => Ok(Some(row_to_item_sqlite(&row)?)),
        None => Ok(None),
    }
}

async fn list_active_sqlite(
    pool: &SqlitePool,
    filter: &NewsFilter,
    params: &ListParams,
) -> Result<PagedResult<NewsItem>> {
    let now = Utc::now();
    let where_clause = active_where_clause(filter);

    let count_sql = format!(
        "SELECT COUNT(*) as count FROM news_items n WHERE {}",
        where_clause
    );
    let mut count_query = sqlx::query(&count_sql).bind(now);
    count_query = bind_filter_sqlite(count_query, filter);
    let total: i64 = count_query
        .fetch_one(pool)
        .await
        .context("Failed to count news items")?
        .get("count");

    let list_sql = format!(
        "SELECT {} FROM news_items n WHERE {} \
         ORDER BY n.priority DESC, n.published_at DESC, n.id ASC \
         LIMIT ? OFFSET ?",
        ITEM_COLUMNS, where_clause
    );
    let mut list_query = sqlx::query(&list_sql).bind(now);
    list_query = bind_filter_sqlite(list_query, filter);
    let rows = list_query
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(pool)
        .await
        .context("Failed to list news items")?;

    let mut items = Vec::new();
    for row in rows {
        items.push(row_to_item_sqlite(&row)?);
    }

    Ok(PagedResult::new(items, total, params))
}

type SqliteQuery<'q> = sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>;

fn bind_filter_sqlite<'q>(mut query: SqliteQuery<'q>, filter: &'q NewsFilter) -> SqliteQuery<'q> {
    if let Some(category) = &filter.category {
        query = query.bind(category);
    }
    if let Some(tag) = &filter.tag {
        query = query.bind(tag);
    }
    if let Some(featured) = filter.featured {
        query = query.bind(featured);
    }
    if let Some(breaking) = filter.breaking {
        query = query.bind(breaking);
    }
    query
}

async fn increment_view_count_sqlite(pool: &SqlitePool, id: i64) -> Result<()> {
    sqlx::query("UPDATE news_items SET view_count = view_count + 1 WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to increment view count")?;
    Ok(())
}

async fn adjust_comment_count_sqlite(pool: &SqlitePool, id: i64, delta: i64) -> Result<()> {
    sqlx::query("UPDATE news_items SET comment_count = MAX(comment_count + ?, 0) WHERE id = ?")
        .bind(delta)
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to adjust comment count")?;
    Ok(())
}

async fn count_items_sqlite(pool: &SqlitePool) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM news_items WHERE is_published = 1")
        .fetch_one(pool)
        .await
        .context("Failed to count news items")?;
    Ok(row.get("count"))
}

async fn total_views_sqlite(pool: &SqlitePool) -> Result<i64> {
    let row = sqlx::query(
        "SELECT COALESCE(SUM(view_count), 0) as total FROM news_items WHERE is_published = 1",
    )
    .fetch_one(pool)
    .await
    .context("Failed to sum view counts")?;
    Ok(row.get("total"))
}

fn row_to_item_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<NewsItem> {
    let status_str: String = row.get("status");
    let gallery_raw: String = row.get("gallery_images");

    Ok(NewsItem {
        id: row.get("id"),
        title: row.get("title"),
        title_en: row.get("title_en"),
        slug: row.get("slug"),
        summary: row.get("summary"),
        summary_en: row.get("summary_en"),
        content: row.get("content"),
        content_en: row.get("content_en"),
        featured_image: row.get("featured_image"),
        featured_image_alt: row.get("featured_image_alt"),
        gallery_images: serde_json::from_str(&gallery_raw)
            .unwrap_or_else(|_| serde_json::json!([])),
        category_id: row.get("category_id"),
        status: NewsStatus::from_str(&status_str).unwrap_or(NewsStatus::Draft),
        is_published: row.get("is_published"),
        is_featured: row.get("is_featured"),
        is_breaking: row.get("is_breaking"),
        priority: row.get("priority"),
        published_at: row.get("published_at"),
        expires_at: row.get("expires_at"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        author_id: row.get("author_id"),
        author_name: row.get("author_name"),
        editor_id: row.get("editor_id"),
        view_count: row.get("view_count"),
        like_count: row.get("like_count"),
        share_count: row.get("share_count"),
        comment_count: row.get("comment_count"),
        meta_title: row.get("meta_title"),
        meta_description: row.get("meta_description"),
        meta_keywords: row.get("meta_keywords"),
    })
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_item_mysql(pool: &MySqlPool, input: &CreateNewsItemInput) -> Result<NewsItem> {
    let now = Utc::now();
    let status = input.status.unwrap_or(NewsStatus::Published);

    let result = sqlx::query(INSERT_SQL)
        .bind(&input.title)
        .bind(&input.title_en)
        .bind(&input.slug)
        .bind(&input.summary)
        .bind(&input.summary_en)
        .bind(&input.content)
        .bind(&input.content_en)
        .bind(input.category_id)
        .bind(status.as_str())
        .bind(input.is_published)
        .bind(input.is_featured)
        .bind(input.is_breaking)
        .bind(input.priority)
        .bind(input.published_at)
        .bind(input.expires_at)
        .bind(now)
        .bind(now)
        .bind(&input.author_name)
        .bind(input.view_count)
        .bind(input.like_count)
        .bind(input.share_count)
        .bind(&input.meta_title)
        .bind(&input.meta_description)
        .execute(pool)
        .await
        .context("Failed to create news item")?;

    let id = result.last_insert_id() as i64;

    get_item_by_id_mysql(pool, id)
        .await?
        .context("Created news item not found")
}

async fn get_item_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<NewsItem>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM news_items n WHERE n.id = ?",
        ITEM_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get news item by ID")?;

    match row {
        Some(row) => Ok(Some(row_to_item_mysql(&row)?)),
        None => Ok(None),
    }
}

async fn get_item_by_slug_mysql(pool: &MySqlPool, slug: &str) -> Result<Option<NewsItem>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM news_items n WHERE n.slug = ?",
        ITEM_COLUMNS
    ))
    .bind(slug)
    .fetch_optional(pool)
    .await
    .context("Failed to get news item by slug")?;

    match row {
        Some(row) => Ok(Some(row_to_item_mysql(&row)?)),
        None => Ok(None),
    }
}

async fn list_active_mysql(
    pool: &MySqlPool,
    filter: &NewsFilter,
    params: &ListParams,
) -> Result<PagedResult<NewsItem>> {
    let now = Utc::now();
    let where_clause = active_where_clause(filter);

    let count_sql = format!(
        "SELECT COUNT(*) as count FROM news_items n WHERE {}",
        where_clause
    );
    let mut count_query = sqlx::query(&count_sql).bind(now);
    count_query = bind_filter_mysql(count_query, filter);
    let total: i64 = count_query
        .fetch_one(pool)
        .await
        .context("Failed to count news items")?
        .get("count");

    let list_sql = format!(
        "SELECT {} FROM news_items n WHERE {} \
         ORDER BY n.priority DESC, n.published_at DESC, n.id ASC \
         LIMIT ? OFFSET ?",
        ITEM_COLUMNS, where_clause
    );
    let mut list_query = sqlx::query(&list_sql).bind(now);
    list_query = bind_filter_mysql(list_query, filter);
    let rows = list_query
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(pool)
        .await
        .context("Failed to list news items")?;

    let mut items = Vec::new();
    for row in rows {
        items.push(row_to_item_mysql(&row)?);
    }

    Ok(PagedResult::new(items, total, params))
}

type MysqlQuery<'q> = sqlx::query::Query<'q, sqlx::MySql, sqlx::mysql::MySqlArguments>;

fn bind_filter_mysql<'q>(mut query: MysqlQuery<'q>, filter: &'q NewsFilter) -> MysqlQuery<'q> {
    if let Some(category) = &filter.category {
        query = query.bind(category);
    }
    if let Some(tag) = &filter.tag {
        query = query.bind(tag);
    }
    if let Some(featured) = filter.featured {
        query = query.bind(featured);
    }
    if let Some(breaking) = filter.breaking {
        query = query.bind(breaking);
    }
    query
}

async fn increment_view_count_mysql(pool: &MySqlPool, id: i64) -> Result<()> {
    sqlx::query("UPDATE news_items SET view_count = view_count + 1 WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to increment view count")?;
    Ok(())
}

async fn adjust_comment_count_mysql(pool: &MySqlPool, id: i64, delta: i64) -> Result<()> {
    sqlx::query("UPDATE news_items SET comment_count = GREATEST(comment_count + ?, 0) WHERE id = ?")
        .bind(delta)
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to adjust comment count")?;
    Ok(())
}

async fn count_items_mysql(pool: &MySqlPool) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM news_items WHERE is_published = 1")
        .fetch_one(pool)
        .await
        .context("Failed to count news items")?;
    Ok(row.get("count"))
}

async fn total_views_mysql(pool: &MySqlPool) -> Result<i64> {
    let row = sqlx::query(
        "SELECT COALESCE(SUM(view_count), 0) as total FROM news_items WHERE is_published = 1",
    )
    .fetch_one(pool)
    .await
    .context("Failed to sum view counts")?;
    Ok(row.get("total"))
}

fn row_to_item_mysql(row: &sqlx::mysql::MySqlRow) -> Result<NewsItem> {
    let status_str: String = row.get("status");
    let gallery_raw: String = row.get("gallery_images");

    Ok(NewsItem {
        id: row.get("id"),
        title: row.get("title"),
        title_en: row.get("title_en"),
        slug: row.get("slug"),
        summary: row.get("summary"),
        summary_en: row.get("summary_en"),
        content: row.get("content"),
        content_en: row.get("content_en"),
        featured_image: row.get("featured_image"),
        featured_image_alt: row.get("featured_image_alt"),
        gallery_images: serde_json::from_str(&gallery_raw)
            .unwrap_or_else(|_| serde_json::json!([])),
        category_id: row.get("category_id"),
        status: NewsStatus::from_str(&status_str).unwrap_or(NewsStatus::Draft),
        is_published: row.get("is_published"),
        is_featured: row.get("is_featured"),
        is_breaking: row.get("is_breaking"),
        priority: row.get("priority"),
        published_at: row.get("published_at"),
        expires_at: row.get("expires_at"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        author_id: row.get("author_id"),
        author_name: row.get("author_name"),
        editor_id: row.get("editor_id"),
        view_count: row.get("view_count"),
        like_count: row.get("like_count"),
        share_count: row.get("share_count"),
        comment_count: row.get("comment_count"),
        meta_title: row.get("meta_title"),
        meta_description: row.get("meta_description"),
        meta_keywords: row.get("meta_keywords"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};
    use crate::db::repositories::{CategoryRepository, SqlxCategoryRepository, SqlxTagRepository, TagRepository};
    use crate::models::{CreateCategoryInput, CreateTagInput};
    use chrono::Duration;

    async fn setup() -> (DynDatabasePool, SqlxNewsItemRepository, i64) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let categories = SqlxCategoryRepository::new(pool.clone());
        let category = categories
            .create(&CreateCategoryInput {
                name: "أخبار عامة".to_string(),
                name_en: Some("General News".to_string()),
                description: None,
                description_en: None,
                icon: None,
                color: None,
                display_order: 1,
            })
            .await
            .expect("Failed to create category");

        let repo = SqlxNewsItemRepository::new(pool.clone());
        (pool, repo, category.id)
    }

    fn published_input(slug: &str, category_id: i64) -> CreateNewsItemInput {
        CreateNewsItemInput::new(
            format!("عنوان {}", slug),
            slug.to_string(),
            "ملخص".to_string(),
            "محتوى".to_string(),
            category_id,
        )
    }

    #[tokio::test]
    async fn test_create_and_get_by_slug() {
        let (_pool, repo, category_id) = setup().await;

        let created = repo
            .create(&published_input("first-item", category_id))
            .await
            .expect("Failed to create item");

        assert!(created.id > 0);
        assert_eq!(created.slug, "first-item");
        assert_eq!(created.view_count, 0);
        assert_eq!(created.comment_count, 0);
        assert!(created.is_active());

        let found = repo
            .get_by_slug("first-item")
            .await
            .expect("Failed to get item")
            .expect("Item not found");
        assert_eq!(found.id, created.id);
    }

    #[tokio::test]
    async fn test_get_by_slug_not_found() {
        let (_pool, repo, _category_id) = setup().await;

        let found = repo.get_by_slug("missing").await.expect("Failed to query");
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_list_orders_by_priority_then_date_then_id() {
        let (_pool, repo, category_id) = setup().await;
        let now = Utc::now();

        repo.create(
            &published_input("low-priority", category_id)
                .with_priority(1)
                .with_published_at(now - Duration::hours(1)),
        )
        .await
        .unwrap();
        repo.create(
            &published_input("high-priority-old", category_id)
                .with_priority(10)
                .with_published_at(now - Duration::hours(5)),
        )
        .await
        .unwrap();
        repo.create(
            &published_input("high-priority-new", category_id)
                .with_priority(10)
                .with_published_at(now - Duration::hours(2)),
        )
        .await
        .unwrap();

        let page = repo
            .list_active(&NewsFilter::default(), &ListParams::default())
            .await
            .unwrap();

        assert_eq!(page.total, 3);
        assert_eq!(page.items[0].slug, "high-priority-new");
        assert_eq!(page.items[1].slug, "high-priority-old");
        assert_eq!(page.items[2].slug, "low-priority");
    }

    #[tokio::test]
    async fn test_list_ties_broken_by_id() {
        let (_pool, repo, category_id) = setup().await;
        let published_at = Utc::now() - Duration::hours(1);

        let first = repo
            .create(&published_input("tie-a", category_id).with_published_at(published_at))
            .await
            .unwrap();
        let second = repo
            .create(&published_input("tie-b", category_id).with_published_at(published_at))
            .await
            .unwrap();

        let page = repo
            .list_active(&NewsFilter::default(), &ListParams::default())
            .await
            .unwrap();

        assert_eq!(page.items[0].id, first.id);
        assert_eq!(page.items[1].id, second.id);
    }

    #[tokio::test]
    async fn test_list_excludes_inactive_items() {
        let (_pool, repo, category_id) = setup().await;
        let now = Utc::now();

        // Active
        repo.create(&published_input("active", category_id)).await.unwrap();

        // Unpublished
        let mut draft = published_input("draft", category_id);
        draft.status = Some(NewsStatus::Draft);
        draft.is_published = false;
        repo.create(&draft).await.unwrap();

        // Expired
        let mut expired = published_input("expired", category_id);
        expired.published_at = Some(now - Duration::days(2));
        expired.expires_at = Some(now - Duration::hours(1));
        repo.create(&expired).await.unwrap();

        let page = repo
            .list_active(&NewsFilter::default(), &ListParams::default())
            .await
            .unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].slug, "active");
    }

    #[tokio::test]
    async fn test_list_serves_published_items_with_odd_publication_times() {
        // published_at does not gate visibility; only is_published and
        // expiry do
        let (_pool, repo, category_id) = setup().await;
        let now = Utc::now();

        repo.create(
            &published_input("future-dated", category_id)
                .with_published_at(now + Duration::hours(2)),
        )
        .await
        .unwrap();

        let mut undated = published_input("undated", category_id);
        undated.published_at = None;
        repo.create(&undated).await.unwrap();

        let page = repo
            .list_active(&NewsFilter::default(), &ListParams::default())
            .await
            .unwrap();

        assert_eq!(page.total, 2);
    }

    #[tokio::test]
    async fn test_list_filter_by_category() {
        let (pool, repo, category_id) = setup().await;

        let categories = SqlxCategoryRepository::new(pool.clone());
        let other = categories
            .create(&CreateCategoryInput {
                name: "اقتصاد".to_string(),
                name_en: None,
                description: None,
                description_en: None,
                icon: None,
                color: None,
                display_order: 2,
            })
            .await
            .unwrap();

        repo.create(&published_input("in-first", category_id)).await.unwrap();
        repo.create(&published_input("in-other", other.id)).await.unwrap();

        let filter = NewsFilter {
            category: Some("اقتصاد".to_string()),
            ..Default::default()
        };
        let page = repo.list_active(&filter, &ListParams::default()).await.unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].slug, "in-other");
    }

    #[tokio::test]
    async fn test_list_filter_by_unknown_category_is_empty() {
        let (_pool, repo, category_id) = setup().await;

        repo.create(&published_input("some-item", category_id)).await.unwrap();

        let filter = NewsFilter {
            category: Some("لا وجود لها".to_string()),
            ..Default::default()
        };
        let page = repo.list_active(&filter, &ListParams::default()).await.unwrap();

        assert_eq!(page.total, 0);
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn test_list_filter_by_tag() {
        let (pool, repo, category_id) = setup().await;

        let tags = SqlxTagRepository::new(pool.clone());
        let tag = tags
            .create(&CreateTagInput {
                name: "عاجل".to_string(),
                name_en: None,
                description: None,
                color: None,
            })
            .await
            .unwrap();

        let tagged = repo.create(&published_input("tagged", category_id)).await.unwrap();
        repo.create(&published_input("untagged", category_id)).await.unwrap();
        tags.attach_to_item(tag.id, tagged.id).await.unwrap();

        let filter = NewsFilter {
            tag: Some("عاجل".to_string()),
            ..Default::default()
        };
        let page = repo.list_active(&filter, &ListParams::default()).await.unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].slug, "tagged");
    }

    #[tokio::test]
    async fn test_list_filter_featured_and_breaking() {
        let (_pool, repo, category_id) = setup().await;

        repo.create(&published_input("plain", category_id)).await.unwrap();
        repo.create(&published_input("featured", category_id).with_featured(true))
            .await
            .unwrap();
        repo.create(
            &published_input("breaking", category_id)
                .with_breaking(true)
                .with_priority(10),
        )
        .await
        .unwrap();

        let featured = repo
            .list_active(
                &NewsFilter {
                    featured: Some(true),
                    ..Default::default()
                },
                &ListParams::default(),
            )
            .await
            .unwrap();
        assert_eq!(featured.total, 1);
        assert_eq!(featured.items[0].slug, "featured");

        let breaking = repo
            .list_active(
                &NewsFilter {
                    breaking: Some(true),
                    ..Default::default()
                },
                &ListParams::default(),
            )
            .await
            .unwrap();
        assert_eq!(breaking.total, 1);
        assert_eq!(breaking.items[0].slug, "breaking");
    }

    #[tokio::test]
    async fn test_list_pagination() {
        let (_pool, repo, category_id) = setup().await;
        let now = Utc::now();

        for i in 0..5 {
            repo.create(
                &published_input(&format!("item-{}", i), category_id)
                    .with_published_at(now - Duration::minutes(i)),
            )
            .await
            .unwrap();
        }

        let page1 = repo
            .list_active(&NewsFilter::default(), &ListParams::new(1, 2))
            .await
            .unwrap();
        assert_eq!(page1.total, 5);
        assert_eq!(page1.len(), 2);
        assert_eq!(page1.total_pages(), 3);
        assert!(page1.has_next());
        assert!(!page1.has_prev());

        let page3 = repo
            .list_active(&NewsFilter::default(), &ListParams::new(3, 2))
            .await
            .unwrap();
        assert_eq!(page3.len(), 1);
        assert!(!page3.has_next());
    }

    #[tokio::test]
    async fn test_list_beyond_last_page_is_empty_with_total() {
        let (_pool, repo, category_id) = setup().await;

        repo.create(&published_input("only-item", category_id)).await.unwrap();

        let page = repo
            .list_active(&NewsFilter::default(), &ListParams::new(99, 10))
            .await
            .unwrap();

        assert!(page.is_empty());
        assert_eq!(page.total, 1);
        assert_eq!(page.total_pages(), 1);
        assert!(!page.has_next());
        assert!(page.has_prev());
    }

    #[tokio::test]
    async fn test_increment_view_count() {
        let (_pool, repo, category_id) = setup().await;
        let item = repo.create(&published_input("viewed", category_id)).await.unwrap();

        repo.increment_view_count(item.id).await.unwrap();
        repo.increment_view_count(item.id).await.unwrap();

        let found = repo.get_by_id(item.id).await.unwrap().unwrap();
        assert_eq!(found.view_count, 2);
    }

    #[tokio::test]
    async fn test_adjust_comment_count() {
        let (_pool, repo, category_id) = setup().await;
        let item = repo.create(&published_input("commented", category_id)).await.unwrap();

        repo.adjust_comment_count(item.id, 1).await.unwrap();
        repo.adjust_comment_count(item.id, 1).await.unwrap();
        repo.adjust_comment_count(item.id, -1).await.unwrap();

        let found = repo.get_by_id(item.id).await.unwrap().unwrap();
        assert_eq!(found.comment_count, 1);

        // Never goes below zero
        repo.adjust_comment_count(item.id, -5).await.unwrap();
        let found = repo.get_by_id(item.id).await.unwrap().unwrap();
        assert_eq!(found.comment_count, 0);
    }

    #[tokio::test]
    async fn test_count_and_total_views() {
        let (_pool, repo, category_id) = setup().await;

        assert_eq!(repo.count().await.unwrap(), 0);
        assert_eq!(repo.total_views().await.unwrap(), 0);

        let mut input = published_input("popular", category_id);
        input.view_count = 100;
        repo.create(&input).await.unwrap();

        let mut input = published_input("less-popular", category_id);
        input.view_count = 20;
        repo.create(&input).await.unwrap();

        // Drafts stay out of the published totals
        let mut input = published_input("draft-item", category_id);
        input.status = Some(NewsStatus::Draft);
        input.is_published = false;
        input.view_count = 999;
        repo.create(&input).await.unwrap();

        assert_eq!(repo.count().await.unwrap(), 2);
        assert_eq!(repo.total_views().await.unwrap(), 120);
    }
}
