//! Tag repository
//!
//! Database operations for news tags.
//!
//! This module provides:
//! - `TagRepository` trait defining the interface for tag data access
//! - `SqlxTagRepository` implementing the trait for SQLite and MySQL
//!
//! Attaching a tag to a news item bumps the tag's `usage_count`. The
//! counter records lifetime usage and is never decremented.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{CreateTagInput, Tag};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Tag repository trait
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Create a new tag
    async fn create(&self, input: &CreateTagInput) -> Result<Tag>;

    /// Get tag by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Tag>>;

    /// Get tag by name
    async fn get_by_name(&self, name: &str) -> Result<Option<Tag>>;

    /// Get the most used active tags, ordered by usage_count descending
    async fn list_top(&self, limit: usize) -> Result<Vec<Tag>>;

    /// Associate a tag with a news item.
    ///
    /// Increments the tag's usage_count when a new association is
    /// created; re-attaching an already attached tag is a no-op.
    async fn attach_to_item(&self, tag_id: i64, news_item_id: i64) -> Result<()>;

    /// Get tags attached to a news item
    async fn get_for_item(&self, news_item_id: i64) -> Result<Vec<Tag>>;

    /// Count active tags
    async fn count(&self) -> Result<i64>;
}

/// SQLx-based tag repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxTagRepository {
    pool: DynDatabasePool,
}

impl SqlxTagRepository {
    /// Create a new SQLx tag repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn TagRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl TagRepository for SqlxTagRepository {
    async fn create(&self, input: &CreateTagInput) -> Result<Tag> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                create_tag_sqlite(self.pool.as_sqlite().unwrap(), input).await
            }
            DatabaseDriver::Mysql => create_tag_mysql(self.pool.as_mysql().unwrap(), input).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Tag>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_tag_by_id_sqlite(self.pool.as_sqlite().unwrap(), id).await
            }
            DatabaseDriver::Mysql => get_tag_by_id_mysql(self.pool.as_mysql().unwrap(), id).await,
        }
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Tag>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_tag_by_name_sqlite(self.pool.as_sqlite().unwrap(), name).await
            }
            DatabaseDriver::Mysql => {
                get_tag_by_name_mysql(self.pool.as_mysql().unwrap(), name).await
            }
        }
    }

    async fn list_top(&self, limit: usize) -> Result<Vec<Tag>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                list_top_tags_sqlite(self.pool.as_sqlite().unwrap(), limit).await
            }
            DatabaseDriver::Mysql => {
                list_top_tags_mysql(self.pool.as_mysql().unwrap(), limit).await
            }
        }
    }

    async fn attach_to_item(&self, tag_id: i64, news_item_id: i64) -> Result<()> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                attach_tag_sqlite(self.pool.as_sqlite().unwrap(), tag_id, news_item_id).await
            }
            DatabaseDriver::Mysql => {
                attach_tag_mysql(self.pool.as_mysql().unwrap(), tag_id, news_item_id).await
            }
        }
    }

    async fn get_for_item(&self, news_item_id: i64) -> Result<Vec<Tag>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_tags_for_item_sqlite(self.pool.as_sqlite().unwrap(), news_item_id).await
            }
            DatabaseDriver::Mysql => {
                get_tags_for_item_mysql(self.pool.as_mysql().unwrap(), news_item_id).await
            }
        }
    }

    async fn count(&self) -> Result<i64> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => count_tags_sqlite(self.pool.as_sqlite().unwrap()).await,
            DatabaseDriver::Mysql => count_tags_mysql(self.pool.as_mysql().unwrap()).await,
        }
    }
}

const TAG_COLUMNS: &str = "id, name, name_en, description, color, usage_count, is_active, created_at";

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_tag_sqlite(pool: &SqlitePool, input: &CreateTagInput) -> Result<Tag> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO news_tags (name, name_en, description, color, usage_count, is_active, created_at)
        VALUES (?, ?, ?, ?, 0, 1, ?)
        "#,
    )
    .bind(&input.name)
    .bind(&input.name_en)
    .bind(&input.description)
    .bind(&input.color)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create tag")?;

    let id = result.last_insert_rowid();

    Ok(Tag {
        id,
        name: input.name.clone(),
        name_en: input.name_en.clone(),
        description: input.description.clone(),
        color: input.color.clone(),
        usage_count: 0,
        is_active: true,
        created_at: now,
    })
}

async fn get_tag_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Tag>> {
    let row = sqlx::query(&format!("SELECT {} FROM news_tags WHERE id = ?", TAG_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get tag by ID")?;

    match row {
        Some(row) => Ok(Some(row_to_tag_sqlite(&row)?)),
        None => Ok(None),
    }
}

async fn get_tag_by_name_sqlite(pool: &SqlitePool, name: &str) -> Result<Option<Tag>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM news_tags WHERE name = ?",
        TAG_COLUMNS
    ))
    .bind(name)
    .fetch_optional(pool)
    .await
    .context("Failed to get tag by name")?;

    match row {
        Some(row) => Ok(Some(row_to_tag_sqlite(&row)?)),
        None => Ok(None),
    }
}

async fn list_top_tags_sqlite(pool: &SqlitePool, limit: usize) -> Result<Vec<Tag>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM news_tags WHERE is_active = 1 \
         ORDER BY usage_count DESC, id ASC LIMIT ?",
        TAG_COLUMNS
    ))
    .bind(limit as i64)
    .fetch_all(pool)
    .await
    .context("Failed to list top tags")?;

    let mut tags = Vec::new();
    for row in rows {
        tags.push(row_to_tag_sqlite(&row)?);
    }
    Ok(tags)
}

async fn attach_tag_sqlite(pool: &SqlitePool, tag_id: i64, news_item_id: i64) -> Result<()> {
    let result = sqlx::query(
        r#"
        INSERT OR IGNORE INTO news_item_tags (news_item_id, tag_id)
        VALUES (?, ?)
        "#,
    )
    .bind(news_item_id)
    .bind(tag_id)
    .execute(pool)
    .await
    .context("Failed to attach tag to news item")?;

    // Only a freshly created association counts as a use
    if result.rows_affected() > 0 {
        sqlx::query("UPDATE news_tags SET usage_count = usage_count + 1 WHERE id = ?")
            .bind(tag_id)
            .execute(pool)
            .await
            .context("Failed to increment tag usage count")?;
    }

    Ok(())
}

async fn get_tags_for_item_sqlite(pool: &SqlitePool, news_item_id: i64) -> Result<Vec<Tag>> {
    let rows = sqlx::query(
        r#"
        SELECT t.id, t.name, t.name_en, t.description, t.color, t.usage_count, t.is_active, t.created_at
        FROM news_tags t
        INNER JOIN news_item_tags nt ON t.id = nt.tag_id
        WHERE nt.news_item_id = ?
        ORDER BY t.id
        "#,
    )
    .bind(news_item_id)
    .fetch_all(pool)
    .await
    .context("Failed to get tags for news item")?;

    let mut tags = Vec::new();
    for row in rows {
        tags.push(row_to_tag_sqlite(&row)?);
    }
    Ok(tags)
}

async fn count_tags_sqlite(pool: &SqlitePool) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM news_tags WHERE is_active = 1")
        .fetch_one(pool)
        .await
        .context("Failed to count tags")?;
    Ok(row.get("count"))
}

fn row_to_tag_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<Tag> {
    Ok(Tag {
        id: row.get("id"),
        name: row.get("name"),
        name_en: row.get("name_en"),
        description: row.get("description"),
        color: row.get("color"),
        usage_count: row.get("usage_count"),
        is_active: row.get("is_active"),
        created_at: row.get("created_at"),
    })
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_tag_mysql(pool: &MySqlPool, input: &CreateTagInput) -> Result<Tag> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO news_tags (name, name_en, description, color, usage_count, is_active, created_at)
        VALUES (?, ?, ?, ?, 0, 1, ?)
        "#,
    )
    .bind(&input.name)
    .bind(&input.name_en)
    .bind(&input.description)
    .bind(&input.color)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create tag")?;

    let id = result.last_insert_id() as i64;

    Ok(Tag {
        id,
        name: input.name.clone(),
        name_en: input.name_en.clone(),
        description: input.description.clone(),
        color: input.color.clone(),
        usage_count: 0,
        is_active: true,
        created_at: now,
    })
}

async fn get_tag_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<Tag>> {
    let row = sqlx::query(&format!("SELECT {} FROM news_tags WHERE id = ?", TAG_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get tag by ID")?;

    match row {
        Some(row) => Ok(Some(row_to_tag_mysql(&row)?)),
        None => Ok(None),
    }
}

async fn get_tag_by_name_mysql(pool: &MySqlPool, name: &str) -> Result<Option<Tag>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM news_tags WHERE name = ?",
        TAG_COLUMNS
    ))
    .bind(name)
    .fetch_optional(pool)
    .await
    .context("Failed to get tag by name")?;

    match row {
        Some(row) => Ok(Some(row_to_tag_mysql(&row)?)),
        None => Ok(None),
    }
}

async fn list_top_tags_mysql(pool: &MySqlPool, limit: usize) -> Result<Vec<Tag>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM news_tags WHERE is_active = 1 \
         ORDER BY usage_count DESC, id ASC LIMIT ?",
        TAG_COLUMNS
    ))
    .bind(limit as i64)
    .fetch_all(pool)
    .await
    .context("Failed to list top tags")?;

    let mut tags = Vec::new();
    for row in rows {
        tags.push(row_to_tag_mysql(&row)?);
    }
    Ok(tags)
}

async fn attach_tag_mysql(pool: &MySqlPool, tag_id: i64, news_item_id: i64) -> Result<()> {
    let result = sqlx::query(
        r#"
        INSERT IGNORE INTO news_item_tags (news_item_id, tag_id)
        VALUES (?, ?)
        "#,
    )
    .bind(news_item_id)
    .bind(tag_id)
    .execute(pool)
    .await
    .context("Failed to attach tag to news item")?;

    if result.rows_affected() > 0 {
        sqlx::query("UPDATE news_tags SET usage_count = usage_count + 1 WHERE id = ?")
            .bind(tag_id)
            .execute(pool)
            .await
            .context("Failed to increment tag usage count")?;
    }

    Ok(())
}

async fn get_tags_for_item_mysql(pool: &MySqlPool, news_item_id: i64) -> Result<Vec<Tag>> {
    let rows = sqlx::query(
        r#"
        SELECT t.id, t.name, t.name_en, t.description, t.color, t.usage_count, t.is_active, t.created_at
        FROM news_tags t
        INNER JOIN news_item_tags nt ON t.id = nt.tag_id
        WHERE nt.news_item_id = ?
        ORDER BY t.id
        "#,
    )
    .bind(news_item_id)
    .fetch_all(pool)
    .await
    .context("Failed to get tags for news item")?;

    let mut tags = Vec::new();
    for row in rows {
        tags.push(row_to_tag_mysql(&row)?);
    }
    Ok(tags)
}

async fn count_tags_mysql(pool: &MySqlPool) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM news_tags WHERE is_active = 1")
        .fetch_one(pool)
        .await
        .context("Failed to count tags")?;
    Ok(row.get("count"))
}

fn row_to_tag_mysql(row: &sqlx::mysql::MySqlRow) -> Result<Tag> {
    Ok(Tag {
        id: row.get("id"),
        name: row.get("name"),
        name_en: row.get("name_en"),
        description: row.get("description"),
        color: row.get("color"),
        usage_count: row.get("usage_count"),
        is_active: row.get("is_active"),
        created_at: row.get("created_at"),
    })
}
