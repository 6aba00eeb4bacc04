//! Category repository
//!
//! Database operations for news categories.
//!
//! This module provides:
//! - `CategoryRepository` trait defining the interface for category data access
//! - `SqlxCategoryRepository` implementing the trait for SQLite and MySQL

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{Category, CategoryWithCount, CreateCategoryInput};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Category repository trait
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Create a new category
    async fn create(&self, input: &CreateCategoryInput) -> Result<Category>;

    /// Get category by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Category>>;

    /// Get category by name
    async fn get_by_name(&self, name: &str) -> Result<Option<Category>>;

    /// List active categories with their published news counts,
    /// ordered by display_order then ID
    async fn list_active_with_counts(&self) -> Result<Vec<CategoryWithCount>>;

    /// Count active categories
    async fn count(&self) -> Result<i64>;
}

/// SQLx-based category repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxCategoryRepository {
    pool: DynDatabasePool,
}

impl SqlxCategoryRepository {
    /// Create a new SQLx category repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn CategoryRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl CategoryRepository for SqlxCategoryRepository {
    async fn create(&self, input: &CreateCategoryInput) -> Result<Category> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                create_category_sqlite(self.pool.as_sqlite().unwrap(), input).await
            }
            DatabaseDriver::Mysql => {
                create_category_mysql(self.pool.as_mysql().unwrap(), input).await
            }
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Category>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_category_by_id_sqlite(self.pool.as_sqlite().unwrap(), id).await
            }
            DatabaseDriver::Mysql => {
                get_category_by_id_mysql(self.pool.as_mysql().unwrap(), id).await
            }
        }
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Category>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_category_by_name_sqlite(self.pool.as_sqlite().unwrap(), name).await
            }
            DatabaseDriver::Mysql => {
                get_category_by_name_mysql(self.pool.as_mysql().unwrap(), name).await
            }
        }
    }

    async fn list_active_with_counts(&self) -> Result<Vec<CategoryWithCount>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                list_active_with_counts_sqlite(self.pool.as_sqlite().unwrap()).await
            }
            DatabaseDriver::Mysql => {
                list_active_with_counts_mysql(self.pool.as_mysql().unwrap()).await
            }
        }
    }

    async fn count(&self) -> Result<i64> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => count_categories_sqlite(self.pool.as_sqlite().unwrap()).await,
            DatabaseDriver::Mysql => count_categories_mysql(self.pool.as_mysql().unwrap()).await,
        }
    }
}

const CATEGORY_COLUMNS: &str = "id, name, name_en, description, description_en, icon, color, \
     display_order, is_active, created_at, updated_at";

// Published news counts join against the items table; only items that
// are actually published count toward a category.
const LIST_WITH_COUNTS_SQL: &str = "\
    SELECT c.id, c.name, c.name_en, c.description, c.description_en, c.icon, c.color, \
           c.display_order, c.is_active, c.created_at, c.updated_at, \
           COUNT(n.id) as news_count \
    FROM news_categories c \
    LEFT JOIN news_items n \
        ON n.category_id = c.id \
        AND n.is_published = 1 \
        AND n.status = 'published' \
    WHERE c.is_active = 1 \
    GROUP BY c.id, c.name, c.name_en, c.description, c.description_en, c.icon, c.color, \
             c.display_order, c.is_active, c.created_at, c.updated_at \
    ORDER BY c.display_order ASC, c.id ASC";

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_category_sqlite(pool: &SqlitePool, input: &CreateCategoryInput) -> Result<Category> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO news_categories
            (name, name_en, description, description_en, icon, color, display_order, is_active, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, 1, ?, ?)
        "#,
    )
    .bind(&input.name)
    .bind(&input.name_en)
    .bind(&input.description)
    .bind(&input.description_en)
    .bind(&input.icon)
    .bind(&input.color)
    .bind(input.display_order)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create category")?;

    let id = result.last_insert_rowid();

    Ok(Category {
        id,
        name: input.name.clone(),
        name_en: input.name_en.clone(),
        description: input.description.clone(),
        description_en: input.description_en.clone(),
        icon: input.icon.clone(),
        color: input.color.clone(),
        display_order: input.display_order,
        is_active: true,
        created_at: now,
        updated_at: now,
    })
}

async fn get_category_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Category>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM news_categories WHERE id = ?",
        CATEGORY_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get category by ID")?;

    match row {
        Some(row) => Ok(Some(row_to_category_sqlite(&row)?)),
        None => Ok(None),
    }
}

async fn get_category_by_name_sqlite(pool: &SqlitePool, name: &str) -> Result<Option<Category>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM news_categories WHERE name = ?",
        CATEGORY_COLUMNS
    ))
    .bind(name)
    .fetch_optional(pool)
    .await
    .context("Failed to get category by name")?;

    match row {
        Some(row) => Ok(Some(row_to_category_sqlite(&row)?)),
        None => Ok(None),
    }
}

async fn list_active_with_counts_sqlite(pool: &SqlitePool) -> Result<Vec<CategoryWithCount>> {
    let rows = sqlx::query(LIST_WITH_COUNTS_SQL)
        .fetch_all(pool)
        .await
        .context("Failed to list categories with counts")?;

    let mut categories = Vec::new();
    for row in rows {
        let category = row_to_category_sqlite(&row)?;
        let news_count: i64 = row.get("news_count");
        categories.push(CategoryWithCount::new(category, news_count));
    }

    Ok(categories)
}

async fn count_categories_sqlite(pool: &SqlitePool) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM news_categories WHERE is_active = 1")
        .fetch_one(pool)
        .await
        .context("Failed to count categories")?;
    Ok(row.get("count"))
}

fn row_to_category_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<Category> {
    Ok(Category {
        id: row.get("id"),
        name: row.get("name"),
        name_en: row.get("name_en"),
        description: row.get("description"),
        description_en: row.get("description_en"),
        icon: row.get("icon"),
        color: row.get("color"),
        display_order: row.get("display_order"),
        is_active: row.get("is_active"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_category_mysql(pool: &MySqlPool, input: &CreateCategoryInput) -> Result<Category> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO news_categories
            (name, name_en, description, description_en, icon, color, display_order, is_active, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, 1, ?, ?)
        "#,
    )
    .bind(&input.name)
    .bind(&input.name_en)
    .bind(&input.description)
    .bind(&input.description_en)
    .bind(&input.icon)
    .bind(&input.color)
    .bind(input.display_order)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create category")?;

    let id = result.last_insert_id() as i64;

    Ok(Category {
        id,
        name: input.name.clone(),
        name_en: input.name_en.clone(),
        description: input.description.clone(),
        description_en: input.description_en.clone(),
        icon: input.icon.clone(),
        color: input.color.clone(),
        display_order: input.display_order,
        is_active: true,
        created_at: now,
        updated_at: now,
    })
}

async fn get_category_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<Category>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM news_categories WHERE id = ?",
        CATEGORY_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get category by ID")?;

    match row {
        Some(row) => Ok(Some(row_to_category_mysql(&row)?)),
        None => Ok(None),
    }
}

async fn get_category_by_name_mysql(pool: &MySqlPool, name: &str) -> Result<Option<Category>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM news_categories WHERE name = ?",
        CATEGORY_COLUMNS
    ))
    .bind(name)
    .fetch_optional(pool)
    .await
    .context("Failed to get category by name")?;

    match row {
        Some(row) => Ok(Some(row_to_category_mysql(&row)?)),
        None => Ok(None),
    }
}

async fn list_active_with_counts_mysql(pool: &MySqlPool) -> Result<Vec<CategoryWithCount>> {
    let rows = sqlx::query(LIST_WITH_COUNTS_SQL)
        .fetch_all(pool)
        .await
        .context("Failed to list categories with counts")?;

    let mut categories = Vec::new();
    for row in rows {
        let category = row_to_category_mysql(&row)?;
        let news_count: i64 = row.get("news_count");
        categories.push(CategoryWithCount::new(category, news_count));
    }

    Ok(categories)
}

async fn count_categories_mysql(pool: &MySqlPool) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM news_categories WHERE is_active = 1")
        .fetch_one(pool)
        .await
        .context("Failed to count categories")?;
    Ok(row.get("count"))
}

fn row_to_category_mysql(row: &sqlx::mysql::MySqlRow) -> Result<Category> {
    Ok(Category {
        id: row.get("id"),
        name: row.get("name"),
        name_en: row.get("name_en"),
        description: row.get("description"),
        description_en: row.get("description_en"),
        icon: row.get("icon"),
        color: row.get("color"),
        display_order: row.get("display_order"),
        is_active: row.get("is_active"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
