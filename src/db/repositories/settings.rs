//! Settings repository
//!
//! Database operations for typed service settings.
//!
//! Settings are stored as strings alongside a declared type and coerced
//! on read by the model layer. Writes are upserts keyed by the setting
//! name.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{Setting, SettingType, SettingValue};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Settings repository trait
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Get a setting by key
    async fn get(&self, key: &str) -> Result<Option<Setting>>;

    /// Insert or fully replace a setting
    async fn upsert(&self, setting: &Setting) -> Result<()>;

    /// Set a setting's value and type, creating the row if needed.
    /// Description, category and visibility are preserved on update.
    async fn set_value(&self, key: &str, value: &SettingValue) -> Result<()>;

    /// List all settings ordered by key
    async fn list_all(&self) -> Result<Vec<Setting>>;

    /// Count all settings
    async fn count(&self) -> Result<i64>;
}

/// SQLx-based settings repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxSettingsRepository {
    pool: DynDatabasePool,
}

impl SqlxSettingsRepository {
    /// Create a new SQLx settings repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn SettingsRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl SettingsRepository for SqlxSettingsRepository {
    async fn get(&self, key: &str) -> Result<Option<Setting>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_setting_sqlite(self.pool.as_sqlite().unwrap(), key).await
            }
            DatabaseDriver::Mysql => get_setting_mysql(self.pool.as_mysql().unwrap(), key).await,
        }
    }

    async fn upsert(&self, setting: &Setting) -> Result<()> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                upsert_setting_sqlite(self.pool.as_sqlite().unwrap(), setting).await
            }
            DatabaseDriver::Mysql => {
                upsert_setting_mysql(self.pool.as_mysql().unwrap(), setting).await
            }
        }
    }

    async fn set_value(&self, key: &str, value: &SettingValue) -> Result<()> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                set_value_sqlite(self.pool.as_sqlite().unwrap(), key, value).await
            }
            DatabaseDriver::Mysql => {
                set_value_mysql(self.pool.as_mysql().unwrap(), key, value).await
            }
        }
    }

    async fn list_all(&self) -> Result<Vec<Setting>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => list_settings_sqlite(self.pool.as_sqlite().unwrap()).await,
            DatabaseDriver::Mysql => list_settings_mysql(self.pool.as_mysql().unwrap()).await,
        }
    }

    async fn count(&self) -> Result<i64> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => count_settings_sqlite(self.pool.as_sqlite().unwrap()).await,
            DatabaseDriver::Mysql => count_settings_mysql(self.pool.as_mysql().unwrap()).await,
        }
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn get_setting_sqlite(pool: &SqlitePool, key: &str) -> Result<Option<Setting>> {
    let row = sqlx::query(
        "SELECT key, value, value_type, description, category, is_public, updated_at \
         FROM news_settings WHERE key = ?",
    )
    .bind(key)
    .fetch_optional(pool)
    .await
    .context("Failed to get setting")?;

    match row {
        Some(row) => Ok(Some(row_to_setting_sqlite(&row)?)),
        None => Ok(None),
    }
}

async fn upsert_setting_sqlite(pool: &SqlitePool, setting: &Setting) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO news_settings (key, value, value_type, description, category, is_public, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            value_type = excluded.value_type,
            description = excluded.description,
            category = excluded.category,
            is_public = excluded.is_public,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(&setting.key)
    .bind(&setting.value)
    .bind(setting.value_type.as_str())
    .bind(&setting.description)
    .bind(&setting.category)
    .bind(setting.is_public)
    .bind(Utc::now())
    .execute(pool)
    .await
    .context("Failed to upsert setting")?;

    Ok(())
}

async fn set_value_sqlite(pool: &SqlitePool, key: &str, value: &SettingValue) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO news_settings (key, value, value_type, is_public, updated_at)
        VALUES (?, ?, ?, 0, ?)
        ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            value_type = excluded.value_type,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(key)
    .bind(value.to_storage())
    .bind(value.setting_type().as_str())
    .bind(Utc::now())
    .execute(pool)
    .await
    .context("Failed to set setting value")?;

    Ok(())
}

async fn list_settings_sqlite(pool: &SqlitePool) -> Result<Vec<Setting>> {
    let rows = sqlx::query(
        "SELECT key, value, value_type, description, category, is_public, updated_at \
         FROM news_settings ORDER BY key",
    )
    .fetch_all(pool)
    .await
    .context("Failed to list settings")?;

    let mut settings = Vec::new();
    for row in rows {
        settings.push(row_to_setting_sqlite(&row)?);
    }
    Ok(settings)
}

async fn count_settings_sqlite(pool: &SqlitePool) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM news_settings")
        .fetch_one(pool)
        .await
        .context("Failed to count settings")?;
    Ok(row.get("count"))
}

fn row_to_setting_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<Setting> {
    let value_type: String = row.get("value_type");
    Ok(Setting {
        key: row.get("key"),
        value: row.get("value"),
        value_type: SettingType::from_str(&value_type),
        description: row.get("description"),
        category: row.get("category"),
        is_public: row.get("is_public"),
        updated_at: row.get("updated_at"),
    })
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn get_setting_mysql(pool: &MySqlPool, key: &str) -> Result<Option<Setting>> {
    let row = sqlx::query(
        "SELECT `key`, value, value_type, description, category, is_public, updated_at \
         FROM news_settings WHERE `key` = ?",
    )
    .bind(key)
    .fetch_optional(pool)
    .await
    .context("Failed to get setting")?;

    match row {
        Some(row) => Ok(Some(row_to_setting_mysql(&row)?)),
        None => Ok(None),
    }
}

async fn upsert_setting_mysql(pool: &MySqlPool, setting: &Setting) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO news_settings (`key`, value, value_type, description, category, is_public, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ON DUPLICATE KEY UPDATE
            value = VALUES(value),
            value_type = VALUES(value_type),
            description = VALUES(description),
            category = VALUES(category),
            is_public = VALUES(is_public),
            updated_at = VALUES(updated_at)
        "#,
    )
    .bind(&setting.key)
    .bind(&setting.value)
    .bind(setting.value_type.as_str())
    .bind(&setting.description)
    .bind(&setting.category)
    .bind(setting.is_public)
    .bind(Utc::now())
    .execute(pool)
    .await
    .context("Failed to upsert setting")?;

    Ok(())
}

async fn set_value_mysql(pool: &MySqlPool, key: &str, value: &SettingValue) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO news_settings (`key`, value, value_type, is_public, updated_at)
        VALUES (?, ?, ?, 0, ?)
        ON DUPLICATE KEY UPDATE
            value = VALUES(value),
            value_type = VALUES(value_type),
            updated_at = VALUES(updated_at)
        "#,
    )
    .bind(key)
    .bind(value.to_storage())
    .bind(value.setting_type().as_str())
    .bind(Utc::now())
    .execute(pool)
    .await
    .context("Failed to set setting value")?;

    Ok(())
}

async fn list_settings_mysql(pool: &MySqlPool) -> Result<Vec<Setting>> {
    let rows = sqlx::query(
        "SELECT `key`, value, value_type, description, category, is_public, updated_at \
         FROM news_settings ORDER BY `key`",
    )
    .fetch_all(pool)
    .await
    .context("Failed to list settings")?;

    let mut settings = Vec::new();
    for row in rows {
        settings.push(row_to_setting_mysql(&row)?);
    }
    Ok(settings)
}

async fn count_settings_mysql(pool: &MySqlPool) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM news_settings")
        .fetch_one(pool)
        .await
        .context("Failed to count settings")?;
    Ok(row.get("count"))
}

fn row_to_setting_mysql(row: &sqlx::mysql::MySqlRow) -> Result<Setting> {
    let value_type: String = row.get("value_type");
    Ok(Setting {
        key: row.get("key"),
        value: row.get("value"),
        value_type: SettingType::from_str(&value_type),
        description: row.get("description"),
        category: row.get("category"),
        is_public: row.get("is_public"),
        updated_at: row.get("updated_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup_test_repo() -> SqlxSettingsRepository {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        SqlxSettingsRepository::new(pool)
    }

    fn test_setting(key: &str, value: &str, value_type: SettingType) -> Setting {
        Setting {
            key: key.to_string(),
            value: value.to_string(),
            value_type,
            description: Some("test setting".to_string()),
            category: Some("general".to_string()),
            is_public: false,
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_get_missing_setting() {
        let repo = setup_test_repo().await;

        let found = repo.get("missing").await.expect("Failed to get setting");
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_upsert_and_get() {
        let repo = setup_test_repo().await;

        repo.upsert(&test_setting("news_per_page", "10", SettingType::Integer))
            .await
            .expect("Failed to upsert setting");

        let found = repo
            .get("news_per_page")
            .await
            .unwrap()
            .expect("Setting not found");

        assert_eq!(found.key, "news_per_page");
        assert_eq!(found.value, "10");
        assert_eq!(found.value_type, SettingType::Integer);
        assert_eq!(found.typed_value(), SettingValue::Integer(10));
    }

    #[tokio::test]
    async fn test_upsert_replaces() {
        let repo = setup_test_repo().await;

        repo.upsert(&test_setting("site_name", "قديم", SettingType::String))
            .await
            .unwrap();
        repo.upsert(&test_setting("site_name", "نائبك - أخبار", SettingType::String))
            .await
            .unwrap();

        assert_eq!(repo.count().await.unwrap(), 1);
        let found = repo.get("site_name").await.unwrap().unwrap();
        assert_eq!(found.value, "نائبك - أخبار");
    }

    #[tokio::test]
    async fn test_set_value_creates_row() {
        let repo = setup_test_repo().await;

        repo.set_value("comments_enabled", &SettingValue::Boolean(true))
            .await
            .unwrap();

        let found = repo.get("comments_enabled").await.unwrap().unwrap();
        assert_eq!(found.value_type, SettingType::Boolean);
        assert_eq!(found.typed_value(), SettingValue::Boolean(true));
    }

    #[tokio::test]
    async fn test_set_value_preserves_metadata() {
        let repo = setup_test_repo().await;

        repo.upsert(&test_setting("max_comment_length", "500", SettingType::Integer))
            .await
            .unwrap();
        repo.set_value("max_comment_length", &SettingValue::Integer(1000))
            .await
            .unwrap();

        let found = repo.get("max_comment_length").await.unwrap().unwrap();
        assert_eq!(found.typed_value(), SettingValue::Integer(1000));
        assert_eq!(found.description, Some("test setting".to_string()));
        assert_eq!(found.category, Some("general".to_string()));
    }

    #[tokio::test]
    async fn test_list_all_ordered_by_key() {
        let repo = setup_test_repo().await;

        repo.upsert(&test_setting("zeta", "1", SettingType::Integer)).await.unwrap();
        repo.upsert(&test_setting("alpha", "2", SettingType::Integer)).await.unwrap();

        let settings = repo.list_all().await.unwrap();
        assert_eq!(settings.len(), 2);
        assert_eq!(settings[0].key, "alpha");
        assert_eq!(settings[1].key, "zeta");
    }
}
