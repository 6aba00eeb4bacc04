//! Database migrations module
//!
//! This module provides code-based database migrations for the news service.
//! All migrations are embedded directly in Rust code as SQL strings, supporting
//! both SQLite and MySQL databases for single-binary deployment.
//!
//! # Usage
//!
//! ```ignore
//! use naebak_news::db::{create_pool, migrations};
//!
//! let pool = create_pool(&config).await?;
//! migrations::run_migrations(&pool).await?;
//! ```
//!
//! # Architecture
//!
//! Each migration is defined as a `Migration` struct containing:
//! - `version`: Unique version number for ordering
//! - `name`: Human-readable migration name
//! - `up_sqlite`: SQL for SQLite database
//! - `up_mysql`: SQL for MySQL database

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row, SqlitePool};

use super::DynDatabasePool;
use crate::config::DatabaseDriver;

/// A database migration with SQL for both SQLite and MySQL
#[derive(Debug, Clone)]
pub struct Migration {
    /// Migration version number (must be unique and sequential)
    pub version: i32,
    /// Human-readable migration name
    pub name: &'static str,
    /// SQL statements for SQLite
    pub up_sqlite: &'static str,
    /// SQL statements for MySQL
    pub up_mysql: &'static str,
}

/// Migration record stored in the database
#[derive(Debug, Clone)]
pub struct MigrationRecord {
    /// Migration version number
    pub version: i64,
    /// Migration name/description
    pub name: String,
    /// When the migration was applied
    pub applied_at: DateTime<Utc>,
}

/// All migrations for the news service.
/// These are embedded in the binary for single-binary deployment.
pub const MIGRATIONS: &[Migration] = &[
    // Migration 1: Create news categories table
    Migration {
        version: 1,
        name: "create_news_categories",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS news_categories (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name VARCHAR(100) NOT NULL UNIQUE,
                name_en VARCHAR(100),
                description TEXT,
                description_en TEXT,
                icon VARCHAR(50),
                color VARCHAR(20),
                display_order INTEGER NOT NULL DEFAULT 0,
                is_active BOOLEAN NOT NULL DEFAULT 1,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE INDEX IF NOT EXISTS idx_news_categories_display_order ON news_categories(display_order);
            CREATE INDEX IF NOT EXISTS idx_news_categories_is_active ON news_categories(is_active);
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS news_categories (
                id BIGINT PRIMARY KEY AUTO_INCREMENT,
                name VARCHAR(100) NOT NULL UNIQUE,
                name_en VARCHAR(100),
                description TEXT,
                description_en TEXT,
                icon VARCHAR(50),
                color VARCHAR(20),
                display_order INT NOT NULL DEFAULT 0,
                is_active TINYINT(1) NOT NULL DEFAULT 1,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP
            );
            CREATE INDEX idx_news_categories_display_order ON news_categories(display_order);
            CREATE INDEX idx_news_categories_is_active ON news_categories(is_active);
        "#,
    },
    // Migration 2: Create news tags table
    Migration {
        version: 2,
        name: "create_news_tags",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS news_tags (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name VARCHAR(50) NOT NULL UNIQUE,
                name_en VARCHAR(50),
                description TEXT,
                color VARCHAR(20),
                usage_count INTEGER NOT NULL DEFAULT 0,
                is_active BOOLEAN NOT NULL DEFAULT 1,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE INDEX IF NOT EXISTS idx_news_tags_usage_count ON news_tags(usage_count);
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS news_tags (
                id BIGINT PRIMARY KEY AUTO_INCREMENT,
                name VARCHAR(50) NOT NULL UNIQUE,
                name_en VARCHAR(50),
                description TEXT,
                color VARCHAR(20),
                usage_count BIGINT NOT NULL DEFAULT 0,
                is_active TINYINT(1) NOT NULL DEFAULT 1,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE INDEX idx_news_tags_usage_count ON news_tags(usage_count);
        "#,
    },
    // Migration 3: Create news items table
    Migration {
        version: 3,
        name: "create_news_items",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS news_items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title VARCHAR(200) NOT NULL,
                title_en VARCHAR(200),
                slug VARCHAR(250) NOT NULL UNIQUE,
                summary TEXT NOT NULL,
                summary_en TEXT,
                content TEXT NOT NULL,
                content_en TEXT,
                featured_image VARCHAR(500),
                featured_image_alt VARCHAR(200),
                gallery_images TEXT NOT NULL DEFAULT '[]',
                category_id INTEGER NOT NULL,
                status VARCHAR(20) NOT NULL DEFAULT 'draft',
                is_published BOOLEAN NOT NULL DEFAULT 0,
                is_featured BOOLEAN NOT NULL DEFAULT 0,
                is_breaking BOOLEAN NOT NULL DEFAULT 0,
                priority INTEGER NOT NULL DEFAULT 0,
                published_at TIMESTAMP,
                expires_at TIMESTAMP,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                author_id INTEGER,
                author_name VARCHAR(100),
                editor_id INTEGER,
                view_count INTEGER NOT NULL DEFAULT 0,
                like_count INTEGER NOT NULL DEFAULT 0,
                share_count INTEGER NOT NULL DEFAULT 0,
                comment_count INTEGER NOT NULL DEFAULT 0,
                meta_title VARCHAR(200),
                meta_description TEXT,
                meta_keywords VARCHAR(500),
                FOREIGN KEY (category_id) REFERENCES news_categories(id) ON DELETE RESTRICT
            );
            CREATE INDEX IF NOT EXISTS idx_news_items_slug ON news_items(slug);
            CREATE INDEX IF NOT EXISTS idx_news_items_category_id ON news_items(category_id);
            CREATE INDEX IF NOT EXISTS idx_news_items_status ON news_items(status);
            CREATE INDEX IF NOT EXISTS idx_news_items_ordering ON news_items(priority DESC, published_at DESC);
            CREATE INDEX IF NOT EXISTS idx_news_items_is_featured ON news_items(is_featured);
            CREATE INDEX IF NOT EXISTS idx_news_items_is_breaking ON news_items(is_breaking);
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS news_items (
                id BIGINT PRIMARY KEY AUTO_INCREMENT,
                title VARCHAR(200) NOT NULL,
                title_en VARCHAR(200),
                slug VARCHAR(250) NOT NULL UNIQUE,
                summary TEXT NOT NULL,
                summary_en TEXT,
                content TEXT NOT NULL,
                content_en TEXT,
                featured_image VARCHAR(500),
                featured_image_alt VARCHAR(200),
                gallery_images TEXT NOT NULL,
                category_id BIGINT NOT NULL,
                status VARCHAR(20) NOT NULL DEFAULT 'draft',
                is_published TINYINT(1) NOT NULL DEFAULT 0,
                is_featured TINYINT(1) NOT NULL DEFAULT 0,
                is_breaking TINYINT(1) NOT NULL DEFAULT 0,
                priority INT NOT NULL DEFAULT 0,
                published_at TIMESTAMP NULL,
                expires_at TIMESTAMP NULL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP,
                author_id BIGINT,
                author_name VARCHAR(100),
                editor_id BIGINT,
                view_count BIGINT NOT NULL DEFAULT 0,
                like_count BIGINT NOT NULL DEFAULT 0,
                share_count BIGINT NOT NULL DEFAULT 0,
                comment_count BIGINT NOT NULL DEFAULT 0,
                meta_title VARCHAR(200),
                meta_description TEXT,
                meta_keywords VARCHAR(500),
                FOREIGN KEY (category_id) REFERENCES news_categories(id) ON DELETE RESTRICT
            );
            CREATE INDEX idx_news_items_slug ON news_items(slug);
            CREATE INDEX idx_news_items_category_id ON news_items(category_id);
            CREATE INDEX idx_news_items_status ON news_items(status);
            CREATE INDEX idx_news_items_ordering ON news_items(priority DESC, published_at DESC);
            CREATE INDEX idx_news_items_is_featured ON news_items(is_featured);
            CREATE INDEX idx_news_items_is_breaking ON news_items(is_breaking);
        "#,
    },
    // Migration 4: Create news item to tag association table
    Migration {
        version: 4,
        name: "create_news_item_tags",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS news_item_tags (
                news_item_id INTEGER NOT NULL,
                tag_id INTEGER NOT NULL,
                PRIMARY KEY (news_item_id, tag_id),
                FOREIGN KEY (news_item_id) REFERENCES news_items(id) ON DELETE CASCADE,
                FOREIGN KEY (tag_id) REFERENCES news_tags(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_news_item_tags_tag_id ON news_item_tags(tag_id);
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS news_item_tags (
                news_item_id BIGINT NOT NULL,
                tag_id BIGINT NOT NULL,
                PRIMARY KEY (news_item_id, tag_id),
                FOREIGN KEY (news_item_id) REFERENCES news_items(id) ON DELETE CASCADE,
                FOREIGN KEY (tag_id) REFERENCES news_tags(id) ON DELETE CASCADE
            );
            CREATE INDEX idx_news_item_tags_tag_id ON news_item_tags(tag_id);
        "#,
    },
    // Migration 5: Create comments table
    Migration {
        version: 5,
        name: "create_news_comments",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS news_comments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                news_item_id INTEGER NOT NULL,
                user_id INTEGER,
                user_name VARCHAR(100) NOT NULL,
                user_email VARCHAR(255) NOT NULL,
                content TEXT NOT NULL,
                is_approved BOOLEAN NOT NULL DEFAULT 0,
                is_deleted BOOLEAN NOT NULL DEFAULT 0,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                approved_at TIMESTAMP,
                FOREIGN KEY (news_item_id) REFERENCES news_items(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_news_comments_news_item_id ON news_comments(news_item_id);
            CREATE INDEX IF NOT EXISTS idx_news_comments_is_approved ON news_comments(is_approved);
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS news_comments (
                id BIGINT PRIMARY KEY AUTO_INCREMENT,
                news_item_id BIGINT NOT NULL,
                user_id BIGINT,
                user_name VARCHAR(100) NOT NULL,
                user_email VARCHAR(255) NOT NULL,
                content TEXT NOT NULL,
                is_approved TINYINT(1) NOT NULL DEFAULT 0,
                is_deleted TINYINT(1) NOT NULL DEFAULT 0,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                approved_at TIMESTAMP NULL,
                FOREIGN KEY (news_item_id) REFERENCES news_items(id) ON DELETE CASCADE
            );
            CREATE INDEX idx_news_comments_news_item_id ON news_comments(news_item_id);
            CREATE INDEX idx_news_comments_is_approved ON news_comments(is_approved);
        "#,
    },
    // Migration 6: Create daily stats table, unique per item and day
    Migration {
        version: 6,
        name: "create_news_stats",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS news_stats (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                news_item_id INTEGER NOT NULL,
                date DATE NOT NULL,
                views INTEGER NOT NULL DEFAULT 0,
                unique_views INTEGER NOT NULL DEFAULT 0,
                likes INTEGER NOT NULL DEFAULT 0,
                shares INTEGER NOT NULL DEFAULT 0,
                comments INTEGER NOT NULL DEFAULT 0,
                avg_read_time REAL NOT NULL DEFAULT 0,
                bounce_rate REAL NOT NULL DEFAULT 0,
                engagement_rate REAL NOT NULL DEFAULT 0,
                direct_visits INTEGER NOT NULL DEFAULT 0,
                social_visits INTEGER NOT NULL DEFAULT 0,
                search_visits INTEGER NOT NULL DEFAULT 0,
                referral_visits INTEGER NOT NULL DEFAULT 0,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                UNIQUE (news_item_id, date),
                FOREIGN KEY (news_item_id) REFERENCES news_items(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_news_stats_date ON news_stats(date);
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS news_stats (
                id BIGINT PRIMARY KEY AUTO_INCREMENT,
                news_item_id BIGINT NOT NULL,
                date DATE NOT NULL,
                views BIGINT NOT NULL DEFAULT 0,
                unique_views BIGINT NOT NULL DEFAULT 0,
                likes BIGINT NOT NULL DEFAULT 0,
                shares BIGINT NOT NULL DEFAULT 0,
                comments BIGINT NOT NULL DEFAULT 0,
                avg_read_time DOUBLE NOT NULL DEFAULT 0,
                bounce_rate DOUBLE NOT NULL DEFAULT 0,
                engagement_rate DOUBLE NOT NULL DEFAULT 0,
                direct_visits BIGINT NOT NULL DEFAULT 0,
                social_visits BIGINT NOT NULL DEFAULT 0,
                search_visits BIGINT NOT NULL DEFAULT 0,
                referral_visits BIGINT NOT NULL DEFAULT 0,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                UNIQUE KEY uq_news_stats_item_date (news_item_id, date),
                FOREIGN KEY (news_item_id) REFERENCES news_items(id) ON DELETE CASCADE
            );
            CREATE INDEX idx_news_stats_date ON news_stats(date);
        "#,
    },
    // Migration 7: Create typed settings table
    Migration {
        version: 7,
        name: "create_news_settings",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS news_settings (
                key VARCHAR(100) PRIMARY KEY,
                value TEXT NOT NULL,
                value_type VARCHAR(20) NOT NULL DEFAULT 'string',
                description TEXT,
                category VARCHAR(50),
                is_public BOOLEAN NOT NULL DEFAULT 0,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS news_settings (
                `key` VARCHAR(100) PRIMARY KEY,
                value TEXT NOT NULL,
                value_type VARCHAR(20) NOT NULL DEFAULT 'string',
                description TEXT,
                category VARCHAR(50),
                is_public TINYINT(1) NOT NULL DEFAULT 0,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP
            );
        "#,
    },
];

/// Run all pending migrations against the database.
///
/// # Returns
///
/// Number of migrations applied
///
/// # Errors
///
/// Returns an error if any migration fails to apply
pub async fn run_migrations(pool: &DynDatabasePool) -> Result<usize> {
    // Create migrations table
    create_migrations_table(pool).await?;

    // Get applied migrations
    let applied = get_applied_migrations(pool).await?;
    let applied_versions: Vec<i32> = applied.iter().map(|m| m.version as i32).collect();

    let mut count = 0;

    for migration in MIGRATIONS {
        if !applied_versions.contains(&migration.version) {
            tracing::info!(
                "Applying migration {}: {}",
                migration.version,
                migration.name
            );
            apply_migration(pool, migration)
                .await
                .with_context(|| format!("Failed to apply migration: {}", migration.name))?;
            count += 1;
        }
    }

    if count > 0 {
        tracing::info!("Applied {} migration(s)", count);
    } else {
        tracing::debug!("No pending migrations");
    }

    Ok(count)
}

/// Create the migrations tracking table if it doesn't exist
async fn create_migrations_table(pool: &DynDatabasePool) -> Result<()> {
    let sql = match pool.driver() {
        DatabaseDriver::Sqlite => {
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version INTEGER PRIMARY KEY,
                name VARCHAR(255) NOT NULL UNIQUE,
                applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#
        }
        DatabaseDriver::Mysql => {
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version INT PRIMARY KEY,
                name VARCHAR(255) NOT NULL UNIQUE,
                applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#
        }
    };

    pool.execute(sql).await?;
    Ok(())
}

/// Get list of already applied migrations
async fn get_applied_migrations(pool: &DynDatabasePool) -> Result<Vec<MigrationRecord>> {
    match pool.driver() {
        DatabaseDriver::Sqlite => get_applied_migrations_sqlite(pool.as_sqlite().unwrap()).await,
        DatabaseDriver::Mysql => get_applied_migrations_mysql(pool.as_mysql().unwrap()).await,
    }
}

async fn get_applied_migrations_sqlite(pool: &SqlitePool) -> Result<Vec<MigrationRecord>> {
    let rows = sqlx::query("SELECT version, name, applied_at FROM _migrations ORDER BY version")
        .fetch_all(pool)
        .await?;

    let mut records = Vec::new();
    for row in rows {
        records.push(MigrationRecord {
            version: row.get("version"),
            name: row.get("name"),
            applied_at: row.get("applied_at"),
        });
    }

    Ok(records)
}

async fn get_applied_migrations_mysql(pool: &MySqlPool) -> Result<Vec<MigrationRecord>> {
    let rows = sqlx::query("SELECT version, name, applied_at FROM _migrations ORDER BY version")
        .fetch_all(pool)
        .await?;

    let mut records = Vec::new();
    for row in rows {
        records.push(MigrationRecord {
            version: row.get("version"),
            name: row.get("name"),
            applied_at: row.get("applied_at"),
        });
    }

    Ok(records)
}

/// Apply a single migration
async fn apply_migration(pool: &DynDatabasePool, migration: &Migration) -> Result<()> {
    match pool.driver() {
        DatabaseDriver::Sqlite => {
            apply_migration_sqlite(pool.as_sqlite().unwrap(), migration).await
        }
        DatabaseDriver::Mysql => apply_migration_mysql(pool.as_mysql().unwrap(), migration).await,
    }
}

async fn apply_migration_sqlite(pool: &SqlitePool, migration: &Migration) -> Result<()> {
    // Execute migration SQL (may contain multiple statements)
    for statement in split_sql_statements(migration.up_sqlite) {
        let statement = statement.trim();
        if !statement.is_empty() {
            sqlx::query(statement)
                .execute(pool)
                .await
                .with_context(|| format!("Failed to execute: {}", truncate_sql(statement)))?;
        }
    }

    // Record the migration
    sqlx::query("INSERT INTO _migrations (version, name) VALUES (?, ?)")
        .bind(migration.version)
        .bind(migration.name)
        .execute(pool)
        .await?;

    Ok(())
}

async fn apply_migration_mysql(pool: &MySqlPool, migration: &Migration) -> Result<()> {
    // Execute migration SQL (may contain multiple statements)
    for statement in split_sql_statements(migration.up_mysql) {
        let statement = statement.trim();
        if !statement.is_empty() {
            sqlx::query(statement)
                .execute(pool)
                .await
                .with_context(|| format!("Failed to execute: {}", truncate_sql(statement)))?;
        }
    }

    // Record the migration
    sqlx::query("INSERT INTO _migrations (version, name) VALUES (?, ?)")
        .bind(migration.version)
        .bind(migration.name)
        .execute(pool)
        .await?;

    Ok(())
}

/// Truncate SQL for error messages
fn truncate_sql(sql: &str) -> String {
    if sql.len() > 100 {
        format!("{}...", &sql[..100])
    } else {
        sql.to_string()
    }
}

/// Split SQL into individual statements, handling comments properly
fn split_sql_statements(sql: &str) -> Vec<&str> {
    let mut statements = Vec::new();
    let mut current_start = 0;
    let mut in_statement = false;

    for (i, c) in sql.char_indices() {
        match c {
            ';' => {
                if in_statement {
                    let stmt = sql[current_start..i].trim();
                    if !stmt.is_empty() && !is_comment_only(stmt) {
                        statements.push(stmt);
                    }
                    in_statement = false;
                }
                current_start = i + 1;
            }
            _ if !c.is_whitespace() && !in_statement => {
                current_start = i;
                in_statement = true;
            }
            _ => {}
        }
    }

    // Handle last statement without trailing semicolon
    if in_statement {
        let stmt = sql[current_start..].trim();
        if !stmt.is_empty() && !is_comment_only(stmt) {
            statements.push(stmt);
        }
    }

    statements
}

/// Check if a string contains only SQL comments
fn is_comment_only(s: &str) -> bool {
    for line in s.lines() {
        let trimmed = line.trim();
        if !trimmed.is_empty() && !trimmed.starts_with("--") {
            return false;
        }
    }
    true
}

/// Check if migrations are up to date
pub async fn is_up_to_date(pool: &DynDatabasePool) -> Result<bool> {
    // Try to create migrations table (in case it doesn't exist)
    let _ = create_migrations_table(pool).await;

    let applied = get_applied_migrations(pool).await?;
    Ok(applied.len() == MIGRATIONS.len())
}

/// Get pending migrations count
pub async fn pending_count(pool: &DynDatabasePool) -> Result<usize> {
    // Try to create migrations table (in case it doesn't exist)
    let _ = create_migrations_table(pool).await;

    let applied = get_applied_migrations(pool).await?;
    Ok(MIGRATIONS.len().saturating_sub(applied.len()))
}

/// Get the total number of migrations defined
pub fn total_migrations() -> usize {
    MIGRATIONS.len()
}
