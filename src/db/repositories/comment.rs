//! Comment repository
//!
//! Database operations for reader comments.
//!
//! Comments are moderated: they are created unapproved and become
//! visible once approved. Deletion is soft so moderation history is
//! kept. The mutators report whether they actually changed state, which
//! lets the comment service keep the per-item approved counter in sync.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{Comment, CreateCommentInput};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Comment repository trait
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Create a new, unapproved comment
    async fn create(&self, input: &CreateCommentInput) -> Result<Comment>;

    /// Get comment by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Comment>>;

    /// Mark a comment approved. Returns true if the comment existed and
    /// was not already approved.
    async fn approve(&self, id: i64) -> Result<bool>;

    /// Revoke approval. Returns true if the comment existed and was
    /// approved.
    async fn unapprove(&self, id: i64) -> Result<bool>;

    /// Soft-delete a comment. Returns true if the comment existed and
    /// was not already deleted.
    async fn soft_delete(&self, id: i64) -> Result<bool>;

    /// List visible (approved and not deleted) comments for an item,
    /// newest first
    async fn list_visible_for_item(&self, news_item_id: i64) -> Result<Vec<Comment>>;

    /// List all comments for an item, newest first, for moderation
    async fn list_for_item(&self, news_item_id: i64) -> Result<Vec<Comment>>;

    /// Check whether an identical comment already exists on an item
    async fn exists(&self, news_item_id: i64, user_email: &str, content: &str) -> Result<bool>;

    /// Count approved, non-deleted comments
    async fn count(&self) -> Result<i64>;
}

/// SQLx-based comment repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxCommentRepository {
    pool: DynDatabasePool,
}

impl SqlxCommentRepository {
    /// Create a new SQLx comment repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn CommentRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl CommentRepository for SqlxCommentRepository {
    async fn create(&self, input: &CreateCommentInput) -> Result<Comment> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                create_comment_sqlite(self.pool.as_sqlite().unwrap(), input).await
            }
            DatabaseDriver::Mysql => {
                create_comment_mysql(self.pool.as_mysql().unwrap(), input).await
            }
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Comment>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_comment_by_id_sqlite(self.pool.as_sqlite().unwrap(), id).await
            }
            DatabaseDriver::Mysql => {
                get_comment_by_id_mysql(self.pool.as_mysql().unwrap(), id).await
            }
        }
    }

    async fn approve(&self, id: i64) -> Result<bool> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                approve_comment_sqlite(self.pool.as_sqlite().unwrap(), id).await
            }
            DatabaseDriver::Mysql => {
                approve_comment_mysql(self.pool.as_mysql().unwrap(), id).await
            }
        }
    }

    async fn unapprove(&self, id: i64) -> Result<bool> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                unapprove_comment_sqlite(self.pool.as_sqlite().unwrap(), id).await
            }
            DatabaseDriver::Mysql => {
                unapprove_comment_mysql(self.pool.as_mysql().unwrap(), id).await
            }
        }
    }

    async fn soft_delete(&self, id: i64) -> Result<bool> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                soft_delete_comment_sqlite(self.pool.as_sqlite().unwrap(), id).await
            }
            DatabaseDriver::Mysql => {
                soft_delete_comment_mysql(self.pool.as_mysql().unwrap(), id).await
            }
        }
    }

    async fn list_visible_for_item(&self, news_item_id: i64) -> Result<Vec<Comment>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                list_visible_sqlite(self.pool.as_sqlite().unwrap(), news_item_id).await
            }
            DatabaseDriver::Mysql => {
                list_visible_mysql(self.pool.as_mysql().unwrap(), news_item_id).await
            }
        }
    }

    async fn list_for_item(&self, news_item_id: i64) -> Result<Vec<Comment>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                list_for_item_sqlite(self.pool.as_sqlite().unwrap(), news_item_id).await
            }
            DatabaseDriver::Mysql => {
                list_for_item_mysql(self.pool.as_mysql().unwrap(), news_item_id).await
            }
        }
    }

    async fn exists(&self, news_item_id: i64, user_email: &str, content: &str) -> Result<bool> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                comment_exists_sqlite(self.pool.as_sqlite().unwrap(), news_item_id, user_email, content)
                    .await
            }
            DatabaseDriver::Mysql => {
                comment_exists_mysql(self.pool.as_mysql().unwrap(), news_item_id, user_email, content)
                    .await
            }
        }
    }

    async fn count(&self) -> Result<i64> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => count_comments_sqlite(self.pool.as_sqlite().unwrap()).await,
            DatabaseDriver::Mysql => count_comments_mysql(self.pool.as_mysql().unwrap()).await,
        }
    }
}

const COMMENT_COLUMNS: &str = "id, news_item_id, user_id, user_name, user_email, content, \
     is_approved, is_deleted, created_at, approved_at";

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_comment_sqlite(pool: &SqlitePool, input: &CreateCommentInput) -> Result<Comment> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO news_comments (news_item_id, user_name, user_email, content, is_approved, is_deleted, created_at)
        VALUES (?, ?, ?, ?, 0, 0, ?)
        "#,
    )
    .bind(input.news_item_id)
    .bind(&input.user_name)
    .bind(&input.user_email)
    .bind(&input.content)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create comment")?;

    let id = result.last_insert_rowid();

    Ok(Comment {
        id,
        news_item_id: input.news_item_id,
        user_id: None,
        user_name: input.user_name.clone(),
        user_email: input.user_email.clone(),
        content: input.content.clone(),
        is_approved: false,
        is_deleted: false,
        created_at: now,
        approved_at: None,
    })
}

async fn get_comment_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Comment>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM news_comments WHERE id = ?",
        COMMENT_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get comment by ID")?;

    match row {
        Some(row) => Ok(Some(row_to_comment_sqlite(&row)?)),
        None => Ok(None),
    }
}

async fn approve_comment_sqlite(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE news_comments SET is_approved = 1, approved_at = ? \
         WHERE id = ? AND is_approved = 0 AND is_deleted = 0",
    )
    .bind(Utc::now())
    .bind(id)
    .execute(pool)
    .await
    .context("Failed to approve comment")?;

    Ok(result.rows_affected() > 0)
}

async fn unapprove_comment_sqlite(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE news_comments SET is_approved = 0, approved_at = NULL \
         WHERE id = ? AND is_approved = 1",
    )
    .bind(id)
    .execute(pool)
    .await
    .context("Failed to unapprove comment")?;

    Ok(result.rows_affected() > 0)
}

async fn soft_delete_comment_sqlite(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE news_comments SET is_deleted = 1 WHERE id = ? AND is_deleted = 0",
    )
    .bind(id)
    .execute(pool)
    .await
    .context("Failed to soft-delete comment")?;

    Ok(result.rows_affected() > 0)
}

async fn list_visible_sqlite(pool: &SqlitePool, news_item_id: i64) -> Result<Vec<Comment>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM news_comments \
         WHERE news_item_id = ? AND is_approved = 1 AND is_deleted = 0 \
         ORDER BY created_at DESC, id DESC",
        COMMENT_COLUMNS
    ))
    .bind(news_item_id)
    .fetch_all(pool)
    .await
    .context("Failed to list visible comments")?;

    let mut comments = Vec::new();
    for row in rows {
        comments.push(row_to_comment_sqlite(&row)?);
    }
    Ok(comments)
}

async fn list_for_item_sqlite(pool: &SqlitePool, news_item_id: i64) -> Result<Vec<Comment>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM news_comments WHERE news_item_id = ? \
         ORDER BY created_at DESC, id DESC",
        COMMENT_COLUMNS
    ))
    .bind(news_item_id)
    .fetch_all(pool)
    .await
    .context("Failed to list comments")?;

    let mut comments = Vec::new();
    for row in rows {
        comments.push(row_to_comment_sqlite(&row)?);
    }
    Ok(comments)
}

async fn comment_exists_sqlite(
    pool: &SqlitePool,
    news_item_id: i64,
    user_email: &str,
    content: &str,
) -> Result<bool> {
    let row = sqlx::query(
        "SELECT COUNT(*) as count FROM news_comments \
         WHERE news_item_id = ? AND user_email = ? AND content = ?",
    )
    .bind(news_item_id)
    .bind(user_email)
    .bind(content)
    .fetch_one(pool)
    .await
    .context("Failed to check comment existence")?;

    let count: i64 = row.get("count");
    Ok(count > 0)
}

async fn count_comments_sqlite(pool: &SqlitePool) -> Result<i64> {
    let row = sqlx::query(
        "SELECT COUNT(*) as count FROM news_comments WHERE is_approved = 1 AND is_deleted = 0",
    )
        .fetch_one(pool)
        .await
        .context("Failed to count comments")?;
    Ok(row.get("count"))
}

fn row_to_comment_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<Comment> {
    Ok(Comment {
        id: row.get("id"),
        news_item_id: row.get("news_item_id"),
        user_id: row.get("user_id"),
        user_name: row.get("user_name"),
        user_email: row.get("user_email"),
        content: row.get("content"),
        is_approved: row.get("is_approved"),
        is_deleted: row.get("is_deleted"),
        created_at: row.get("created_at"),
        approved_at: row.get("approved_at"),
    })
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_comment_mysql(pool: &MySqlPool, input: &CreateCommentInput) -> Result<Comment> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO news_comments (news_item_id, user_name, user_email, content, is_approved, is_deleted, created_at)
        VALUES (?, ?, ?, ?, 0, 0, ?)
        "#,
    )
    .bind(input.news_item_id)
    .bind(&input.user_name)
    .bind(&input.user_email)
    .bind(&input.content)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create comment")?;

    let id = result.last_insert_id() as i64;

    Ok(Comment {
        id,
        news_item_id: input.news_item_id,
        user_id: None,
        user_name: input.user_name.clone(),
        user_email: input.user_email.clone(),
        content: input.content.clone(),
        is_approved: false,
        is_deleted: false,
        created_at: now,
        approved_at: None,
    })
}

async fn get_comment_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<Comment>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM news_comments WHERE id = ?",
        COMMENT_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get comment by ID")?;

    match row {
        Some(row) => Ok(Some(row_to_comment_mysql(&row)?)),
        None => Ok(None),
    }
}

async fn approve_comment_mysql(pool: &MySqlPool, id: i64) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE news_comments SET is_approved = 1, approved_at = ? \
         WHERE id = ? AND is_approved = 0 AND is_deleted = 0",
    )
    .bind(Utc::now())
    .bind(id)
    .execute(pool)
    .await
    .context("Failed to approve comment")?;

    Ok(result.rows_affected() > 0)
}

async fn unapprove_comment_mysql(pool: &MySqlPool, id: i64) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE news_comments SET is_approved = 0, approved_at = NULL \
         WHERE id = ? AND is_approved = 1",
    )
    .bind(id)
    .execute(pool)
    .await
    .context("Failed to unapprove comment")?;

    Ok(result.rows_affected() > 0)
}

async fn soft_delete_comment_mysql(pool: &MySqlPool, id: i64) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE news_comments SET is_deleted = 1 WHERE id = ? AND is_deleted = 0",
    )
    .bind(id)
    .execute(pool)
    .await
    .context("Failed to soft-delete comment")?;

    Ok(result.rows_affected() > 0)
}

async fn list_visible_mysql(pool: &MySqlPool, news_item_id: i64) -> Result<Vec<Comment>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM news_comments \
         WHERE news_item_id = ? AND is_approved = 1 AND is_deleted = 0 \
         ORDER BY created_at DESC, id DESC",
        COMMENT_COLUMNS
    ))
    .bind(news_item_id)
    .fetch_all(pool)
    .await
    .context("Failed to list visible comments")?;

    let mut comments = Vec::new();
    for row in rows {
        comments.push(row_to_comment_mysql(&row)?);
    }
    Ok(comments)
}

async fn list_for_item_mysql(pool: &MySqlPool, news_item_id: i64) -> Result<Vec<Comment>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM news_comments WHERE news_item_id = ? \
         ORDER BY created_at DESC, id DESC",
        COMMENT_COLUMNS
    ))
    .bind(news_item_id)
    .fetch_all(pool)
    .await
    .context("Failed to list comments")?;

    let mut comments = Vec::new();
    for row in rows {
        comments.push(row_to_comment_mysql(&row)?);
    }
    Ok(comments)
}

async fn comment_exists_mysql(
    pool: &MySqlPool,
    news_item_id: i64,
    user_email: &str,
    content: &str,
) -> Result<bool> {
    let row = sqlx::query(
        "SELECT COUNT(*) as count FROM news_comments \
         WHERE news_item_id = ? AND user_email = ? AND content = ?",
    )
    .bind(news_item_id)
    .bind(user_email)
    .bind(content)
    .fetch_one(pool)
    .await
    .context("Failed to check comment existence")?;

    let count: i64 = row.get("count");
    Ok(count > 0)
}

async fn count_comments_mysql(pool: &MySqlPool) -> Result<i64> {
    let row = sqlx::query(
        "SELECT COUNT(*) as count FROM news_comments WHERE is_approved = 1 AND is_deleted = 0",
    )
        .fetch_one(pool)
        .await
        .context("Failed to count comments")?;
    Ok(row.get("count"))
}

fn row_to_comment_mysql(row: &sqlx::mysql::MySqlRow) -> Result<Comment> {
    Ok(Comment {
        id: row.get("id"),
        news_item_id: row.get("news_item_id"),
        user_id: row.get("user_id"),
        user_name: row.get("user_name"),
        user_email: row.get("user_email"),
        content: row.get("content"),
        is_approved: row.get("is_approved"),
        is_deleted: row.get("is_deleted"),
        created_at: row.get("created_at"),
        approved_at: row.get("approved_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{
        CategoryRepository, NewsItemRepository, SqlxCategoryRepository, SqlxNewsItemRepository,
    };
    use crate::db::{create_test_pool, migrations};
    use crate::models::{CreateCategoryInput, CreateNewsItemInput};

    async fn setup() -> (DynDatabasePool, SqlxCommentRepository, i64) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let categories = SqlxCategoryRepository::new(pool.clone());
        let category = categories
            .create(&CreateCategoryInput {
                name: "عام".to_string(),
                name_en: None,
                description: None,
                description_en: None,
                icon: None,
                color: None,
                display_order: 1,
            })
            .await
            .unwrap();

        let items = SqlxNewsItemRepository::new(pool.clone());
        let item = items
            .create(&CreateNewsItemInput::new(
                "عنوان".to_string(),
                "commented-item".to_string(),
                "ملخص".to_string(),
                "محتوى".to_string(),
                category.id,
            ))
            .await
            .unwrap();

        let repo = SqlxCommentRepository::new(pool.clone());
        (pool, repo, item.id)
    }

    fn test_input(item_id: i64, content: &str) -> CreateCommentInput {
        CreateCommentInput {
            news_item_id: item_id,
            user_name: "أحمد".to_string(),
            user_email: "ahmed@example.com".to_string(),
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_starts_unapproved() {
        let (_pool, repo, item_id) = setup().await;

        let comment = repo.create(&test_input(item_id, "تعليق")).await.unwrap();

        assert!(comment.id > 0);
        assert!(!comment.is_approved);
        assert!(!comment.is_deleted);
        assert!(comment.approved_at.is_none());
        assert!(!comment.is_visible());
    }

    #[tokio::test]
    async fn test_approve_transitions_once() {
        let (_pool, repo, item_id) = setup().await;
        let comment = repo.create(&test_input(item_id, "تعليق")).await.unwrap();

        assert!(repo.approve(comment.id).await.unwrap());
        // Second approval is a no-op
        assert!(!repo.approve(comment.id).await.unwrap());

        let found = repo.get_by_id(comment.id).await.unwrap().unwrap();
        assert!(found.is_approved);
        assert!(found.approved_at.is_some());
        assert!(found.is_visible());
    }

    #[tokio::test]
    async fn test_unapprove() {
        let (_pool, repo, item_id) = setup().await;
        let comment = repo.create(&test_input(item_id, "تعليق")).await.unwrap();
        repo.approve(comment.id).await.unwrap();

        assert!(repo.unapprove(comment.id).await.unwrap());
        assert!(!repo.unapprove(comment.id).await.unwrap());

        let found = repo.get_by_id(comment.id).await.unwrap().unwrap();
        assert!(!found.is_approved);
        assert!(found.approved_at.is_none());
    }

    #[tokio::test]
    async fn test_soft_delete_keeps_row() {
        let (_pool, repo, item_id) = setup().await;
        let comment = repo.create(&test_input(item_id, "تعليق")).await.unwrap();

        assert!(repo.soft_delete(comment.id).await.unwrap());
        assert!(!repo.soft_delete(comment.id).await.unwrap());

        let found = repo.get_by_id(comment.id).await.unwrap().unwrap();
        assert!(found.is_deleted);
        assert!(!found.is_visible());
    }

    #[tokio::test]
    async fn test_approve_deleted_comment_is_rejected() {
        let (_pool, repo, item_id) = setup().await;
        let comment = repo.create(&test_input(item_id, "تعليق")).await.unwrap();
        repo.soft_delete(comment.id).await.unwrap();

        assert!(!repo.approve(comment.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_visible_filters_and_orders() {
        let (_pool, repo, item_id) = setup().await;

        let approved = repo.create(&test_input(item_id, "ظاهر")).await.unwrap();
        repo.approve(approved.id).await.unwrap();

        let pending = repo.create(&test_input(item_id, "معلق")).await.unwrap();
        let _ = pending;

        let deleted = repo.create(&test_input(item_id, "محذوف")).await.unwrap();
        repo.approve(deleted.id).await.unwrap();
        repo.soft_delete(deleted.id).await.unwrap();

        let visible = repo.list_visible_for_item(item_id).await.unwrap();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].content, "ظاهر");

        let all = repo.list_for_item(item_id).await.unwrap();
        assert_eq!(all.len(), 3);
        // Newest first
        assert_eq!(all[0].content, "محذوف");
    }

    #[tokio::test]
    async fn test_exists() {
        let (_pool, repo, item_id) = setup().await;
        repo.create(&test_input(item_id, "موجود")).await.unwrap();

        assert!(repo
            .exists(item_id, "ahmed@example.com", "موجود")
            .await
            .unwrap());
        assert!(!repo
            .exists(item_id, "ahmed@example.com", "غير موجود")
            .await
            .unwrap());
        assert!(!repo
            .exists(item_id, "other@example.com", "موجود")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_count_only_approved() {
        let (_pool, repo, item_id) = setup().await;
        assert_eq!(repo.count().await.unwrap(), 0);

        let first = repo.create(&test_input(item_id, "واحد")).await.unwrap();
        let second = repo.create(&test_input(item_id, "اثنان")).await.unwrap();

        // Pending comments are not counted
        assert_eq!(repo.count().await.unwrap(), 0);

        repo.approve(first.id).await.unwrap();
        repo.approve(second.id).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 2);

        repo.soft_delete(second.id).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 1);
    }
}
