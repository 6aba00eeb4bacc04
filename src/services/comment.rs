//! Comment service
//!
//! Moderation workflow for reader comments. New comments start
//! unapproved; only approve/unapprove/soft-delete transitions touch the
//! item's denormalized `comment_count`, which always equals the number
//! of approved, non-deleted comments.

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::db::repositories::{CommentRepository, NewsItemRepository};
use crate::models::{Comment, CreateCommentInput};

/// Comment service
pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
    news: Arc<dyn NewsItemRepository>,
}

impl CommentService {
    /// Create a new comment service
    pub fn new(comments: Arc<dyn CommentRepository>, news: Arc<dyn NewsItemRepository>) -> Self {
        Self { comments, news }
    }

    /// Submit a comment; it stays invisible until approved
    pub async fn create(&self, input: &CreateCommentInput) -> Result<Comment> {
        self.comments
            .create(input)
            .await
            .context("Failed to create comment")
    }

    /// Approve a pending comment.
    ///
    /// Returns true when the comment actually transitioned; only then is
    /// the item's comment counter incremented. Approving an already
    /// approved or deleted comment is a no-op.
    pub async fn approve(&self, id: i64) -> Result<bool> {
        let comment = match self
            .comments
            .get_by_id(id)
            .await
            .context("Failed to get comment")?
        {
            Some(comment) => comment,
            None => return Ok(false),
        };

        let transitioned = self
            .comments
            .approve(id)
            .await
            .context("Failed to approve comment")?;

        if transitioned {
            self.news
                .adjust_comment_count(comment.news_item_id, 1)
                .await
                .context("Failed to increment comment count")?;
        }

        Ok(transitioned)
    }

    /// Revoke approval. Decrements the item's counter only on an actual
    /// approved-to-pending transition.
    pub async fn unapprove(&self, id: i64) -> Result<bool> {
        let comment = match self
            .comments
            .get_by_id(id)
            .await
            .context("Failed to get comment")?
        {
            Some(comment) => comment,
            None => return Ok(false),
        };

        let transitioned = self
            .comments
            .unapprove(id)
            .await
            .context("Failed to unapprove comment")?;

        if transitioned {
            self.news
                .adjust_comment_count(comment.news_item_id, -1)
                .await
                .context("Failed to decrement comment count")?;
        }

        Ok(transitioned)
    }

    /// Soft-delete a comment, keeping the row. The item's counter drops
    /// only when the deleted comment was visible (approved and not
    /// already deleted).
    pub async fn soft_delete(&self, id: i64) -> Result<bool> {
        let comment = match self
            .comments
            .get_by_id(id)
            .await
            .context("Failed to get comment")?
        {
            Some(comment) => comment,
            None => return Ok(false),
        };

        let transitioned = self
            .comments
            .soft_delete(id)
            .await
            .context("Failed to soft-delete comment")?;

        if transitioned && comment.is_approved {
            self.news
                .adjust_comment_count(comment.news_item_id, -1)
                .await
                .context("Failed to decrement comment count")?;
        }

        Ok(transitioned)
    }

    /// Approved, non-deleted comments for an item, newest first
    pub async fn list_for_item(&self, news_item_id: i64) -> Result<Vec<Comment>> {
        self.comments
            .list_visible_for_item(news_item_id)
            .await
            .context("Failed to list comments")
    }

    /// Whether an identical comment already exists on an item
    pub async fn exists(
        &self,
        news_item_id: i64,
        user_email: &str,
        content: &str,
    ) -> Result<bool> {
        self.comments
            .exists(news_item_id, user_email, content)
            .await
            .context("Failed to check comment existence")
    }

    /// Number of approved, non-deleted comments
    pub async fn count(&self) -> Result<i64> {
        self.comments.count().await.context("Failed to count comments")
    }
}
