//! Comment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reader comment on a news item.
///
/// Comments go through moderation: they start unapproved and only count
/// toward the item's `comment_count` while approved and not deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub news_item_id: i64,
    pub user_id: Option<i64>,
    pub user_name: String,
    pub user_email: String,
    pub content: String,
    pub is_approved: bool,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
}

impl Comment {
    /// Whether the comment is visible to readers
    pub fn is_visible(&self) -> bool {
        self.is_approved && !self.is_deleted
    }
}

/// Input for creating a comment
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCommentInput {
    pub news_item_id: i64,
    pub user_name: String,
    pub user_email: String,
    pub content: String,
}
