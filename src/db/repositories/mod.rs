//! Database repositories
//!
//! Repository pattern implementations for database access.
//! Each repository handles CRUD operations for a specific entity.

pub mod category;
pub mod comment;
pub mod news_item;
pub mod settings;
pub mod stats;
pub mod tag;

pub use category::{CategoryRepository, SqlxCategoryRepository};
pub use comment::{CommentRepository, SqlxCommentRepository};
pub use news_item::{NewsItemRepository, SqlxNewsItemRepository};
pub use settings::{SettingsRepository, SqlxSettingsRepository};
pub use stats::{SqlxStatsRepository, StatsRepository};
pub use tag::{SqlxTagRepository, TagRepository};
