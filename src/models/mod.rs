//! Data models
//!
//! This module contains all data structures used throughout the news service.
//! Models represent:
//! - Database entities (NewsItem, Category, Tag, Comment, DailyStat, Setting)
//! - API request/response types
//! - Internal data transfer objects

mod category;
mod comment;
mod news_item;
mod setting;
mod stats;
mod tag;

pub use category::{Category, CategoryWithCount, CreateCategoryInput};
pub use comment::{Comment, CreateCommentInput};
pub use news_item::{
    CreateNewsItemInput, ListParams, NewsFilter, NewsItem, NewsStatus, PagedResult,
};
pub use setting::{Setting, SettingType, SettingValue};
pub use stats::{DailyMetrics, DailyStat, DailySummary};
pub use tag::{CreateTagInput, Tag};
