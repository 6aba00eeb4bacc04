//! Services layer - Business logic
//!
//! This module contains all business logic services for the news
//! delivery system. Services are responsible for:
//! - Implementing business rules
//! - Coordinating between repositories and cache
//! - Handling validation and error cases

pub mod category;
pub mod comment;
pub mod news;
pub mod rate_limiter;
pub mod settings;
pub mod stats;
pub mod tag;

pub use category::CategoryService;
pub use comment::CommentService;
pub use news::{CategorySummary, NewsItemView, NewsService};
pub use rate_limiter::{RateLimitScope, RateLimiter};
pub use settings::SettingsService;
pub use stats::{ServiceOverview, StatsService};
pub use tag::TagService;
