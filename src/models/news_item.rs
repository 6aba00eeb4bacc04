//! News item model
//!
//! This module provides:
//! - `NewsItem` entity representing a single news article
//! - `NewsStatus` enum for publication states
//! - Input types for creating news items
//! - Pagination and filter types for list queries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// News item entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    /// Unique identifier
    pub id: i64,
    /// Arabic title
    pub title: String,
    /// English title
    pub title_en: Option<String>,
    /// URL-friendly slug
    pub slug: String,
    /// Arabic summary
    pub summary: String,
    /// English summary
    pub summary_en: Option<String>,
    /// Arabic body content
    pub content: String,
    /// English body content
    pub content_en: Option<String>,
    /// Featured image URL
    pub featured_image: Option<String>,
    /// Alt text for the featured image
    pub featured_image_alt: Option<String>,
    /// Gallery image URLs (JSON array)
    #[serde(default = "default_gallery")]
    pub gallery_images: serde_json::Value,
    /// Category ID
    pub category_id: i64,
    /// Publication status
    pub status: NewsStatus,
    /// Whether the item is published
    pub is_published: bool,
    /// Whether the item is featured on the front page
    pub is_featured: bool,
    /// Whether the item is breaking news
    pub is_breaking: bool,
    /// Display priority (higher sorts first)
    pub priority: i32,
    /// Publication timestamp
    pub published_at: Option<DateTime<Utc>>,
    /// Expiry timestamp; the item is hidden after this
    pub expires_at: Option<DateTime<Utc>>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
    /// Author user ID (external)
    pub author_id: Option<i64>,
    /// Author display name
    pub author_name: Option<String>,
    /// Editor user ID (external)
    pub editor_id: Option<i64>,
    /// View count
    #[serde(default)]
    pub view_count: i64,
    /// Like count
    #[serde(default)]
    pub like_count: i64,
    /// Share count
    #[serde(default)]
    pub share_count: i64,
    /// Approved comment count
    #[serde(default)]
    pub comment_count: i64,
    /// SEO meta title
    pub meta_title: Option<String>,
    /// SEO meta description
    pub meta_description: Option<String>,
    /// SEO meta keywords
    pub meta_keywords: Option<String>,
}

fn default_gallery() -> serde_json::Value {
    serde_json::json!([])
}

impl NewsItem {
    /// Whether the item is currently visible to readers: published and
    /// not expired. `published_at` is display metadata, not a gate; an
    /// item with a missing or future publication time is still served.
    pub fn is_active(&self) -> bool {
        self.is_published && self.expires_at.map(|e| e > Utc::now()).unwrap_or(true)
    }
}

/// News item publication status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsStatus {
    /// Draft - not visible to public
    Draft,
    /// Published - visible to public
    Published,
    /// Archived - hidden but not deleted
    Archived,
}

impl Default for NewsStatus {
    fn default() -> Self {
        Self::Draft
    }
}

impl NewsStatus {
    /// Convert status to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            NewsStatus::Draft => "draft",
            NewsStatus::Published => "published",
            NewsStatus::Archived => "archived",
        }
    }

    /// Parse status from database string representation
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(NewsStatus::Draft),
            "published" => Some(NewsStatus::Published),
            "archived" => Some(NewsStatus::Archived),
            _ => None,
        }
    }
}

impl std::fmt::Display for NewsStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Input for creating a new news item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNewsItemInput {
    pub title: String,
    pub title_en: Option<String>,
    pub slug: String,
    pub summary: String,
    pub summary_en: Option<String>,
    pub content: String,
    pub content_en: Option<String>,
    pub category_id: i64,
    pub status: Option<NewsStatus>,
    pub is_published: bool,
    pub is_featured: bool,
    pub is_breaking: bool,
    pub priority: i32,
    pub published_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub author_name: Option<String>,
    pub view_count: i64,
    pub like_count: i64,
    pub share_count: i64,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
}

impl CreateNewsItemInput {
    /// Create a minimal published input; counters start at zero.
    pub fn new(title: String, slug: String, summary: String, content: String, category_id: i64) -> Self {
        Self {
            title,
            title_en: None,
            slug,
            summary,
            summary_en: None,
            content,
            content_en: None,
            category_id,
            status: Some(NewsStatus::Published),
            is_published: true,
            is_featured: false,
            is_breaking: false,
            priority: 0,
            published_at: Some(Utc::now()),
            expires_at: None,
            author_name: None,
            view_count: 0,
            like_count: 0,
            share_count: 0,
            meta_title: None,
            meta_description: None,
        }
    }

    /// Mark as featured
    pub fn with_featured(mut self, featured: bool) -> Self {
        self.is_featured = featured;
        self
    }

    /// Mark as breaking news
    pub fn with_breaking(mut self, breaking: bool) -> Self {
        self.is_breaking = breaking;
        self
    }

    /// Set the display priority
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Set the publication timestamp
    pub fn with_published_at(mut self, published_at: DateTime<Utc>) -> Self {
        self.published_at = Some(published_at);
        self
    }

    /// Set the author display name
    pub fn with_author_name(mut self, author_name: String) -> Self {
        self.author_name = Some(author_name);
        self
    }
}

/// Filters for news list queries
#[derive(Debug, Clone, Default)]
pub struct NewsFilter {
    /// Restrict to a category (by category name)
    pub category: Option<String>,
    /// Restrict to items carrying this tag (by tag name)
    pub tag: Option<String>,
    /// Restrict to featured items
    pub featured: Option<bool>,
    /// Restrict to breaking items
    pub breaking: Option<bool>,
}

impl NewsFilter {
    /// Check if any filter is set
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.tag.is_none()
            && self.featured.is_none()
            && self.breaking.is_none()
    }
}

/// Pagination parameters for list queries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListParams {
    /// Page number (1-indexed)
    pub page: u32,
    /// Number of items per page
    pub per_page: u32,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 10,
        }
    }
}

impl ListParams {
    /// Create new pagination parameters.
    ///
    /// Out-of-range values are clamped rather than rejected: page is at
    /// least 1 and per_page is capped at 50.
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, 50),
        }
    }

    /// Calculate the offset for database queries.
    ///
    /// Computed in i64 so page numbers near u32::MAX cannot overflow.
    pub fn offset(&self) -> i64 {
        (i64::from(self.page.max(1)) - 1) * i64::from(self.per_page)
    }

    /// Get the limit for database queries
    pub fn limit(&self) -> i64 {
        self.per_page as i64
    }
}

/// Paginated result container
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedResult<T> {
    /// Items in the current page
    pub items: Vec<T>,
    /// Total number of items across all pages
    pub total: i64,
    /// Current page number (1-indexed)
    pub page: u32,
    /// Number of items per page
    pub per_page: u32,
}

impl<T> PagedResult<T> {
    /// Create a new paginated result
    pub fn new(items: Vec<T>, total: i64, params: &ListParams) -> Self {
        Self {
            items,
            total,
            page: params.page,
            per_page: params.per_page,
        }
    }

    /// Calculate the total number of pages
    pub fn total_pages(&self) -> u32 {
        if self.per_page == 0 {
            return 0;
        }
        ((self.total as u32) + self.per_page - 1) / self.per_page
    }

    /// Check if there is a next page
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Check if there is a previous page
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Check if the result is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the number of items in the current page
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl<T> Default for PagedResult<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: 1,
            per_page: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_item() -> NewsItem {
        let now = Utc::now();
        NewsItem {
            id: 1,
            title: "عنوان".to_string(),
            title_en: Some("Title".to_string()),
            slug: "sample-item".to_string(),
            summary: "ملخص".to_string(),
            summary_en: None,
            content: "محتوى".to_string(),
            content_en: None,
            featured_image: None,
            featured_image_alt: None,
            gallery_images: serde_json::json!([]),
            category_id: 1,
            status: NewsStatus::Published,
            is_published: true,
            is_featured: false,
            is_breaking: false,
            priority: 0,
            published_at: Some(now - Duration::hours(1)),
            expires_at: None,
            created_at: now,
            updated_at: now,
            author_id: None,
            author_name: None,
            editor_id: None,
            view_count: 0,
            like_count: 0,
            share_count: 0,
            comment_count: 0,
            meta_title: None,
            meta_description: None,
            meta_keywords: None,
        }
    }

    #[test]
    fn test_is_active_published() {
        let item = sample_item();
        assert!(item.is_active());
    }

    #[test]
    fn test_is_active_draft() {
        let mut item = sample_item();
        item.status = NewsStatus::Draft;
        item.is_published = false;
        assert!(!item.is_active());
    }

    #[test]
    fn test_is_active_ignores_publication_time() {
        // published_at is display metadata; a published item is served
        // even when the timestamp is missing or in the future
        let mut item = sample_item();
        item.published_at = Some(Utc::now() + Duration::hours(1));
        assert!(item.is_active());

        item.published_at = None;
        assert!(item.is_active());
    }

    #[test]
    fn test_is_active_unpublished() {
        let mut item = sample_item();
        item.is_published = false;
        assert!(!item.is_active());
    }

    #[test]
    fn test_is_active_expired() {
        let mut item = sample_item();
        item.expires_at = Some(Utc::now() - Duration::minutes(5));
        assert!(!item.is_active());
    }

    #[test]
    fn test_is_active_not_yet_expired() {
        let mut item = sample_item();
        item.expires_at = Some(Utc::now() + Duration::hours(24));
        assert!(item.is_active());
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [NewsStatus::Draft, NewsStatus::Published, NewsStatus::Archived] {
            assert_eq!(NewsStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(NewsStatus::from_str("PUBLISHED"), Some(NewsStatus::Published));
        assert_eq!(NewsStatus::from_str("unknown"), None);
    }

    #[test]
    fn test_list_params_defaults() {
        let params = ListParams::default();
        assert_eq!(params.page, 1);
        assert_eq!(params.per_page, 10);
    }

    #[test]
    fn test_list_params_clamps_page() {
        let params = ListParams::new(0, 10);
        assert_eq!(params.page, 1);
    }

    #[test]
    fn test_list_params_clamps_per_page_to_cap() {
        assert_eq!(ListParams::new(1, 51).per_page, 50);
        assert_eq!(ListParams::new(1, 1000).per_page, 50);
        assert_eq!(ListParams::new(1, 0).per_page, 1);
        assert_eq!(ListParams::new(1, 50).per_page, 50);
    }

    #[test]
    fn test_list_params_offset() {
        assert_eq!(ListParams::new(1, 10).offset(), 0);
        assert_eq!(ListParams::new(3, 10).offset(), 20);
        assert_eq!(ListParams::new(2, 50).offset(), 50);
    }

    #[test]
    fn test_list_params_offset_max_page() {
        let params = ListParams::new(u32::MAX, 50);
        assert_eq!(params.offset(), (i64::from(u32::MAX) - 1) * 50);
    }

    #[test]
    fn test_paged_result_metadata() {
        let params = ListParams::new(2, 10);
        let result = PagedResult::new(vec![1, 2, 3], 25, &params);

        assert_eq!(result.total_pages(), 3);
        assert!(result.has_next());
        assert!(result.has_prev());
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_paged_result_beyond_last_page() {
        let params = ListParams::new(10, 10);
        let result: PagedResult<i32> = PagedResult::new(vec![], 25, &params);

        assert!(result.is_empty());
        assert_eq!(result.total, 25);
        assert_eq!(result.total_pages(), 3);
        assert!(!result.has_next());
        assert!(result.has_prev());
    }

    #[test]
    fn test_paged_result_empty_total() {
        let params = ListParams::new(1, 10);
        let result: PagedResult<i32> = PagedResult::new(vec![], 0, &params);

        assert_eq!(result.total_pages(), 0);
        assert!(!result.has_next());
        assert!(!result.has_prev());
    }

    #[test]
    fn test_news_filter_is_empty() {
        assert!(NewsFilter::default().is_empty());
        let filter = NewsFilter {
            breaking: Some(true),
            ..Default::default()
        };
        assert!(!filter.is_empty());
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        /// Pagination parameters always land within their valid ranges,
        /// for any page/per_page the API can deserialize.
        #[test]
        fn property_list_params_always_in_range(page in any::<u32>(), per_page in any::<u32>()) {
            let params = ListParams::new(page, per_page);
            prop_assert!(params.page >= 1);
            prop_assert!(params.per_page >= 1 && params.per_page <= 50);
            prop_assert!(params.offset() >= 0);
            prop_assert_eq!(params.offset(), (i64::from(params.page) - 1) * i64::from(params.per_page));
            prop_assert_eq!(params.limit(), params.per_page as i64);
        }

        /// Page metadata is consistent: has_next and has_prev agree with
        /// total_pages for any total.
        #[test]
        fn property_paged_result_flags_consistent(
            page in 1u32..200,
            per_page in 1u32..=50,
            total in 0i64..5000,
        ) {
            let params = ListParams::new(page, per_page);
            let result: PagedResult<i32> = PagedResult::new(vec![], total, &params);

            let pages = result.total_pages();
            prop_assert_eq!(result.has_next(), params.page < pages);
            prop_assert_eq!(result.has_prev(), params.page > 1);
            // Enough pages to hold every item
            prop_assert!((pages as i64) * (per_page as i64) >= total);
        }
    }
}
