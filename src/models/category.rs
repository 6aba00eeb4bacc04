//! Category model
//!
//! This module defines the Category entity and related types for the news
//! service. Categories carry bilingual names, a presentation icon and
//! color, and an explicit display order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category entity representing a news category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    /// Unique identifier
    pub id: i64,
    /// Arabic name (unique)
    pub name: String,
    /// English name
    pub name_en: Option<String>,
    /// Arabic description
    pub description: Option<String>,
    /// English description
    pub description_en: Option<String>,
    /// Presentation icon (emoji or icon name)
    pub icon: Option<String>,
    /// Presentation color (hex)
    pub color: Option<String>,
    /// Sort order in listings (lower first)
    pub display_order: i32,
    /// Whether the category is visible
    pub is_active: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Create a new Category with the given parameters.
    ///
    /// The ID will be set to 0 and should be assigned by the database.
    pub fn new(name: String, name_en: Option<String>, display_order: i32) -> Self {
        let now = Utc::now();
        Self {
            id: 0, // Will be set by the database
            name,
            name_en,
            description: None,
            description_en: None,
            icon: None,
            color: None,
            display_order,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Category with its published news count, for listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryWithCount {
    /// The category itself
    #[serde(flatten)]
    pub category: Category,
    /// Number of published news items in this category
    pub news_count: i64,
}

impl CategoryWithCount {
    /// Create a new CategoryWithCount
    pub fn new(category: Category, news_count: i64) -> Self {
        Self {
            category,
            news_count,
        }
    }
}

/// Input for creating a new category
#[derive(Debug, Clone)]
pub struct CreateCategoryInput {
    /// Arabic name (unique)
    pub name: String,
    /// English name
    pub name_en: Option<String>,
    /// Arabic description
    pub description: Option<String>,
    /// English description
    pub description_en: Option<String>,
    /// Presentation icon
    pub icon: Option<String>,
    /// Presentation color
    pub color: Option<String>,
    /// Sort order in listings
    pub display_order: i32,
}
