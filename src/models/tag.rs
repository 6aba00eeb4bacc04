//! Tag model
//!
//! This module defines the Tag entity for the news service. Tags label
//! news items across categories; `usage_count` tracks how many times a
//! tag has been attached and drives the popular-tags listing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tag entity representing a news tag.
///
/// `usage_count` only ever grows: attaching a tag increments it, but
/// detaching or deleting the item does not decrement it. It records
/// lifetime usage, not current association count.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tag {
    /// Unique identifier
    pub id: i64,
    /// Arabic name (unique)
    pub name: String,
    /// English name
    pub name_en: Option<String>,
    /// Description
    pub description: Option<String>,
    /// Presentation color (hex)
    pub color: Option<String>,
    /// Lifetime attach count
    pub usage_count: i64,
    /// Whether the tag is visible
    pub is_active: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Tag {
    /// Create a new Tag with the given parameters.
    ///
    /// The ID will be set to 0 and should be assigned by the database.
    pub fn new(name: String, name_en: Option<String>) -> Self {
        Self {
            id: 0, // Will be set by the database
            name,
            name_en,
            description: None,
            color: None,
            usage_count: 0,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}

/// Input for creating a new tag
#[derive(Debug, Clone)]
pub struct CreateTagInput {
    /// Arabic name (unique)
    pub name: String,
    /// English name
    pub name_en: Option<String>,
    /// Description
    pub description: Option<String>,
    /// Presentation color
    pub color: Option<String>,
}
