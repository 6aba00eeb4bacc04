//! Tag API endpoints
//!
//! Handles HTTP requests for tags:
//! - GET /api/tags - List the most used active tags

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::api::middleware::{ApiError, AppState};
use crate::models::Tag;

/// Response for the tag list
#[derive(Debug, Serialize)]
pub struct TagListResponse {
    pub tags: Vec<Tag>,
}

/// Build the tags router
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_tags))
}

/// GET /api/tags - List active tags by usage, most used first
async fn list_tags(State(state): State<AppState>) -> Result<Json<TagListResponse>, ApiError> {
    let tags = state.tag_service.top_tags().await?;
    Ok(Json(TagListResponse { tags }))
}
