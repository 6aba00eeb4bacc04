//! Category API endpoints
//!
//! Handles HTTP requests for categories:
//! - GET /api/categories - List active categories with news counts

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::api::middleware::{ApiError, AppState};
use crate::models::CategoryWithCount;

/// Response for the category list
#[derive(Debug, Serialize)]
pub struct CategoryListResponse {
    pub categories: Vec<CategoryWithCount>,
}

/// Build the categories router
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_categories))
}

/// GET /api/categories - List active categories ordered by display order
async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<CategoryListResponse>, ApiError> {
    let categories = state.category_service.list_with_counts().await?;
    Ok(Json(CategoryListResponse { categories }))
}
