//! News API endpoints
//!
//! Handles the public news surface:
//! - GET /api/news - List active news with pagination and filters
//! - GET /api/news/{slug} - Get a single item by slug (counts the view)

use axum::{
    extract::{Path, Query, State},
    middleware as axum_middleware,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{self, ApiError, AppState};
use crate::models::{ListParams, NewsFilter};
use crate::services::NewsItemView;

/// Query parameters for listing news
#[derive(Debug, Deserialize)]
pub struct ListNewsQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    /// Filter by category name
    pub category: Option<String>,
    /// Filter by tag name
    pub tag: Option<String>,
    /// Only featured items
    pub featured: Option<bool>,
    /// Only breaking items
    pub breaking: Option<bool>,
}

fn default_page() -> u32 {
    1
}
fn default_per_page() -> u32 {
    10
}

/// Response for the news list
#[derive(Debug, Serialize)]
pub struct NewsListResponse {
    pub news: Vec<NewsItemView>,
    pub pagination: Pagination,
}

/// Pagination metadata attached to the news list
#[derive(Debug, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
    pub pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

/// Build the news router.
///
/// The listing and detail routes carry separate per-minute rate limits
/// on top of the shared hourly budget applied to all /api routes.
pub fn router(state: AppState) -> Router<AppState> {
    let list = Router::new()
        .route("/", get(list_news))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::rate_limit_list,
        ));

    let detail = Router::new()
        .route("/{slug}", get(get_news_item))
        .route_layer(axum_middleware::from_fn_with_state(
            state,
            middleware::rate_limit_detail,
        ));

    list.merge(detail)
}

/// GET /api/news - List active news items
async fn list_news(
    State(state): State<AppState>,
    Query(query): Query<ListNewsQuery>,
) -> Result<Json<NewsListResponse>, ApiError> {
    let filter = NewsFilter {
        category: query.category,
        tag: query.tag,
        featured: query.featured,
        breaking: query.breaking,
    };
    let params = ListParams::new(query.page, query.per_page);

    let page = state.news_service.list(&filter, &params).await?;

    Ok(Json(NewsListResponse {
        pagination: Pagination {
            page: page.page,
            per_page: page.per_page,
            total: page.total,
            pages: page.total_pages(),
            has_next: page.has_next(),
            has_prev: page.has_prev(),
        },
        news: page.items,
    }))
}

/// GET /api/news/{slug} - Get an active item by slug
async fn get_news_item(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<NewsItemView>, ApiError> {
    match state.news_service.get_by_slug(&slug).await? {
        Some(view) => Ok(Json(view)),
        None => Err(ApiError::not_found("news item not found")),
    }
}
