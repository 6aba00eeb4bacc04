//! Statistics API endpoints
//!
//! Handles HTTP requests for service statistics:
//! - GET /api/stats - Aggregated totals plus today's engagement
//!
//! Gated by the X-API-Key header (applied in the router).

use axum::{extract::State, routing::get, Json, Router};

use crate::api::middleware::{ApiError, AppState};
use crate::services::ServiceOverview;

/// Build the stats router
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_stats))
}

/// GET /api/stats - Service-wide totals and today's engagement
async fn get_stats(State(state): State<AppState>) -> Result<Json<ServiceOverview>, ApiError> {
    let overview = state.stats_service.overview().await?;
    Ok(Json(overview))
}
