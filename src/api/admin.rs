//! Admin API endpoints
//!
//! Handles administrative operations:
//! - POST /api/admin/load-data - Load the embedded seed dataset
//!
//! Gated by the X-Admin-Key header (applied in the router).

use axum::{extract::State, routing::post, Json, Router};
use serde::Serialize;

use crate::api::middleware::{ApiError, AppState};
use crate::seed::SeedReport;

/// Response for a load-data run
#[derive(Debug, Serialize)]
pub struct LoadDataResponse {
    pub message: String,
    pub loaded: SeedReport,
}

/// Build the admin router
pub fn router() -> Router<AppState> {
    Router::new().route("/load-data", post(load_data))
}

/// POST /api/admin/load-data - Idempotently load the seed dataset
///
/// Safe to call repeatedly: existing rows are matched by their natural
/// keys and skipped. The cached category and tag listings are
/// invalidated afterwards so the loaded data is visible immediately;
/// news listings are uncached and need no invalidation.
async fn load_data(State(state): State<AppState>) -> Result<Json<LoadDataResponse>, ApiError> {
    let report = state.seed_loader.load().await?;

    state.category_service.invalidate_cache().await;
    state.tag_service.invalidate_cache().await;

    Ok(Json(LoadDataResponse {
        message: "data loaded".to_string(),
        loaded: report,
    }))
}
