//! Health check endpoint
//!
//! GET /health reports service identity, uptime and the state of the
//! database and cache. It sits outside /api, so it carries no rate
//! limit and no key gating.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;
use std::time::Duration;

use crate::api::middleware::AppState;
use crate::cache::CacheLayer;

/// Response for the health check
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub service: String,
    pub version: String,
    pub status: String,
    pub timestamp: String,
    pub uptime_seconds: u64,
    pub database: String,
    pub cache: String,
}

/// Build the health router
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// GET /health - Liveness and dependency status
///
/// Returns 200 when the database answers a ping, 500 otherwise. A cache
/// probe failure is reported in the body but does not fail the check,
/// since the service degrades to direct database reads without it.
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database_up = match state.pool.ping().await {
        Ok(()) => true,
        Err(err) => {
            tracing::error!(error = %err, "Health check: database ping failed");
            false
        }
    };

    let cache_up = match state
        .cache
        .set("health:probe", &true, Duration::from_secs(5))
        .await
    {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(error = %err, "Health check: cache probe failed");
            false
        }
    };

    let status = if database_up {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    let response = HealthResponse {
        service: "naebak-news".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: if database_up { "healthy" } else { "unhealthy" }.to_string(),
        timestamp: Utc::now().to_rfc3339(),
        uptime_seconds: state.request_stats.uptime_seconds(),
        database: if database_up { "up" } else { "down" }.to_string(),
        cache: if cache_up { "up" } else { "down" }.to_string(),
    };

    (status, Json(response))
}
