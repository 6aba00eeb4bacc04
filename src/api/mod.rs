//! API layer - HTTP endpoints and routing
//!
//! This module wires the HTTP surface:
//! - /api/news - public news listing and detail
//! - /api/categories, /api/tags - taxonomy listings
//! - /api/stats - service statistics (X-API-Key gated)
//! - /api/admin - data loading (X-Admin-Key gated)
//! - /health - liveness and dependency status
//!
//! All /api routes share a default hourly rate limit per client IP;
//! the news listing and detail routes carry tighter per-minute limits
//! on top of it.

pub mod admin;
pub mod categories;
pub mod health;
pub mod middleware;
pub mod news;
pub mod stats;
pub mod tags;

use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

pub use middleware::{ApiError, AppState, RequestStats};

/// Build the /api router with rate limits and key gates applied
pub fn build_api_router(state: AppState) -> Router<AppState> {
    let stats_routes = stats::router().route_layer(axum_middleware::from_fn_with_state(
        state.clone(),
        middleware::require_api_key,
    ));

    let admin_routes = admin::router().route_layer(axum_middleware::from_fn_with_state(
        state.clone(),
        middleware::require_admin_key,
    ));

    Router::new()
        .nest("/news", news::router(state.clone()))
        .nest("/categories", categories::router())
        .nest("/tags", tags::router())
        .nest("/stats", stats_routes)
        .nest("/admin", admin_routes)
        .route_layer(axum_middleware::from_fn_with_state(
            state,
            middleware::rate_limit_default,
        ))
}

/// Build the complete application router
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    let cors = build_cors_layer(cors_origin);

    Router::new()
        .nest("/api", build_api_router(state.clone()))
        .merge(health::router())
        .layer(cors)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::request_meta_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn build_cors_layer(cors_origin: &str) -> CorsLayer {
    let allow_origin = if cors_origin == "*" {
        AllowOrigin::any()
    } else {
        match cors_origin.parse::<HeaderValue>() {
            Ok(origin) => AllowOrigin::exact(origin),
            Err(_) => {
                tracing::warn!(origin = %cors_origin, "Invalid CORS origin, denying cross-origin requests");
                AllowOrigin::list(Vec::new())
            }
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            header::HeaderName::from_static("x-api-key"),
            header::HeaderName::from_static("x-admin-key"),
        ])
}
