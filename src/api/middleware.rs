//! API middleware
//!
//! Contains middleware for:
//! - API-key and admin-key gating
//! - Per-IP rate limiting with scoped quotas
//! - Security headers, X-Response-Time and request statistics

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::cache::Cache;
use crate::config::Config;
use crate::db::DynDatabasePool;
use crate::seed::SeedLoader;
use crate::services::{
    CategoryService, NewsService, RateLimitScope, RateLimiter, StatsService, TagService,
};

// ============================================================================
// Request Statistics
// ============================================================================

/// Lightweight request statistics using atomic operations (no locks)
pub struct RequestStats {
    /// Total number of requests processed
    total_requests: AtomicU64,
    /// Total response time in microseconds (for calculating average)
    total_response_time_us: AtomicU64,
    /// Application start time
    start_time: Instant,
}

impl RequestStats {
    /// Create new stats tracker
    pub fn new() -> Self {
        Self {
            total_requests: AtomicU64::new(0),
            total_response_time_us: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record a request with its response time
    pub fn record(&self, duration_us: u64) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        self.total_response_time_us
            .fetch_add(duration_us, Ordering::Relaxed);
    }

    /// Get total request count
    pub fn total_requests(&self) -> u64 {
        self.total_requests.load(Ordering::Relaxed)
    }

    /// Get average response time in microseconds
    pub fn avg_response_time_us(&self) -> f64 {
        let total = self.total_requests.load(Ordering::Relaxed);
        if total == 0 {
            return 0.0;
        }
        let total_time = self.total_response_time_us.load(Ordering::Relaxed);
        total_time as f64 / total as f64
    }

    /// Get uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

impl Default for RequestStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub pool: DynDatabasePool,
    pub cache: Arc<Cache>,
    pub news_service: Arc<NewsService>,
    pub category_service: Arc<CategoryService>,
    pub tag_service: Arc<TagService>,
    pub stats_service: Arc<StatsService>,
    pub seed_loader: Arc<SeedLoader>,
    pub rate_limiter: Arc<RateLimiter>,
    pub request_stats: Arc<RequestStats>,
}

// ============================================================================
// Error envelope
// ============================================================================

/// API error with the flat `{"error": message}` response body
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn too_many_requests() -> Self {
        Self::new(StatusCode::TOO_MANY_REQUESTS, "rate limit exceeded")
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        tracing::error!(error = ?err, "Request failed");
        Self::internal("internal server error")
    }
}

// ============================================================================
// Client identification
// ============================================================================

/// Resolve the client IP: first hop of X-Forwarded-For when present,
/// falling back to the connection's socket address.
pub fn client_ip(request: &Request) -> IpAddr {
    if let Some(forwarded) = request.headers().get("x-forwarded-for") {
        if let Ok(value) = forwarded.to_str() {
            if let Some(first) = value.split(',').next() {
                if let Ok(ip) = first.trim().parse::<IpAddr>() {
                    return ip;
                }
            }
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

// ============================================================================
// Key gating
// ============================================================================

/// Require a matching X-API-Key header
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let provided = request
        .headers()
        .get("x-api-key")
        .and_then(|v| v.to_str().ok());

    match provided {
        Some(key) if key == state.config.security.api_key => Ok(next.run(request).await),
        _ => Err(ApiError::unauthorized("invalid or missing API key")),
    }
}

/// Require a matching X-Admin-Key header
pub async fn require_admin_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let provided = request
        .headers()
        .get("x-admin-key")
        .and_then(|v| v.to_str().ok());

    match provided {
        Some(key) if key == state.config.security.admin_key => Ok(next.run(request).await),
        _ => Err(ApiError::unauthorized("invalid or missing admin key")),
    }
}

// ============================================================================
// Rate limiting
// ============================================================================

async fn rate_limit(
    state: &AppState,
    scope: RateLimitScope,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let ip = client_ip(&request);
    if state.rate_limiter.check_and_record(scope, ip).await {
        Ok(next.run(request).await)
    } else {
        tracing::debug!(%ip, ?scope, "Rate limit exceeded");
        Err(ApiError::too_many_requests())
    }
}

/// Hourly budget shared by all /api routes
pub async fn rate_limit_default(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    rate_limit(&state, RateLimitScope::Default, request, next).await
}

/// Per-minute budget for the news listing
pub async fn rate_limit_list(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    rate_limit(&state, RateLimitScope::List, request, next).await
}

/// Per-minute budget for news detail
pub async fn rate_limit_detail(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    rate_limit(&state, RateLimitScope::Detail, request, next).await
}

// ============================================================================
// Response decoration
// ============================================================================

/// Outermost middleware: times the request, stamps X-Response-Time and
/// the security headers, and feeds the request statistics.
pub async fn request_meta_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();

    let mut response = next.run(request).await;

    let elapsed = start.elapsed();
    state.request_stats.record(elapsed.as_micros() as u64);

    let headers = response.headers_mut();
    headers.insert("x-content-type-options", HeaderValue::from_static("nosniff"));
    headers.insert("x-frame-options", HeaderValue::from_static("DENY"));
    headers.insert(
        "x-xss-protection",
        HeaderValue::from_static("1; mode=block"),
    );
    if let Ok(value) = HeaderValue::from_str(&format!("{}ms", elapsed.as_millis())) {
        headers.insert("x-response-time", value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use std::str::FromStr;

    fn request_with_headers(headers: &[(&str, &str)]) -> Request<Body> {
        let mut builder = Request::builder().uri("/test");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_client_ip_from_forwarded_first_hop() {
        let request =
            request_with_headers(&[("x-forwarded-for", "203.0.113.7, 10.0.0.1, 10.0.0.2")]);
        assert_eq!(
            client_ip(&request),
            IpAddr::from_str("203.0.113.7").unwrap()
        );
    }

    #[test]
    fn test_client_ip_falls_back_to_socket() {
        let mut request = request_with_headers(&[]);
        let addr = SocketAddr::from_str("192.0.2.4:1234").unwrap();
        request.extensions_mut().insert(ConnectInfo(addr));
        assert_eq!(client_ip(&request), IpAddr::from_str("192.0.2.4").unwrap());
    }

    #[test]
    fn test_client_ip_ignores_garbage_forwarded() {
        let mut request = request_with_headers(&[("x-forwarded-for", "not-an-ip")]);
        let addr = SocketAddr::from_str("192.0.2.9:1234").unwrap();
        request.extensions_mut().insert(ConnectInfo(addr));
        assert_eq!(client_ip(&request), IpAddr::from_str("192.0.2.9").unwrap());
    }

    #[test]
    fn test_client_ip_without_any_source() {
        let request = request_with_headers(&[]);
        assert_eq!(client_ip(&request), IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    }

    #[test]
    fn test_request_stats_average() {
        let stats = RequestStats::new();
        assert_eq!(stats.avg_response_time_us(), 0.0);

        stats.record(100);
        stats.record(300);
        assert_eq!(stats.total_requests(), 2);
        assert_eq!(stats.avg_response_time_us(), 200.0);
    }

    #[test]
    fn test_api_error_envelope_is_flat() {
        let error = ApiError::not_found("missing");
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
