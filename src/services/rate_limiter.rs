//! Request rate limiter
//!
//! Sliding-window limiter keyed by (scope, client IP). Scopes carry
//! their own quotas: a default hourly budget for all API routes plus
//! tighter per-minute budgets for the news listing and detail routes.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::RateLimitConfig;

/// Quota scope for a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateLimitScope {
    /// All /api routes (per hour)
    Default,
    /// News listing (per minute)
    List,
    /// News detail (per minute)
    Detail,
}

impl RateLimitScope {
    fn window(&self) -> Duration {
        match self {
            RateLimitScope::Default => Duration::hours(1),
            RateLimitScope::List | RateLimitScope::Detail => Duration::minutes(1),
        }
    }

    fn quota(&self, config: &RateLimitConfig) -> u32 {
        match self {
            RateLimitScope::Default => config.default_per_hour,
            RateLimitScope::List => config.list_per_minute,
            RateLimitScope::Detail => config.detail_per_minute,
        }
    }
}

/// Sliding-window request rate limiter
pub struct RateLimiter {
    config: RateLimitConfig,
    /// Request timestamps per (scope, IP)
    windows: Arc<RwLock<HashMap<(RateLimitScope, IpAddr), Vec<DateTime<Utc>>>>>,
}

impl RateLimiter {
    /// Create a new rate limiter
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Check the quota for (scope, ip) and record the request.
    ///
    /// Returns true when the request is allowed. Denied requests are not
    /// recorded, so a client hammering a full window does not extend its
    /// own lockout. Always allows when limiting is disabled.
    pub async fn check_and_record(&self, scope: RateLimitScope, ip: IpAddr) -> bool {
        if !self.config.enabled {
            return true;
        }

        let now = Utc::now();
        let cutoff = now - scope.window();
        let quota = scope.quota(&self.config) as usize;

        let mut windows = self.windows.write().await;
        let timestamps = windows.entry((scope, ip)).or_insert_with(Vec::new);

        timestamps.retain(|time| *time > cutoff);

        if timestamps.len() >= quota {
            return false;
        }

        timestamps.push(now);
        true
    }

    /// Drop stale windows (called periodically from a background task)
    pub async fn cleanup(&self) {
        let now = Utc::now();

        let mut windows = self.windows.write().await;
        windows.retain(|(scope, _), timestamps| {
            let cutoff = now - scope.window();
            timestamps.retain(|time| *time > cutoff);
            !timestamps.is_empty()
        });
    }

    /// Number of tracked (scope, IP) windows
    pub async fn tracked_windows(&self) -> usize {
        self.windows.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn config(enabled: bool) -> RateLimitConfig {
        RateLimitConfig {
            enabled,
            default_per_hour: 100,
            list_per_minute: 3,
            detail_per_minute: 2,
        }
    }

    #[tokio::test]
    async fn test_quota_enforced_per_scope() {
        let limiter = RateLimiter::new(config(true));
        let ip = IpAddr::from_str("10.0.0.1").unwrap();

        for _ in 0..3 {
            assert!(limiter.check_and_record(RateLimitScope::List, ip).await);
        }
        assert!(!limiter.check_and_record(RateLimitScope::List, ip).await);

        // The detail scope has its own window
        assert!(limiter.check_and_record(RateLimitScope::Detail, ip).await);
        assert!(limiter.check_and_record(RateLimitScope::Detail, ip).await);
        assert!(!limiter.check_and_record(RateLimitScope::Detail, ip).await);
    }

    #[tokio::test]
    async fn test_quotas_are_per_ip() {
        let limiter = RateLimiter::new(config(true));
        let first = IpAddr::from_str("10.0.0.1").unwrap();
        let second = IpAddr::from_str("10.0.0.2").unwrap();

        for _ in 0..3 {
            assert!(limiter.check_and_record(RateLimitScope::List, first).await);
        }
        assert!(!limiter.check_and_record(RateLimitScope::List, first).await);

        // A different client is unaffected
        assert!(limiter.check_and_record(RateLimitScope::List, second).await);
    }

    #[tokio::test]
    async fn test_denied_requests_do_not_extend_window() {
        let limiter = RateLimiter::new(config(true));
        let ip = IpAddr::from_str("10.0.0.3").unwrap();

        for _ in 0..3 {
            limiter.check_and_record(RateLimitScope::List, ip).await;
        }

        // Denials leave exactly the quota's worth of timestamps behind
        for _ in 0..10 {
            assert!(!limiter.check_and_record(RateLimitScope::List, ip).await);
        }

        let windows = limiter.windows.read().await;
        let timestamps = windows.get(&(RateLimitScope::List, ip)).unwrap();
        assert_eq!(timestamps.len(), 3);
    }

    #[tokio::test]
    async fn test_disabled_limiter_allows_everything() {
        let limiter = RateLimiter::new(config(false));
        let ip = IpAddr::from_str("10.0.0.4").unwrap();

        for _ in 0..100 {
            assert!(limiter.check_and_record(RateLimitScope::Detail, ip).await);
        }
    }

    #[tokio::test]
    async fn test_cleanup_drops_empty_windows() {
        let limiter = RateLimiter::new(config(true));
        let ip = IpAddr::from_str("10.0.0.5").unwrap();

        limiter.check_and_record(RateLimitScope::List, ip).await;
        assert_eq!(limiter.tracked_windows().await, 1);

        // Recent entries survive cleanup
        limiter.cleanup().await;
        assert_eq!(limiter.tracked_windows().await, 1);
    }
}
