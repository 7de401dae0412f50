//! Request pacing for management endpoints
//!
//! Unisphere and the VPLEX management server answer slowly under load. When
//! `requests_per_second` is set, every GET of a client first takes a token
//! from a governor bucket.

use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as Governor};
use std::num::NonZeroU32;
use std::sync::Arc;

type DirectLimiter = Governor<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>;

/// Pace of one client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimiterConfig {
    /// Sustained requests per second
    pub requests_per_second: u32,
    /// Requests allowed back to back before pacing starts
    pub burst_size: u32,
}

impl RateLimiterConfig {
    pub fn new(requests_per_second: u32, burst_size: u32) -> Self {
        Self {
            requests_per_second,
            burst_size,
        }
    }

    /// `requests_per_second` with an equal burst; zero means unlimited
    pub fn per_second(requests_per_second: u32) -> Option<Self> {
        (requests_per_second > 0).then(|| Self::new(requests_per_second, requests_per_second))
    }

    fn quota(&self) -> Quota {
        let rate = NonZeroU32::new(self.requests_per_second).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(self.burst_size).unwrap_or(rate);
        Quota::per_second(rate).allow_burst(burst)
    }
}

/// Token bucket shared by the clones of one client
#[derive(Clone)]
pub struct RateLimiter {
    limiter: Arc<DirectLimiter>,
}

impl RateLimiter {
    pub fn new(config: &RateLimiterConfig) -> Self {
        Self {
            limiter: Arc::new(Governor::direct(config.quota())),
        }
    }

    /// Wait for the next token
    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod rate_limit_tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    const PROMPTLY: Duration = Duration::from_millis(100);

    #[test]
    fn test_zero_rate_means_unlimited() {
        assert_eq!(RateLimiterConfig::per_second(0), None);
        assert_eq!(
            RateLimiterConfig::per_second(5),
            Some(RateLimiterConfig::new(5, 5))
        );
    }

    #[tokio::test]
    async fn test_burst_then_paced() {
        let limiter = RateLimiter::new(&RateLimiterConfig::new(1, 3));

        for _ in 0..3 {
            assert!(timeout(PROMPTLY, limiter.wait()).await.is_ok());
        }
        assert!(timeout(PROMPTLY, limiter.wait()).await.is_err());
    }

    #[tokio::test]
    async fn test_zero_burst_falls_back_to_rate() {
        let limiter = RateLimiter::new(&RateLimiterConfig::new(2, 0));

        assert!(timeout(PROMPTLY, limiter.wait()).await.is_ok());
        assert!(timeout(PROMPTLY, limiter.wait()).await.is_ok());
        assert!(timeout(PROMPTLY, limiter.wait()).await.is_err());
    }

    #[tokio::test]
    async fn test_clones_share_the_bucket() {
        let limiter = RateLimiter::new(&RateLimiterConfig::new(1, 1));
        let clone = limiter.clone();

        assert!(timeout(PROMPTLY, limiter.wait()).await.is_ok());
        assert!(timeout(PROMPTLY, clone.wait()).await.is_err());
    }
}
