// src/utils/rate.rs

//! Randomized request pacing.
//!
//! Sleeps a uniform draw from a configured interval before each network
//! navigation. Shaping only: disabling it changes throughput, never
//! extraction results.

use std::time::Duration;

use rand::{Rng, rng};
use serde::{Deserialize, Serialize};

/// An inclusive delay interval in milliseconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DelayRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl DelayRange {
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    /// A range that never sleeps.
    pub const fn zero() -> Self {
        Self::new(0, 0)
    }

    /// Draw a delay uniformly from the interval.
    pub fn sample(&self) -> Duration {
        let (lo, hi) = if self.min_ms <= self.max_ms {
            (self.min_ms, self.max_ms)
        } else {
            (self.max_ms, self.min_ms)
        };
        if hi == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rng().random_range(lo..=hi))
    }
}

/// Paces catalog-page and detail-page navigations.
///
/// The page interval is wider than the detail interval: a page turn is the
/// point anti-automation defenses watch most closely.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    page_delay: DelayRange,
    detail_delay: DelayRange,
}

impl RateLimiter {
    pub fn new(page_delay: DelayRange, detail_delay: DelayRange) -> Self {
        Self {
            page_delay,
            detail_delay,
        }
    }

    /// A limiter that never sleeps, for tests and dry runs.
    pub fn disabled() -> Self {
        Self::new(DelayRange::zero(), DelayRange::zero())
    }

    /// Sleep before fetching the next catalog page.
    pub async fn before_page(&self) {
        Self::pause(self.page_delay.sample()).await;
    }

    /// Sleep before visiting the next detail page.
    pub async fn before_detail(&self) {
        Self::pause(self.detail_delay.sample()).await;
    }

    async fn pause(delay: Duration) {
        if delay.is_zero() {
            return;
        }
        log::debug!("rate limiter sleeping {}ms", delay.as_millis());
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_within_bounds() {
        let range = DelayRange::new(200, 400);
        for _ in 0..64 {
            let d = range.sample().as_millis() as u64;
            assert!((200..=400).contains(&d), "draw {d} outside interval");
        }
    }

    #[test]
    fn test_sample_degenerate_interval() {
        let range = DelayRange::new(150, 150);
        assert_eq!(range.sample(), Duration::from_millis(150));
    }

    #[test]
    fn test_zero_range_never_sleeps() {
        assert_eq!(DelayRange::zero().sample(), Duration::ZERO);
    }

    #[test]
    fn test_inverted_bounds_are_reordered() {
        let range = DelayRange::new(300, 100);
        for _ in 0..16 {
            let d = range.sample().as_millis() as u64;
            assert!((100..=300).contains(&d));
        }
    }

    #[tokio::test]
    async fn test_disabled_limiter_is_instant() {
        let limiter = RateLimiter::disabled();
        let start = std::time::Instant::now();
        limiter.before_page().await;
        limiter.before_detail().await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }
}
