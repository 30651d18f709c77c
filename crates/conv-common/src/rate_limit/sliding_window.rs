//! Sliding-window rate limiter keyed by client (`ip:<addr>` or `user:<id>`)
//!
//! Each key keeps the instants of its hits inside the window. A hit is
//! allowed while fewer than `max_requests` hits remain in the window.

use dashmap::DashMap;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::config::WindowLimitConfig;

/// Outcome of a hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed { remaining: u32 },
    Limited { retry_after: Duration },
}

impl RateDecision {
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }
}

#[derive(Debug)]
pub struct SlidingWindowLimiter {
    max_requests: u32,
    window: Duration,
    hits: DashMap<String, VecDeque<Instant>>,
}

impl SlidingWindowLimiter {
    #[must_use]
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            hits: DashMap::new(),
        }
    }

    #[must_use]
    pub fn from_config(config: &WindowLimitConfig) -> Self {
        Self::new(config.max_requests, Duration::from_secs(config.window_secs))
    }

    /// Record a hit for `key` now
    pub fn check(&self, key: &str) -> RateDecision {
        self.check_at(key, Instant::now())
    }

    /// Record a hit for `key` at `now`
    pub fn check_at(&self, key: &str, now: Instant) -> RateDecision {
        let mut entry = self.hits.entry(key.to_string()).or_default();
        let hits = entry.value_mut();

        while let Some(oldest) = hits.front() {
            if now.saturating_duration_since(*oldest) >= self.window {
                hits.pop_front();
            } else {
                break;
            }
        }

        if hits.len() >= self.max_requests as usize {
            let retry_after = hits
                .front()
                .map(|oldest| self.window.saturating_sub(now.saturating_duration_since(*oldest)))
                .unwrap_or(self.window);
            return RateDecision::Limited { retry_after };
        }

        hits.push_back(now);
        let used = u32::try_from(hits.len()).unwrap_or(u32::MAX);
        RateDecision::Allowed {
            remaining: self.max_requests.saturating_sub(used),
        }
    }

    /// Drop keys with no hit inside the window; returns how many were dropped
    pub fn purge_idle(&self) -> usize {
        self.purge_idle_at(Instant::now())
    }

    pub fn purge_idle_at(&self, now: Instant) -> usize {
        let before = self.hits.len();
        self.hits.retain(|_, hits| {
            hits.back()
                .is_some_and(|last| now.saturating_duration_since(*last) < self.window)
        });
        before - self.hits.len()
    }

    #[must_use]
    pub fn tracked_keys(&self) -> usize {
        self.hits.len()
    }

    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter() -> SlidingWindowLimiter {
        SlidingWindowLimiter::new(3, Duration::from_secs(60))
    }

    #[test]
    fn test_allows_up_to_max() {
        let limiter = limiter();
        let t0 = Instant::now();

        assert_eq!(limiter.check_at("ip:1", t0), RateDecision::Allowed { remaining: 2 });
        assert_eq!(limiter.check_at("ip:1", t0), RateDecision::Allowed { remaining: 1 });
        assert_eq!(limiter.check_at("ip:1", t0), RateDecision::Allowed { remaining: 0 });
        assert!(!limiter.check_at("ip:1", t0).is_allowed());
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = limiter();
        let t0 = Instant::now();
        for _ in 0..3 {
            limiter.check_at("user:1", t0);
        }
        assert!(!limiter.check_at("user:1", t0).is_allowed());
        assert!(limiter.check_at("user:2", t0).is_allowed());
    }

    #[test]
    fn test_window_slides() {
        let limiter = limiter();
        let t0 = Instant::now();
        limiter.check_at("ip:1", t0);
        limiter.check_at("ip:1", t0 + Duration::from_secs(20));
        limiter.check_at("ip:1", t0 + Duration::from_secs(40));

        match limiter.check_at("ip:1", t0 + Duration::from_secs(50)) {
            RateDecision::Limited { retry_after } => {
                assert_eq!(retry_after, Duration::from_secs(10));
            }
            other => panic!("expected limit, got {other:?}"),
        }

        // first hit leaves the window at t0 + 60
        assert!(limiter.check_at("ip:1", t0 + Duration::from_secs(60)).is_allowed());
    }

    #[test]
    fn test_limited_hits_are_not_recorded() {
        let limiter = SlidingWindowLimiter::new(1, Duration::from_secs(10));
        let t0 = Instant::now();
        assert!(limiter.check_at("k", t0).is_allowed());
        for s in 1..10 {
            assert!(!limiter.check_at("k", t0 + Duration::from_secs(s)).is_allowed());
        }
        assert!(limiter.check_at("k", t0 + Duration::from_secs(10)).is_allowed());
    }

    #[test]
    fn test_purge_idle() {
        let limiter = limiter();
        let t0 = Instant::now();
        limiter.check_at("old", t0);
        limiter.check_at("fresh", t0 + Duration::from_secs(50));
        assert_eq!(limiter.tracked_keys(), 2);

        assert_eq!(limiter.purge_idle_at(t0 + Duration::from_secs(70)), 1);
        assert_eq!(limiter.tracked_keys(), 1);
    }

    #[test]
    fn test_from_config() {
        let limiter = SlidingWindowLimiter::from_config(&WindowLimitConfig {
            max_requests: 2,
            window_secs: 5,
        });
        assert_eq!(limiter.window(), Duration::from_secs(5));
    }
}
