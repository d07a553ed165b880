//! Per-client rate limiter using the governor crate.
//!
//! Each AI call costs an external request, so callers are throttled by key
//! (normally the client address). Limits are per-process.

use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use governor::clock::{Clock, DefaultClock};
use governor::{DefaultKeyedRateLimiter, Quota};

use pokshin_core::ports::{RateLimitError, RateLimitResult, RateLimiter};

#[derive(Debug, Clone)]
pub struct AssistantRateLimitConfig {
    /// Calls allowed per window for one key.
    pub max_requests: u32,
    /// Window duration.
    pub window: Duration,
    /// Key clients by `X-Forwarded-For` / `Forwarded` instead of the socket
    /// peer. Only safe behind a proxy that overwrites those headers.
    pub trust_proxy_headers: bool,
}

impl Default for AssistantRateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 20,
            window: Duration::from_secs(60),
            trust_proxy_headers: false,
        }
    }
}

impl AssistantRateLimitConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_requests: std::env::var("RATE_LIMIT_MAX_REQUESTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_requests),
            window: std::env::var("RATE_LIMIT_WINDOW_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.window),
            trust_proxy_headers: std::env::var("RATE_LIMIT_TRUST_PROXY")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.trust_proxy_headers),
        }
    }
}

/// Idle keys are dropped after this many checks.
const PRUNE_EVERY: u64 = 256;

/// Keyed GCRA limiter.
pub struct InMemoryRateLimiter {
    limiter: DefaultKeyedRateLimiter<String>,
    clock: DefaultClock,
    config: AssistantRateLimitConfig,
    checks: AtomicU64,
}

impl InMemoryRateLimiter {
    pub fn new(config: AssistantRateLimitConfig) -> Result<Self, RateLimitError> {
        let burst = NonZeroU32::new(config.max_requests)
            .ok_or_else(|| RateLimitError::Backend("max_requests must be positive".to_string()))?;
        let quota = Quota::with_period(config.window / burst.get())
            .ok_or_else(|| RateLimitError::Backend("window must be positive".to_string()))?
            .allow_burst(burst);

        Ok(Self {
            limiter: DefaultKeyedRateLimiter::keyed(quota),
            clock: DefaultClock::default(),
            config,
            checks: AtomicU64::new(0),
        })
    }

    /// Forget keys whose budget has fully refilled.
    fn prune(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
        tracing::debug!(keys = self.limiter.len(), "Pruned idle rate-limit keys");
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn check(&self, key: &str) -> Result<RateLimitResult, RateLimitError> {
        if (self.checks.fetch_add(1, Ordering::Relaxed) + 1) % PRUNE_EVERY == 0 {
            self.prune();
        }

        match self.limiter.check_key(&key.to_string()) {
            Ok(_) => Ok(RateLimitResult {
                allowed: true,
                // governor does not expose the remaining budget; report the configured burst
                remaining: self.config.max_requests,
                reset_after: self.config.window,
            }),
            Err(not_until) => Ok(RateLimitResult {
                allowed: false,
                remaining: 0,
                reset_after: not_until.wait_time_from(self.clock.now()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_burst_then_reject() {
        let limiter = InMemoryRateLimiter::new(AssistantRateLimitConfig {
            max_requests: 2,
            window: Duration::from_secs(60),
            ..Default::default()
        })
        .unwrap();

        assert!(limiter.check("10.0.0.1").await.unwrap().allowed);
        assert!(limiter.check("10.0.0.1").await.unwrap().allowed);

        let rejected = limiter.check("10.0.0.1").await.unwrap();
        assert!(!rejected.allowed);
        assert!(rejected.retry_after_secs() >= 1);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let limiter = InMemoryRateLimiter::new(AssistantRateLimitConfig {
            max_requests: 1,
            window: Duration::from_secs(60),
            ..Default::default()
        })
        .unwrap();

        assert!(limiter.check("a").await.unwrap().allowed);
        assert!(!limiter.check("a").await.unwrap().allowed);
        assert!(limiter.check("b").await.unwrap().allowed);
    }

    #[test]
    fn test_zero_budget_is_rejected() {
        let config = AssistantRateLimitConfig {
            max_requests: 0,
            window: Duration::from_secs(60),
            ..Default::default()
        };
        assert!(InMemoryRateLimiter::new(config).is_err());
    }

    #[tokio::test]
    async fn test_idle_keys_are_pruned() {
        let limiter = InMemoryRateLimiter::new(AssistantRateLimitConfig {
            max_requests: 1,
            window: Duration::from_millis(10),
            ..Default::default()
        })
        .unwrap();

        for i in 0..50 {
            limiter.check(&format!("10.0.0.{i}")).await.unwrap();
        }
        assert_eq!(limiter.limiter.len(), 50);

        tokio::time::sleep(Duration::from_millis(50)).await;
        limiter.prune();
        assert_eq!(limiter.limiter.len(), 0);
    }

    #[tokio::test]
    async fn test_checks_prune_periodically() {
        let limiter = InMemoryRateLimiter::new(AssistantRateLimitConfig {
            max_requests: 1,
            window: Duration::from_millis(10),
            ..Default::default()
        })
        .unwrap();

        for i in 0..(PRUNE_EVERY - 1) {
            limiter.check(&format!("key-{i}")).await.unwrap();
        }
        tokio::time::sleep(Duration::from_millis(50)).await;

        limiter.check("fresh").await.unwrap();
        assert_eq!(limiter.limiter.len(), 1);
    }
}
