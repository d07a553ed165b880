//! Throttling port for calls that reach the writing assistant.

use async_trait::async_trait;
use std::time::Duration;

/// Admits or rejects a call identified by a client key.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Record one call for `key` and report whether it may proceed.
    async fn check(&self, key: &str) -> Result<RateLimitResult, RateLimitError>;
}

/// Outcome of one admission check.
#[derive(Debug, Clone)]
pub struct RateLimitResult {
    pub allowed: bool,
    pub remaining: u32,
    pub reset_after: Duration,
}

impl RateLimitResult {
    /// Whole seconds until the caller should retry, never zero for a rejection.
    pub fn retry_after_secs(&self) -> u64 {
        if self.allowed {
            0
        } else {
            self.reset_after.as_secs().max(1)
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("Rate limiter backend error: {0}")]
    Backend(String),
}
