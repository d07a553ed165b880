//! Rate limiting for writing-assistant calls.

mod memory;

pub use memory::{AssistantRateLimitConfig, InMemoryRateLimiter};
