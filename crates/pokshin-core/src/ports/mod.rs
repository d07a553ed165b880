//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod assistant;
mod rate_limit;
mod storage;

pub use assistant::{AssistError, WritingAssistant};
pub use rate_limit::{RateLimitError, RateLimitResult, RateLimiter};
pub use storage::KeyValueStore;
