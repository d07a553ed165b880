//! # Pokshin Infrastructure
//!
//! Concrete implementations of the ports defined in `pokshin-core`:
//! durable storage, the Gemini writing assistant, rate limiting, and image
//! attachment encoding.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - In-memory and file storage only
//! - `rate-limit` - Per-client throttling of assistant calls via governor
//! - `redis` - Redis storage backend

pub mod assistant;
pub mod attachment;
pub mod storage;

#[cfg(feature = "rate-limit")]
pub mod rate_limit;

pub use assistant::{DisabledAssistant, GeminiAssistant, GeminiConfig};
pub use attachment::{AttachmentError, to_data_url};
pub use storage::{FileStore, InMemoryStore};

#[cfg(feature = "rate-limit")]
pub use rate_limit::{AssistantRateLimitConfig, InMemoryRateLimiter};

#[cfg(feature = "redis")]
pub use storage::{RedisConfig, RedisStore};
