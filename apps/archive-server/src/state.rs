//! Application state - shared across all handlers.

use std::sync::Arc;

use pokshin_core::ports::{KeyValueStore, WritingAssistant};
use pokshin_core::{Composer, DraftStore, PostRepository};
use pokshin_infra::{FileStore, InMemoryStore, assistant};

#[cfg(feature = "rate-limit")]
use pokshin_core::ports::RateLimiter;
#[cfg(feature = "rate-limit")]
use pokshin_infra::InMemoryRateLimiter;
#[cfg(feature = "redis")]
use pokshin_infra::{RedisConfig, RedisStore};

use crate::config::{AppConfig, StorageBackend};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<PostRepository>,
    pub composer: Composer,
    pub max_image_bytes: usize,
    #[cfg(feature = "rate-limit")]
    pub rate_limiter: Option<Arc<dyn RateLimiter>>,
    #[cfg(feature = "rate-limit")]
    pub trust_proxy_headers: bool,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let store = open_store(&config.storage).await;
        let assistant = assistant::from_config(config.gemini.clone());
        let state = Self::with_parts(store, assistant, config).await;

        tracing::info!(posts = state.posts.len().await, "Application state initialized");
        state
    }

    /// Assemble the state around an already chosen store and assistant.
    pub async fn with_parts(
        store: Arc<dyn KeyValueStore>,
        assistant: Arc<dyn WritingAssistant>,
        config: &AppConfig,
    ) -> Self {
        let posts = Arc::new(PostRepository::load(store.clone()).await);
        let composer = Composer::new(posts.clone(), DraftStore::new(store), assistant);

        #[cfg(feature = "rate-limit")]
        let rate_limiter: Option<Arc<dyn RateLimiter>> =
            match InMemoryRateLimiter::new(config.rate_limit.clone()) {
                Ok(limiter) => Some(Arc::new(limiter)),
                Err(e) => {
                    tracing::error!(error = %e, "Invalid rate limit configuration, assistant routes are unthrottled");
                    None
                }
            };

        Self {
            posts,
            composer,
            max_image_bytes: config.max_image_bytes,
            #[cfg(feature = "rate-limit")]
            rate_limiter,
            #[cfg(feature = "rate-limit")]
            trust_proxy_headers: config.rate_limit.trust_proxy_headers,
        }
    }
}

/// Open the configured backend, falling back to memory when it is unreachable.
async fn open_store(backend: &StorageBackend) -> Arc<dyn KeyValueStore> {
    match backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage - posts are lost on restart");
            Arc::new(InMemoryStore::new())
        }
        StorageBackend::File(path) => match FileStore::open(path.clone()).await {
            Ok(store) => {
                tracing::info!(path = %path.display(), "Using file storage");
                Arc::new(store)
            }
            Err(e) => {
                tracing::error!(
                    path = %path.display(),
                    error = %e,
                    "Failed to open storage file. Using in-memory fallback."
                );
                Arc::new(InMemoryStore::new())
            }
        },
        #[cfg(feature = "redis")]
        StorageBackend::Redis => match RedisStore::new(RedisConfig::from_env()).await {
            Ok(store) => {
                tracing::info!("Using Redis storage");
                Arc::new(store)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to connect to Redis. Using in-memory fallback.");
                Arc::new(InMemoryStore::new())
            }
        },
    }
}
