//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use pokshin_infra::GeminiConfig;
use pokshin_infra::attachment::DEFAULT_MAX_IMAGE_BYTES;

#[cfg(feature = "rate-limit")]
use pokshin_infra::AssistantRateLimitConfig;

/// Where posts and drafts are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    File(PathBuf),
    Memory,
    #[cfg(feature = "redis")]
    Redis,
}

impl StorageBackend {
    /// Parse `STORAGE_BACKEND`. Unknown values fall back to the file backend.
    fn parse(kind: &str, path: PathBuf) -> Self {
        match kind.to_lowercase().as_str() {
            "memory" => Self::Memory,
            #[cfg(feature = "redis")]
            "redis" => Self::Redis,
            "file" => Self::File(path),
            other => {
                tracing::warn!(backend = %other, "Unknown STORAGE_BACKEND, using file storage");
                Self::File(path)
            }
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub storage: StorageBackend,
    pub max_image_bytes: usize,
    pub gemini: GeminiConfig,
    #[cfg(feature = "rate-limit")]
    pub rate_limit: AssistantRateLimitConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let storage_path = env::var("STORAGE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data/archive.json"));
        let storage = StorageBackend::parse(
            &env::var("STORAGE_BACKEND").unwrap_or_else(|_| "file".to_string()),
            storage_path,
        );

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            storage,
            max_image_bytes: env::var("MAX_IMAGE_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_IMAGE_BYTES),
            gemini: GeminiConfig::from_env(),
            #[cfg(feature = "rate-limit")]
            rate_limit: AssistantRateLimitConfig::from_env(),
        }
    }

    /// Ephemeral configuration with no assistant, used by handler tests.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            storage: StorageBackend::Memory,
            max_image_bytes: 64,
            gemini: GeminiConfig::default(),
            #[cfg(feature = "rate-limit")]
            rate_limit: AssistantRateLimitConfig::default(),
        }
    }
}
