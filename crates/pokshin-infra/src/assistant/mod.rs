//! Writing assistant adapters.

mod disabled;
mod gemini;

use std::sync::Arc;

use pokshin_core::ports::WritingAssistant;

pub use disabled::DisabledAssistant;
pub use gemini::{GeminiAssistant, GeminiConfig};

/// Gemini when an API key is configured, otherwise the disabled stand-in.
pub fn from_config(config: GeminiConfig) -> Arc<dyn WritingAssistant> {
    if config.api_key.as_deref().is_none_or(str::is_empty) {
        tracing::info!("No Gemini API key configured - writing assistant disabled");
        return Arc::new(DisabledAssistant);
    }

    match GeminiAssistant::new(config) {
        Ok(assistant) => Arc::new(assistant),
        Err(e) => {
            tracing::error!(error = %e, "Failed to build Gemini client - writing assistant disabled");
            Arc::new(DisabledAssistant)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pokshin_core::ports::AssistError;

    #[tokio::test]
    async fn test_missing_key_disables_assistant() {
        let assistant = from_config(GeminiConfig {
            api_key: None,
            ..GeminiConfig::default()
        });
        assert!(matches!(
            assistant.writing_prompt("ONF").await,
            Err(AssistError::Unavailable)
        ));
        assert!(matches!(
            assistant.polish_draft("t", "c").await,
            Err(AssistError::Unavailable)
        ));
    }
}
