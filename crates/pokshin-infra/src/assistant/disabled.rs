use async_trait::async_trait;

use pokshin_core::ports::{AssistError, WritingAssistant};

/// Stand-in used when no API key is configured.
pub struct DisabledAssistant;

#[async_trait]
impl WritingAssistant for DisabledAssistant {
    async fn polish_draft(&self, _title: &str, _content: &str) -> Result<String, AssistError> {
        Err(AssistError::Unavailable)
    }

    async fn writing_prompt(&self, _group_name: &str) -> Result<String, AssistError> {
        Err(AssistError::Unavailable)
    }
}
