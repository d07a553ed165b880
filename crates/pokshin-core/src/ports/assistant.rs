//! Writing assistant port - optional AI text help for the composer.

use async_trait::async_trait;

/// External generative-language collaborator.
///
/// Both capabilities return plain text. Callers treat every error as
/// "no suggestion"; nothing here is fatal.
#[async_trait]
pub trait WritingAssistant: Send + Sync {
    /// Rewrite a draft to read better, keeping its language.
    async fn polish_draft(&self, title: &str, content: &str) -> Result<String, AssistError>;

    /// Produce a short creative prompt for fans of a group.
    async fn writing_prompt(&self, group_name: &str) -> Result<String, AssistError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AssistError {
    #[error("Writing assistant is not configured")]
    Unavailable,

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Unexpected response: {0}")]
    Response(String),
}
