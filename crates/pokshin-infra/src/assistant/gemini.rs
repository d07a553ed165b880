//! Google Gemini writing assistant over the Generative Language REST API.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use pokshin_core::ports::{AssistError, WritingAssistant};

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-3-flash-preview".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl GeminiConfig {
    /// Load configuration from environment variables.
    ///
    /// `GEMINI_API_KEY` wins over the generic `API_KEY`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: std::env::var("GEMINI_API_KEY")
                .or_else(|_| std::env::var("API_KEY"))
                .ok()
                .filter(|k| !k.is_empty()),
            model: std::env::var("GEMINI_MODEL").unwrap_or(defaults.model),
            base_url: std::env::var("GEMINI_BASE_URL").unwrap_or(defaults.base_url),
            timeout: std::env::var("GEMINI_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }
}

pub struct GeminiAssistant {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl GeminiAssistant {
    pub fn new(config: GeminiConfig) -> Result<Self, AssistError> {
        let api_key = config
            .api_key
            .filter(|k| !k.is_empty())
            .ok_or(AssistError::Unavailable)?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AssistError::Request(e.to_string()))?;
        let endpoint = format!(
            "{}/models/{}:generateContent",
            config.base_url.trim_end_matches('/'),
            config.model
        );

        tracing::info!(model = %config.model, "Gemini writing assistant enabled");

        Ok(Self {
            client,
            api_key,
            endpoint,
        })
    }

    async fn generate(&self, body: Value) -> Result<String, AssistError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AssistError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AssistError::Request(format!("Gemini returned {status}")));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AssistError::Response(e.to_string()))?;
        // An answer without text is empty, not a failure.
        Ok(parsed.text().unwrap_or_default())
    }
}

#[async_trait]
impl WritingAssistant for GeminiAssistant {
    async fn polish_draft(&self, title: &str, content: &str) -> Result<String, AssistError> {
        tracing::debug!(title_len = title.len(), content_len = content.len(), "Polishing draft");
        self.generate(polish_request(title, content)).await
    }

    async fn writing_prompt(&self, group_name: &str) -> Result<String, AssistError> {
        tracing::debug!(group = %group_name, "Requesting writing prompt");
        let raw = self.generate(prompt_request(group_name)).await?;
        parse_prompt(&raw)
    }
}

fn user_text(text: String) -> Value {
    json!([{ "role": "user", "parts": [{ "text": text }] }])
}

fn polish_request(title: &str, content: &str) -> Value {
    let text = format!(
        "Please polish this writing draft about a K-pop group. Make it more emotive and \
         well-structured. Keep the language as the user provided (Korean if Korean, English if English).\n\
         Title: {title}\n\
         Content: {content}"
    );
    json!({ "contents": user_text(text) })
}

fn prompt_request(group_name: &str) -> Value {
    let text = format!(
        "Generate a short creative writing prompt for a fan of the K-pop group \"{group_name}\". \
         Make it inspiring."
    );
    json!({
        "contents": user_text(text),
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "OBJECT",
                "properties": { "prompt": { "type": "STRING" } },
                "required": ["prompt"]
            }
        }
    })
}

#[derive(Deserialize)]
struct PromptPayload {
    prompt: String,
}

/// An empty reply yields an empty prompt; the composer substitutes its default.
fn parse_prompt(raw: &str) -> Result<String, AssistError> {
    if raw.trim().is_empty() {
        return Ok(String::new());
    }
    serde_json::from_str::<PromptPayload>(raw)
        .map(|p| p.prompt)
        .map_err(|e| AssistError::Response(e.to_string()))
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate.
    fn text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        (!text.is_empty()).then_some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_text_joins_parts() {
        let response: GenerateResponse = serde_json::from_value(json!({
            "candidates": [
                { "content": { "parts": [{ "text": "첫 " }, { "text": "문장" }] } },
                { "content": { "parts": [{ "text": "ignored" }] } }
            ]
        }))
        .unwrap();
        assert_eq!(response.text().as_deref(), Some("첫 문장"));
    }

    #[test]
    fn test_response_without_candidates_has_no_text() {
        let response: GenerateResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(response.text(), None);
    }

    #[test]
    fn test_prompt_request_asks_for_json() {
        let body = prompt_request("ONEUS");
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        let text = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(text.contains("\"ONEUS\""));
    }

    #[test]
    fn test_polish_request_embeds_draft() {
        let body = polish_request("제목", "본문");
        let text = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(text.contains("Title: 제목"));
        assert!(text.contains("Content: 본문"));
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn test_parse_prompt() {
        assert_eq!(
            parse_prompt(r#"{"prompt":"Write a letter to your past self."}"#).unwrap(),
            "Write a letter to your past self."
        );
        assert!(parse_prompt("just text").is_err());
    }

    #[test]
    fn test_reply_without_text_is_an_empty_prompt() {
        let response: GenerateResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": [] } }]
        }))
        .unwrap();
        let raw = response.text().unwrap_or_default();
        assert_eq!(parse_prompt(&raw).unwrap(), "");
        assert_eq!(parse_prompt("  \n").unwrap(), "");
    }

    #[test]
    fn test_new_requires_key() {
        assert!(matches!(
            GeminiAssistant::new(GeminiConfig::default()),
            Err(AssistError::Unavailable)
        ));
        let assistant = GeminiAssistant::new(GeminiConfig {
            api_key: Some("key".to_string()),
            base_url: "http://localhost:1/v1beta/".to_string(),
            ..GeminiConfig::default()
        })
        .unwrap();
        assert_eq!(
            assistant.endpoint,
            "http://localhost:1/v1beta/models/gemini-3-flash-preview:generateContent"
        );
    }
}
