/// LLM Client: the single point of entry for all model calls in Dossier.
///
/// ARCHITECTURAL RULE: No other module may call the Anthropic API directly.
/// Stages depend on the `Completion` trait, never on `LlmClient` itself.
///
/// Calls are made exactly once. Callers decide how a failed call degrades.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod prompts;
#[cfg(test)]
pub mod testing;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// One request to the completion boundary: a model, an output budget,
/// an optional system instruction and a single user message.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub max_tokens: u32,
    pub system: Option<String>,
    pub prompt: String,
}

/// Text completion seam. `LlmClient` talks to Anthropic; tests script replies.
#[async_trait]
pub trait Completion: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content from the first text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// Wraps the Anthropic Messages API.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> anyhow::Result<Self> {
        // Generation can take minutes; only connection setup is bounded.
        let client = Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()?;
        Ok(Self { client, api_key })
    }

    /// Makes a raw call to the Messages API, returning the full response object.
    pub async fn call(&self, request: &CompletionRequest) -> Result<LlmResponse, LlmError> {
        let request_body = AnthropicRequest {
            model: &request.model,
            max_tokens: request.max_tokens,
            system: request.system.as_deref(),
            messages: vec![AnthropicMessage {
                role: "user",
                content: &request.prompt,
            }],
        };

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<AnthropicError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let llm_response: LlmResponse = response.json().await?;

        debug!(
            "LLM call succeeded: model={}, input_tokens={}, output_tokens={}",
            request.model, llm_response.usage.input_tokens, llm_response.usage.output_tokens
        );

        Ok(llm_response)
    }
}

#[async_trait]
impl Completion for LlmClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        let response = self.call(&request).await?;
        response
            .text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }
}

/// Strips a surrounding ```lang ... ``` fence from model output, if there is one.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (`json`, `latex`, `tex`, ...) up to the first newline.
    let body = match rest.find('\n') {
        Some(idx) if !rest[..idx].contains(char::is_whitespace) => &rest[idx + 1..],
        _ => rest,
    };
    body.trim_end()
        .strip_suffix("```")
        .map(str::trim)
        .unwrap_or(body.trim())
}

/// Keeps at most `limit` characters, respecting UTF-8 boundaries.
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fences_with_tag() {
        let input = "```latex\n\\documentclass{article}\n```";
        assert_eq!(strip_code_fences(input), "\\documentclass{article}");
    }

    #[test]
    fn test_strip_code_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_code_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_code_fences_no_fences() {
        let input = "\\documentclass{letter}\n\\begin{document}";
        assert_eq!(strip_code_fences(input), input);
    }

    #[test]
    fn test_truncate_chars_respects_multibyte() {
        assert_eq!(truncate_chars("Grüße", 3), "Grü");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }

    #[test]
    fn test_request_omits_absent_system() {
        let body = AnthropicRequest {
            model: "m",
            max_tokens: 100,
            system: None,
            messages: vec![AnthropicMessage {
                role: "user",
                content: "hi",
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("system").is_none());
        assert_eq!(json["messages"][0]["content"], "hi");
    }

    #[test]
    fn test_response_text_picks_first_text_block() {
        let json = r#"{
            "content": [{"type": "text", "text": "Acme Corp"}],
            "usage": {"input_tokens": 10, "output_tokens": 2}
        }"#;
        let response: LlmResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text(), Some("Acme Corp"));
    }
}
