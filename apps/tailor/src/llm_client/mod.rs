/// LLM Client — the single point of entry for all text-generation calls.
///
/// Speaks the OpenAI-compatible chat-completions protocol (xAI by default).
/// One request per call: no retries, no conversation state. The only bound on
/// the wait is the transport timeout configured at construction.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::LlmSettings;
use crate::models::submission::Prompt;

pub mod prompts;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API key is not configured")]
    MissingApiKey,

    #[error("API key rejected (status {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Quota exceeded (status {status}): {message}")]
    Quota { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Anything that can turn a prompt into text.
/// The pipeline only depends on this, so tests can swap the remote API out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &Prompt) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Text of the first choice, if it has any non-blank content.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|t| !t.trim().is_empty())
    }
}

/// The text-generation client. Holds the credential read once at startup.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: Option<String>,
    settings: LlmSettings,
}

impl LlmClient {
    pub fn new(api_key: Option<String>, settings: LlmSettings) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key,
            settings,
        })
    }

    pub fn settings(&self) -> &LlmSettings {
        &self.settings
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.settings.base_url.trim_end_matches('/')
        )
    }

    /// Makes a single call to the chat-completions endpoint.
    pub async fn call(&self, prompt: &str, system: &str) -> Result<ChatResponse, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        let request_body = ChatRequest {
            model: &self.settings.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = error_message(&body);
            warn!("LLM API returned {}: {}", status, message);
            return Err(classify_status(status, message));
        }

        let chat: ChatResponse =
            serde_json::from_str(&body).map_err(|e| LlmError::Decode(e.to_string()))?;

        if let Some(usage) = &chat.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        Ok(chat)
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn generate(&self, prompt: &Prompt) -> Result<String, LlmError> {
        let response = self.call(&prompt.user, &prompt.system).await?;
        if let Some(reason) = response.choices.first().and_then(|c| c.finish_reason.as_deref()) {
            if reason == "length" {
                warn!("LLM output hit max_tokens={}", self.settings.max_tokens);
            }
        }
        response
            .text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }
}

fn classify_status(status: StatusCode, message: String) -> LlmError {
    let status = status.as_u16();
    match status {
        401 | 403 => LlmError::Rejected { status, message },
        402 | 429 => LlmError::Quota { status, message },
        _ => LlmError::Api { status, message },
    }
}

/// Pulls a readable message out of `{"error": {"message": ..}}` or `{"error": ".."}`.
fn error_message(body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|v| v.get("error"))
        .and_then(|e| {
            e.get("message")
                .and_then(|m| m.as_str())
                .or_else(|| e.as_str())
        })
        .map(str::to_string)
        .unwrap_or_else(|| body.trim().to_string())
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
