use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::error::LlmError;

pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// One chat-completion call.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f32,
}

#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub content: String,
    pub finish_reason: Option<String>,
}

#[async_trait]
pub trait Provider: Send + Sync {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError>;
    fn name(&self) -> &str;
}

// ============================================================================
// OPENROUTER PROVIDER (OpenAI-compatible chat completions)
// ============================================================================

pub struct OpenRouterProvider {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    timeout: Option<Duration>,
}

impl OpenRouterProvider {
    pub fn new(api_key: String, base_url: Option<String>, timeout: Option<Duration>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            base_url: base_url
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| OPENROUTER_BASE_URL.to_string()),
            timeout,
        }
    }
}

#[async_trait]
impl Provider for OpenRouterProvider {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
        let mut builder = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(request);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status.as_u16() == 503 {
                tracing::warn!("OpenRouter 503 error: {}", body);
                return Err(LlmError::Unavailable(body));
            }
            tracing::error!("OpenRouter API error {}: {}", status, body);
            return Err(LlmError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let json: serde_json::Value = response.json().await?;
        parse_completion(&json)
    }

    fn name(&self) -> &str {
        "OpenRouter"
    }
}

/// Pull the first choice's text out of a chat-completion body.
///
/// OpenRouter can report upstream failures in-band with a 200 status and an
/// `error` object, so that is checked before the choices.
fn parse_completion(json: &serde_json::Value) -> Result<ChatResponse, LlmError> {
    if let Some(error) = json.get("error") {
        let message = error["message"].as_str().unwrap_or("unknown error").to_string();
        return match error["code"].as_u64() {
            Some(503) => Err(LlmError::Unavailable(message)),
            Some(code) => Err(LlmError::Http {
                status: u16::try_from(code).unwrap_or(502),
                body: message,
            }),
            None => Err(LlmError::Http {
                status: 502,
                body: message,
            }),
        };
    }

    let content = json["choices"][0]["message"]["content"]
        .as_str()
        .filter(|text| !text.trim().is_empty())
        .ok_or(LlmError::EmptyResponse)?
        .to_string();

    let finish_reason = json["choices"][0]["finish_reason"]
        .as_str()
        .map(String::from);

    Ok(ChatResponse {
        content,
        finish_reason,
    })
}
