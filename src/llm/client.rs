use std::sync::Arc;
use std::time::Duration;

use super::error::LlmError;
use super::providers::{ChatRequest, Message, OpenRouterProvider, Provider};
use super::retry::{with_retry, RetryConfig};
use crate::config::ProviderSettings;

/// Model used for every completion.
pub const OPENROUTER_MODEL: &str = "meta-llama/llama-3.3-8b-instruct:free";

/// Low temperature keeps the JSON shape stable between calls.
pub const DEFAULT_TEMPERATURE: f32 = 0.15;

pub struct LlmClient {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    retry_config: RetryConfig,
}

impl LlmClient {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self {
            provider,
            model: OPENROUTER_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            retry_config: RetryConfig::default(),
        }
    }

    /// Build the OpenRouter client, or `None` when no credential is configured.
    pub fn from_settings(settings: &ProviderSettings, retry_config: RetryConfig) -> Option<Self> {
        let api_key = settings.resolve_api_key()?;
        let provider = OpenRouterProvider::new(
            api_key,
            Some(settings.base_url.clone()),
            settings.timeout_secs.map(Duration::from_secs),
        );

        Some(
            Self::new(Arc::new(provider))
                .with_model(settings.model.clone(), settings.temperature)
                .with_retry_config(retry_config),
        )
    }

    pub fn with_model(mut self, model: impl Into<String>, temperature: f32) -> Self {
        self.model = model.into();
        self.temperature = temperature;
        self
    }

    pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }

    /// Send `prompt` as a single user message and return the reply text.
    pub async fn send(&self, prompt: &str) -> Result<String, LlmError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![Message::user(prompt)],
            temperature: self.temperature,
        };

        let provider = self.provider.clone();
        let response = with_retry(&self.retry_config, || {
            let p = provider.clone();
            let r = request.clone();
            async move { p.chat(&r).await }
        })
        .await?;

        match response.finish_reason.as_deref() {
            // A reply cut off at the token limit rarely holds a whole JSON object.
            Some("length") => tracing::warn!(
                "{} reply truncated at the token limit ({} chars)",
                self.provider.name(),
                response.content.len()
            ),
            reason => tracing::debug!(
                "{} reply finished ({:?}), {} chars",
                self.provider.name(),
                reason,
                response.content.len()
            ),
        }

        Ok(response.content)
    }
}
