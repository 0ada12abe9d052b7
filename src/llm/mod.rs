mod cache;
mod client;
mod error;
mod providers;
mod retry;

pub use cache::{CacheStats, ResponseCache, DEFAULT_CAPACITY};
pub use client::{LlmClient, DEFAULT_TEMPERATURE, OPENROUTER_MODEL};
pub use error::LlmError;
pub use providers::{
    ChatRequest, ChatResponse, Message, OpenRouterProvider, Provider, Role, OPENROUTER_BASE_URL,
};
pub use retry::{with_retry, RetryConfig, RetryDecision, Retryable};
