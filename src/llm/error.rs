//! Provider error types.

use thiserror::Error;

use super::retry::{RetryDecision, Retryable};

/// Errors raised while talking to the chat-completion provider.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Upstream signalled overload (HTTP 503 or an in-band 503 error object).
    #[error("Model temporarily unavailable: {0}")]
    Unavailable(String),

    /// Upstream answered with a non-success status.
    #[error("Provider returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The request never produced an HTTP answer (connect, TLS, timeout, decode).
    #[error("Provider request failed: {0}")]
    Transport(String),

    /// The completion carried no message content.
    #[error("Provider reply contained no message content")]
    EmptyResponse,
}

impl LlmError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, LlmError::Unavailable(_))
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) if status.as_u16() == 503 => LlmError::Unavailable(err.to_string()),
            Some(status) => LlmError::Http {
                status: status.as_u16(),
                body: err.to_string(),
            },
            None => LlmError::Transport(err.to_string()),
        }
    }
}

impl Retryable for LlmError {
    fn retry_decision(&self) -> RetryDecision {
        match self {
            // A second identical request cannot fix these.
            LlmError::Http { status, .. } if matches!(*status, 400 | 401 | 403 | 404 | 422) => {
                RetryDecision::NoRetry
            }
            _ => RetryDecision::Retry,
        }
    }
}
