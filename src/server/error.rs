//! API error type with automatic JSON error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::service::ServiceError;

pub const UNAVAILABLE_MESSAGE: &str =
    "The AI model is currently unavailable due to high demand. Please try again later.";
pub const UNEXPECTED_MESSAGE: &str = "An unexpected error occurred. Please try again.";

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    extra: Map<String, Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            extra: Map::new(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Attach an extra top-level field to the error body.
    pub fn with(mut self, key: &str, value: impl Serialize) -> Self {
        self.extra
            .insert(key.to_string(), serde_json::to_value(value).unwrap_or(Value::Null));
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Map a `/diagnose` failure.
    pub fn from_diagnose(err: ServiceError) -> Self {
        tracing::error!("Error in diagnose endpoint: {}", err);
        match err {
            ServiceError::NotConfigured { skipped_models } => Self::unavailable(
                "No AI models were available to process your request. Please check API configurations.",
            )
            .with("queried_models", Vec::<String>::new())
            .with("skipped_models", skipped_models),
            ServiceError::Parse(_) | ServiceError::NoConditions => {
                Self::internal("Failed to parse AI response. Please try again.")
            }
            other => Self::from_common(other),
        }
    }

    /// Map a `/veterinary-details` failure.
    pub fn from_details(err: ServiceError) -> Self {
        tracing::error!("Error in veterinary-details endpoint: {}", err);
        match err {
            ServiceError::NotConfigured { skipped_models } => {
                Self::unavailable("No AI models available").with("skipped_models", skipped_models)
            }
            ServiceError::Parse(_) | ServiceError::NoConditions => Self::internal(
                "Failed to parse AI response for veterinary details. Please try again.",
            )
            .with("skipped_models", Vec::<String>::new()),
            other => Self::from_common(other),
        }
    }

    fn from_common(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(message) => Self::bad_request(message),
            ServiceError::Llm(llm) if llm.is_unavailable() => Self::unavailable(UNAVAILABLE_MESSAGE),
            _ => Self::internal(UNEXPECTED_MESSAGE),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = Map::new();
        body.insert("error".to_string(), Value::String(self.message));
        body.extend(self.extra);
        (self.status, axum::Json(Value::Object(body))).into_response()
    }
}
