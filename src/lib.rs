//! Pet symptom triage over an OpenAI-compatible chat-completion provider.
//!
//! A request flows prompt → provider (with bounded retry) → JSON coercion →
//! ranking. Detail lookups are memoized per `(diagnosis, species, breed)`.

pub mod config;
pub mod diagnosis;
pub mod llm;
pub mod server;
pub mod service;

pub use config::Settings;
pub use service::{DiagnosisService, ServiceError};
