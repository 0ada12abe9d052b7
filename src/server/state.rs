//! Shared application state for the HTTP server.

use std::sync::Arc;

use crate::service::DiagnosisService;

/// Shared state accessible by all handlers via axum's State extractor.
pub struct AppState {
    pub service: DiagnosisService,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn shared(service: DiagnosisService) -> SharedState {
        Arc::new(Self { service })
    }
}
