use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use crate::server::state::SharedState;
use crate::service::HealthReport;

pub async fn health(State(state): State<SharedState>) -> (StatusCode, Json<Value>) {
    match state.service.health() {
        HealthReport::Healthy { available_models } => (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "message": "Service is up and running with OpenRouter API key configured",
                "available_models": available_models,
            })),
        ),
        HealthReport::Unconfigured { missing_keys } => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "error",
                "message": "Service cannot function - no API key configured",
                "missing_keys": missing_keys,
            })),
        ),
    }
}
