use axum::extract::State;
use axum::Json;
use serde_json::Value;

use crate::diagnosis::PetProfile;
use crate::server::error::ApiError;
use crate::server::extractors::JsonBody;
use crate::server::state::SharedState;
use crate::service::DiagnosisReport;

pub async fn diagnose(
    State(state): State<SharedState>,
    JsonBody(body): JsonBody<Value>,
) -> Result<Json<DiagnosisReport>, ApiError> {
    let profile = PetProfile::from_value(body)
        .ok_or_else(|| ApiError::bad_request("Request body must be a JSON object"))?;

    state
        .service
        .diagnose(&profile)
        .await
        .map(Json)
        .map_err(ApiError::from_diagnose)
}
