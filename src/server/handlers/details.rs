use axum::extract::State;
use axum::Json;

use crate::diagnosis::DetailsRequest;
use crate::server::error::ApiError;
use crate::server::extractors::JsonBody;
use crate::server::state::SharedState;
use crate::service::DetailsReport;

pub async fn veterinary_details(
    State(state): State<SharedState>,
    JsonBody(request): JsonBody<DetailsRequest>,
) -> Result<Json<DetailsReport>, ApiError> {
    state
        .service
        .veterinary_details(request)
        .await
        .map(Json)
        .map_err(ApiError::from_details)
}
