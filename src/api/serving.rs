//! Serving endpoint handlers

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, PredictRequest, ServeModelResponse};

pub fn create_serving_router() -> Router<AppState> {
    Router::new()
        .route("/serve-model", post(serve_model))
        .route("/serve-model/health", get(worker_health))
        .route("/predict", post(predict))
}

/// POST /serve-model
///
/// Starts a worker for the configured model and alias and returns as soon as
/// the process exists.
pub async fn serve_model(
    State(state): State<AppState>,
) -> Result<Json<ServeModelResponse>, ApiError> {
    let handle = state
        .serving_service
        .serve_configured()
        .await
        .inspect_err(|e| error!(error = %e, "Failed to start model serving"))
        .map_err(|e| ApiError::for_operation("serve model", e))?;

    info!(model_uri = %handle.model_uri, pid = ?handle.pid, "Model serving started");

    Ok(Json(handle.into()))
}

/// GET /serve-model/health
pub async fn worker_health(State(state): State<AppState>) -> impl IntoResponse {
    let health = state.serving_service.check_worker_health().await;

    let status = if health.is_healthy() {
        StatusCode::OK
    } else {
        warn!(url = %health.url, message = ?health.message, "Serving worker is not healthy");
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(health))
}

/// POST /predict
pub async fn predict(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<Value>, ApiError> {
    let rows = request.data.len();

    let predictions = state
        .serving_service
        .predict(request.columns, request.data)
        .await
        .inspect_err(|e| error!(rows, error = %e, "Prediction failed"))
        .map_err(|e| ApiError::for_operation("get predictions", e))?;

    info!(rows, "Prediction served");

    Ok(Json(predictions))
}
