//! Registry endpoint handlers

use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use tracing::{error, info};

use crate::api::state::AppState;
use crate::api::types::{
    ApiError, ArtifactResponse, ArtifactsRequest, ExperimentRequest, ExperimentResponse, Json,
    MessageResponse, ModelNameRequest, ModelNamesResponse, ModelVersionResponse,
    RegisteredModelResponse, RunIdResponse, RunResponse, UpdateAliasRequest, ValidatedJson,
};

pub fn create_registry_router() -> Router<AppState> {
    Router::new()
        .route("/models/", get(list_models))
        .route("/model-versions/", post(get_model_versions))
        .route("/experiments/", get(list_experiments))
        .route("/runs/", post(list_runs))
        .route("/artifacts/", post(list_artifacts))
        .route("/extract-model-names/", post(extract_model_names))
        .route("/run-id/", post(get_latest_run_id))
        .route("/update-alias", post(update_alias))
}

/// GET /models/
pub async fn list_models(
    State(state): State<AppState>,
) -> Result<Json<Vec<RegisteredModelResponse>>, ApiError> {
    let models = state
        .registry_service
        .list_registered_models()
        .await
        .inspect_err(|e| error!(error = %e, "Failed to list registered models"))
        .map_err(|e| ApiError::for_operation("list registered models", e))?;

    info!(count = models.len(), "Listed registered models");

    Ok(Json(models.into_iter().map(Into::into).collect()))
}

/// POST /model-versions/
pub async fn get_model_versions(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ModelNameRequest>,
) -> Result<Json<Vec<ModelVersionResponse>>, ApiError> {
    let versions = state
        .registry_service
        .get_model_versions(&request.model_name)
        .await
        .inspect_err(|e| error!(model_name = %request.model_name, error = %e, "Failed to get model versions"))
        .map_err(|e| ApiError::for_operation("get model versions", e))?;

    info!(model_name = %request.model_name, count = versions.len(), "Fetched model versions");

    Ok(Json(versions.into_iter().map(Into::into).collect()))
}

/// GET /experiments/
pub async fn list_experiments(
    State(state): State<AppState>,
) -> Result<Json<Vec<ExperimentResponse>>, ApiError> {
    let experiments = state
        .registry_service
        .list_experiments()
        .await
        .inspect_err(|e| error!(error = %e, "Failed to list experiments"))
        .map_err(|e| ApiError::for_operation("list experiments", e))?;

    info!(count = experiments.len(), "Listed experiments");

    Ok(Json(experiments.into_iter().map(Into::into).collect()))
}

/// POST /runs/
pub async fn list_runs(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ExperimentRequest>,
) -> Result<Json<Vec<RunResponse>>, ApiError> {
    let runs = state
        .registry_service
        .list_runs(&request.experiment_id)
        .await
        .inspect_err(|e| error!(experiment_id = %request.experiment_id, error = %e, "Failed to list runs"))
        .map_err(|e| ApiError::for_operation("list runs", e))?;

    info!(experiment_id = %request.experiment_id, count = runs.len(), "Listed runs");

    Ok(Json(runs.into_iter().map(Into::into).collect()))
}

/// POST /artifacts/
pub async fn list_artifacts(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ArtifactsRequest>,
) -> Result<Json<Vec<ArtifactResponse>>, ApiError> {
    let artifacts = state
        .registry_service
        .list_artifacts(&request.run_id, request.path.as_deref())
        .await
        .inspect_err(|e| error!(run_id = %request.run_id, error = %e, "Failed to list artifacts"))
        .map_err(|e| ApiError::for_operation("list artifacts", e))?;

    info!(run_id = %request.run_id, count = artifacts.len(), "Listed artifacts");

    Ok(Json(artifacts.into_iter().map(Into::into).collect()))
}

/// POST /extract-model-names/
pub async fn extract_model_names(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ExperimentRequest>,
) -> Result<Json<ModelNamesResponse>, ApiError> {
    let model_names = state
        .registry_service
        .extract_model_names(&request.experiment_id)
        .await
        .inspect_err(|e| error!(experiment_id = %request.experiment_id, error = %e, "Failed to extract model names"))
        .map_err(|e| ApiError::for_operation("extract model names", e))?;

    info!(experiment_id = %request.experiment_id, count = model_names.len(), "Extracted model names");

    Ok(Json(ModelNamesResponse { model_names }))
}

/// POST /run-id/
pub async fn get_latest_run_id(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ModelNameRequest>,
) -> Result<Json<RunIdResponse>, ApiError> {
    let run_id = state
        .registry_service
        .get_latest_run_id_for_model(&request.model_name)
        .await
        .inspect_err(|e| error!(model_name = %request.model_name, error = %e, "Failed to resolve latest run id"))
        .map_err(|e| ApiError::for_operation("resolve the latest run id", e))?;

    info!(model_name = %request.model_name, run_id = %run_id, "Resolved latest run id");

    Ok(Json(RunIdResponse { run_id }))
}

/// POST /update-alias
pub async fn update_alias(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<UpdateAliasRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let binding = state
        .registry_service
        .set_alias(&request.model_name, &request.alias, &request.version)
        .await
        .inspect_err(|e| {
            error!(
                model_name = %request.model_name,
                alias = %request.alias,
                version = %request.version,
                error = %e,
                "Failed to update alias"
            )
        })
        .map_err(|e| ApiError::for_operation("update alias", e))?;

    Ok(Json(binding.into()))
}
