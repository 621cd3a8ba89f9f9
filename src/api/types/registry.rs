//! Registry request and response bodies

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::domain::{AliasBinding, Artifact, Experiment, ModelVersion, RegisteredModel, Run};

/// Body carrying a registered model name (`/model-versions/`, `/run-id/`)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ModelNameRequest {
    #[validate(length(min = 1, message = "model_name must not be empty"))]
    pub model_name: String,
}

/// Body carrying an experiment id (`/runs/`, `/extract-model-names/`)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ExperimentRequest {
    #[validate(length(min = 1, message = "experiment_id must not be empty"))]
    pub experiment_id: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ArtifactsRequest {
    #[validate(length(min = 1, message = "run_id must not be empty"))]
    pub run_id: String,
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateAliasRequest {
    #[validate(length(min = 1, message = "model_name must not be empty"))]
    pub model_name: String,
    #[validate(length(min = 1, message = "alias must not be empty"))]
    pub alias: String,
    /// Accepted as `"3"` or `3`
    #[serde(deserialize_with = "version_string")]
    #[validate(length(min = 1, message = "version must not be empty"))]
    pub version: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum VersionInput {
    Text(String),
    Number(i64),
}

fn version_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match VersionInput::deserialize(deserializer)? {
        VersionInput::Text(text) => text,
        VersionInput::Number(number) => number.to_string(),
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentResponse {
    pub experiment_id: String,
    pub name: String,
}

impl From<Experiment> for ExperimentResponse {
    fn from(experiment: Experiment) -> Self {
        Self {
            experiment_id: experiment.experiment_id,
            name: experiment.name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResponse {
    pub run_id: String,
    pub experiment_id: String,
    /// Non-finite values serialize as `null`
    pub metrics: BTreeMap<String, Option<f64>>,
    pub params: BTreeMap<String, String>,
    pub tags: BTreeMap<String, String>,
}

impl From<Run> for RunResponse {
    fn from(run: Run) -> Self {
        Self {
            run_id: run.run_id,
            experiment_id: run.experiment_id,
            metrics: run
                .metrics
                .into_iter()
                .map(|(key, value)| (key, value.is_finite().then_some(value)))
                .collect(),
            params: run.params,
            tags: run.tags,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisteredModelResponse {
    pub name: String,
    pub latest_versions: Vec<u64>,
}

impl From<RegisteredModel> for RegisteredModelResponse {
    fn from(model: RegisteredModel) -> Self {
        Self {
            name: model.name,
            latest_versions: model.latest_versions,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelVersionResponse {
    pub version: u64,
    pub run_id: String,
    pub status: String,
}

impl From<ModelVersion> for ModelVersionResponse {
    fn from(version: ModelVersion) -> Self {
        Self {
            version: version.version,
            run_id: version.run_id,
            status: version.status.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactResponse {
    pub path: String,
    pub is_dir: bool,
    pub file_size: Option<u64>,
}

impl From<Artifact> for ArtifactResponse {
    fn from(artifact: Artifact) -> Self {
        Self {
            path: artifact.path,
            is_dir: artifact.is_dir,
            file_size: artifact.file_size,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelNamesResponse {
    pub model_names: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunIdResponse {
    pub run_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl From<AliasBinding> for MessageResponse {
    fn from(binding: AliasBinding) -> Self {
        Self {
            message: binding.to_string(),
        }
    }
}
