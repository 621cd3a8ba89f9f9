//! Wire shapes of the tracking server's REST API (`/api/2.0/mlflow`)
//!
//! These never leave the infrastructure layer; every response is converted
//! into the domain records before it is returned.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::domain::{
    Artifact, DomainError, Experiment, ModelVersion, ModelVersionStatus, RegisteredModel, Run,
};

/// Error envelope returned with non-2xx responses
#[derive(Debug, Deserialize)]
pub struct WireError {
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchExperimentsResponse {
    #[serde(default)]
    pub experiments: Vec<WireExperiment>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WireExperiment {
    pub experiment_id: String,
    #[serde(default)]
    pub name: String,
}

impl From<WireExperiment> for Experiment {
    fn from(wire: WireExperiment) -> Self {
        Experiment::new(wire.experiment_id, wire.name)
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchRunsResponse {
    #[serde(default)]
    pub runs: Vec<WireRun>,
}

#[derive(Debug, Deserialize)]
pub struct WireRun {
    pub info: WireRunInfo,
    #[serde(default)]
    pub data: WireRunData,
}

#[derive(Debug, Deserialize)]
pub struct WireRunInfo {
    /// Servers send both keys; older ones only `run_uuid`
    #[serde(default)]
    pub run_id: Option<String>,
    #[serde(default)]
    pub run_uuid: Option<String>,
    #[serde(default)]
    pub experiment_id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct WireRunData {
    #[serde(default)]
    pub metrics: Vec<WireMetric>,
    #[serde(default)]
    pub params: Vec<WireKeyValue>,
    #[serde(default)]
    pub tags: Vec<WireKeyValue>,
}

#[derive(Debug, Deserialize)]
pub struct WireMetric {
    pub key: String,
    #[serde(default)]
    pub value: Value,
}

#[derive(Debug, Deserialize)]
pub struct WireKeyValue {
    pub key: String,
    #[serde(default)]
    pub value: String,
}

impl TryFrom<WireRun> for Run {
    type Error = DomainError;

    fn try_from(wire: WireRun) -> Result<Self, Self::Error> {
        let run_id = wire
            .info
            .run_id
            .or(wire.info.run_uuid)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                DomainError::registry_unavailable("Run without run_id in search_runs response")
            })?;

        let mut run = Run::new(run_id, wire.info.experiment_id);

        for metric in wire.data.metrics {
            // Non-finite values arrive as strings ("NaN", "Infinity")
            let value = match &metric.value {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.parse::<f64>().ok(),
                _ => None,
            };

            if let Some(value) = value {
                run.metrics.insert(metric.key, value);
            }
        }

        run.params
            .extend(wire.data.params.into_iter().map(|p| (p.key, p.value)));
        run.tags
            .extend(wire.data.tags.into_iter().map(|t| (t.key, t.value)));

        Ok(run)
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchRegisteredModelsResponse {
    #[serde(default)]
    pub registered_models: Vec<WireRegisteredModel>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WireRegisteredModel {
    pub name: String,
    #[serde(default)]
    pub latest_versions: Vec<WireModelVersion>,
}

impl TryFrom<WireRegisteredModel> for RegisteredModel {
    type Error = DomainError;

    fn try_from(wire: WireRegisteredModel) -> Result<Self, Self::Error> {
        let latest_versions = wire
            .latest_versions
            .iter()
            .map(|v| parse_wire_version(&wire.name, &v.version))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RegisteredModel {
            name: wire.name,
            latest_versions,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct GetLatestVersionsResponse {
    #[serde(default)]
    pub model_versions: Vec<WireModelVersion>,
}

#[derive(Debug, Deserialize)]
pub struct WireModelVersion {
    #[serde(default)]
    pub name: String,
    #[serde(deserialize_with = "string_or_number")]
    pub version: String,
    #[serde(default)]
    pub run_id: String,
    #[serde(default)]
    pub status: Option<String>,
}

impl TryFrom<WireModelVersion> for ModelVersion {
    type Error = DomainError;

    fn try_from(wire: WireModelVersion) -> Result<Self, Self::Error> {
        let version = parse_wire_version(&wire.name, &wire.version)?;
        let status = wire
            .status
            .as_deref()
            .map(ModelVersionStatus::from_wire)
            .unwrap_or(ModelVersionStatus::Pending);

        Ok(ModelVersion::new(version, wire.run_id, status))
    }
}

fn parse_wire_version(model_name: &str, raw: &str) -> Result<u64, DomainError> {
    raw.parse::<u64>().map_err(|_| {
        DomainError::registry_unavailable(format!(
            "Registry returned non-numeric version '{}' for model '{}'",
            raw, model_name
        ))
    })
}

#[derive(Debug, Deserialize)]
pub struct ListArtifactsResponse {
    #[serde(default)]
    pub files: Vec<WireFileInfo>,
}

#[derive(Debug, Deserialize)]
pub struct WireFileInfo {
    pub path: String,
    #[serde(default)]
    pub is_dir: bool,
    #[serde(default, deserialize_with = "optional_size")]
    pub file_size: Option<u64>,
}

impl From<WireFileInfo> for Artifact {
    fn from(wire: WireFileInfo) -> Self {
        Artifact {
            path: wire.path,
            is_dir: wire.is_dir,
            file_size: wire.file_size,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(u64),
}

/// int64 fields are encoded as JSON strings by some server versions
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s,
        StringOrNumber::Number(n) => n.to_string(),
    })
}

fn optional_size<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<StringOrNumber>::deserialize(deserializer)? {
        None => Ok(None),
        Some(StringOrNumber::Number(n)) => Ok(Some(n)),
        Some(StringOrNumber::String(s)) => s
            .parse::<u64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
