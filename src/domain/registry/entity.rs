//! Registry entities observed through the tracking server

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// An experiment grouping related runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experiment {
    pub experiment_id: String,
    pub name: String,
}

impl Experiment {
    pub fn new(experiment_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            experiment_id: experiment_id.into(),
            name: name.into(),
        }
    }
}

/// Read-only snapshot of a single run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub run_id: String,
    pub experiment_id: String,
    #[serde(default)]
    pub metrics: BTreeMap<String, f64>,
    #[serde(default)]
    pub params: BTreeMap<String, String>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

impl Run {
    pub fn new(run_id: impl Into<String>, experiment_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            experiment_id: experiment_id.into(),
            metrics: BTreeMap::new(),
            params: BTreeMap::new(),
            tags: BTreeMap::new(),
        }
    }

    pub fn with_metric(mut self, key: impl Into<String>, value: f64) -> Self {
        self.metrics.insert(key.into(), value);
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }
}

/// A registered model and the version numbers the registry reports as latest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredModel {
    pub name: String,
    pub latest_versions: Vec<u64>,
}

/// Lifecycle status of a model version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModelVersionStatus {
    Pending,
    Ready,
    Failed,
}

impl ModelVersionStatus {
    /// Map the registry's wire status onto the local lifecycle.
    /// Unknown values are treated as still pending.
    pub fn from_wire(status: &str) -> Self {
        match status {
            "READY" => Self::Ready,
            "FAILED_REGISTRATION" | "FAILED" => Self::Failed,
            _ => Self::Pending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Ready => "READY",
            Self::Failed => "FAILED",
        }
    }
}

impl fmt::Display for ModelVersionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One version of a registered model, keyed by (model name, version)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelVersion {
    pub version: u64,
    pub run_id: String,
    pub status: ModelVersionStatus,
}

impl ModelVersion {
    pub fn new(version: u64, run_id: impl Into<String>, status: ModelVersionStatus) -> Self {
        Self {
            version,
            run_id: run_id.into(),
            status,
        }
    }
}

/// Pick the version with the numerically greatest version number
pub fn latest_version(versions: &[ModelVersion]) -> Option<&ModelVersion> {
    versions.iter().max_by_key(|v| v.version)
}

/// A file or directory logged against a run, relative to its artifact root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub path: String,
    pub is_dir: bool,
    pub file_size: Option<u64>,
}

/// Binding of an alias to a model version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasBinding {
    pub model_name: String,
    pub alias: String,
    pub version: u64,
}

impl AliasBinding {
    pub fn new(model_name: impl Into<String>, alias: impl Into<String>, version: u64) -> Self {
        Self {
            model_name: model_name.into(),
            alias: alias.into(),
            version,
        }
    }
}

impl fmt::Display for AliasBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Alias '{}' set to version '{}' for model '{}'.",
            self.alias, self.version, self.model_name
        )
    }
}
