//! Serving worker types

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::registry::{validate_alias, validate_identifier};
use crate::domain::DomainError;

/// Registry URI resolving a model through one of its aliases: `models:/<name>@<alias>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelUri {
    model_name: String,
    alias: String,
}

impl ModelUri {
    pub fn for_alias(
        model_name: impl Into<String>,
        alias: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let model_name = model_name.into();
        let alias = alias.into();

        validate_identifier("model_name", &model_name)?;
        validate_alias(&alias)?;

        Ok(Self { model_name, alias })
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }
}

impl fmt::Display for ModelUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "models:/{}@{}", self.model_name, self.alias)
    }
}

/// What to serve and where
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServingSpec {
    pub model_uri: ModelUri,
    pub host: String,
    pub port: u16,
}

impl ServingSpec {
    pub fn new(model_uri: ModelUri, host: impl Into<String>, port: u16) -> Result<Self, DomainError> {
        if port == 0 {
            return Err(DomainError::invalid_argument(
                "Serving port must be between 1 and 65535",
            ));
        }

        Ok(Self {
            model_uri,
            host: host.into(),
            port,
        })
    }
}

/// A worker process that has been started. Nothing is known about its readiness.
#[derive(Debug, Clone, Serialize)]
pub struct ServingHandle {
    pub pid: Option<u32>,
    pub model_uri: String,
    pub port: u16,
    pub started_at: DateTime<Utc>,
}

/// Result of probing a worker's own health endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerStatus {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkerHealth {
    pub status: WorkerStatus,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl WorkerHealth {
    pub fn healthy(url: impl Into<String>) -> Self {
        Self {
            status: WorkerStatus::Healthy,
            url: url.into(),
            message: None,
        }
    }

    pub fn unhealthy(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: WorkerStatus::Unhealthy,
            url: url.into(),
            message: Some(message.into()),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == WorkerStatus::Healthy
    }
}
