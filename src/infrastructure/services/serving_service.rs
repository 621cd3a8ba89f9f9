//! Serving service - Launches the configured model and talks to its worker

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::config::ServingConfig;
use crate::domain::{
    DomainError, ModelUri, ServingHandle, ServingLauncher, ServingSpec, WorkerHealth,
};
use crate::infrastructure::http_client::HttpClientTrait;
use crate::infrastructure::observability::record_serving_launch;

#[derive(Clone)]
pub struct ServingService {
    launcher: Arc<dyn ServingLauncher>,
    http: Arc<dyn HttpClientTrait>,
    config: ServingConfig,
}

impl std::fmt::Debug for ServingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServingService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ServingService {
    pub fn new(
        launcher: Arc<dyn ServingLauncher>,
        http: Arc<dyn HttpClientTrait>,
        config: ServingConfig,
    ) -> Self {
        Self {
            launcher,
            http,
            config,
        }
    }

    /// Build the launch request from configuration. Misconfiguration is a launch failure,
    /// not a client error.
    fn configured_spec(&self) -> Result<ServingSpec, DomainError> {
        let model_name = self
            .config
            .model_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| DomainError::launch_failed("serving.model_name is not configured"))?;

        let model_uri = ModelUri::for_alias(model_name, self.config.alias.as_str())
            .map_err(|e| DomainError::launch_failed(format!("Invalid serving configuration: {}", e)))?;

        ServingSpec::new(model_uri, self.config.host.as_str(), self.config.port)
            .map_err(|e| DomainError::launch_failed(format!("Invalid serving configuration: {}", e)))
    }

    /// Start a worker for the configured model and alias.
    ///
    /// Returns once the process exists; use [`Self::check_worker_health`] to
    /// find out when it accepts traffic.
    pub async fn serve_configured(&self) -> Result<ServingHandle, DomainError> {
        let result = match self.configured_spec() {
            Ok(spec) => self.launcher.launch(&spec).await,
            Err(e) => Err(e),
        };

        record_serving_launch(&result);

        match &result {
            Ok(handle) => info!(
                model_uri = %handle.model_uri,
                port = handle.port,
                pid = ?handle.pid,
                "Model serving launched"
            ),
            Err(e) => error!(error = %e, "Failed to launch model serving"),
        }

        result
    }

    /// Probe the worker's own `/health` endpoint
    pub async fn check_worker_health(&self) -> WorkerHealth {
        let url = format!("{}/health", self.config.worker_base_url());
        let timeout = Duration::from_secs(self.config.health_timeout_secs);

        let probe = tokio::time::timeout(timeout, self.http.get_status(&url)).await;

        match probe {
            Ok(Ok(status)) if (200..300).contains(&status) => WorkerHealth::healthy(url),
            Ok(Ok(status)) => WorkerHealth::unhealthy(url, format!("Worker answered HTTP {}", status)),
            Ok(Err(e)) => WorkerHealth::unhealthy(url, e.to_string()),
            Err(_) => WorkerHealth::unhealthy(
                url,
                format!("No answer within {}s", self.config.health_timeout_secs),
            ),
        }
    }

    /// Forward a tabular payload to the worker and wrap its answer as `{"predictions": ...}`
    pub async fn predict(
        &self,
        columns: Vec<String>,
        data: Vec<Vec<Value>>,
    ) -> Result<Value, DomainError> {
        let url = format!("{}/invocations", self.config.worker_base_url());
        let body = json!({
            "dataframe_split": {
                "columns": columns,
                "data": data,
            }
        });

        info!(url = %url, rows = data_rows(&body), "Forwarding prediction request");

        let response = self.http.post_json(&url, &body).await.map_err(|e| {
            warn!(url = %url, error = %e, "Prediction request failed");
            DomainError::internal(format!("Prediction request to {} failed: {}", url, e))
        })?;

        Ok(json!({ "predictions": response }))
    }
}

fn data_rows(body: &Value) -> usize {
    body["dataframe_split"]["data"]
        .as_array()
        .map(Vec::len)
        .unwrap_or_default()
}
