//! Registry service - Facade over the tracking server client

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::domain::registry::{
    extract_model_names_from_runs, latest_version, parse_version, validate_alias,
    validate_identifier, MAX_RUNS_PER_EXPERIMENT,
};
use crate::domain::{
    AliasBinding, Artifact, DomainError, Experiment, ModelVersion, RegisteredModel,
    RegistryClient, Run,
};
use crate::infrastructure::observability::record_registry_call;

/// Typed facade over the registry. Owns no state beyond the client.
#[derive(Clone)]
pub struct RegistryService {
    client: Arc<dyn RegistryClient>,
}

impl std::fmt::Debug for RegistryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryService").finish_non_exhaustive()
    }
}

impl RegistryService {
    pub fn new(client: Arc<dyn RegistryClient>) -> Self {
        Self { client }
    }

    /// Time a registry call, record its outcome and log failures
    async fn observe<T, F>(&self, operation: &'static str, call: F) -> Result<T, DomainError>
    where
        F: Future<Output = Result<T, DomainError>>,
    {
        let start = Instant::now();
        let result = call.await;
        let elapsed = start.elapsed();

        record_registry_call(operation, &result, elapsed);

        match &result {
            Ok(_) => debug!(operation, elapsed_ms = elapsed.as_millis() as u64, "Registry call succeeded"),
            Err(e) => warn!(operation, error = %e, "Registry call failed"),
        }

        result
    }

    /// All experiments, across every page the registry returns
    pub async fn list_experiments(&self) -> Result<Vec<Experiment>, DomainError> {
        self.observe("list_experiments", self.client.list_experiments())
            .await
    }

    /// Up to 100 runs of an experiment, in registry order
    pub async fn list_runs(&self, experiment_id: &str) -> Result<Vec<Run>, DomainError> {
        validate_identifier("experiment_id", experiment_id)?;

        self.observe(
            "list_runs",
            self.client.list_runs(experiment_id, MAX_RUNS_PER_EXPERIMENT),
        )
        .await
    }

    pub async fn list_registered_models(&self) -> Result<Vec<RegisteredModel>, DomainError> {
        self.observe("list_registered_models", self.client.list_registered_models())
            .await
    }

    /// Latest version per stage; empty when the model has no versions
    pub async fn get_model_versions(
        &self,
        model_name: &str,
    ) -> Result<Vec<ModelVersion>, DomainError> {
        validate_identifier("model_name", model_name)?;

        self.observe(
            "get_model_versions",
            self.client.get_latest_versions(model_name),
        )
        .await
    }

    /// Run that produced the numerically greatest version of a model
    pub async fn get_latest_run_id_for_model(&self, model_name: &str) -> Result<String, DomainError> {
        let versions = self.get_model_versions(model_name).await?;

        latest_version(&versions)
            .map(|v| v.run_id.clone())
            .ok_or_else(|| {
                DomainError::not_found(format!("No versions found for model '{}'", model_name))
            })
    }

    /// Artifacts under `path`; `None` and `Some("")` both list the root
    pub async fn list_artifacts(
        &self,
        run_id: &str,
        path: Option<&str>,
    ) -> Result<Vec<Artifact>, DomainError> {
        validate_identifier("run_id", run_id)?;

        self.observe(
            "list_artifacts",
            self.client.list_artifacts(run_id, path.unwrap_or_default()),
        )
        .await
    }

    /// Point an alias at a version. Repeating the same binding is a no-op upsert.
    pub async fn set_alias(
        &self,
        model_name: &str,
        alias: &str,
        version: &str,
    ) -> Result<AliasBinding, DomainError> {
        validate_identifier("model_name", model_name)?;
        validate_alias(alias)?;
        let version = parse_version(version)?;

        self.observe(
            "set_alias",
            self.client.set_alias(model_name, alias, version),
        )
        .await?;

        let binding = AliasBinding::new(model_name, alias, version);
        info!(
            model_name = %binding.model_name,
            alias = %binding.alias,
            version = binding.version,
            "Alias updated"
        );

        Ok(binding)
    }

    /// Model names logged by the runs of an experiment, sorted and de-duplicated
    pub async fn extract_model_names(&self, experiment_id: &str) -> Result<Vec<String>, DomainError> {
        let runs = self.list_runs(experiment_id).await?;
        Ok(extract_model_names_from_runs(&runs))
    }

    pub async fn ping(&self) -> Result<(), DomainError> {
        self.observe("ping", self.client.ping()).await
    }
}
