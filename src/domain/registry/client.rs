//! Registry client trait

use async_trait::async_trait;

use super::{Artifact, Experiment, ModelVersion, RegisteredModel, Run};
use crate::domain::error::DomainError;

#[cfg(test)]
use mockall::automock;

/// Maximum number of runs returned for a single experiment
pub const MAX_RUNS_PER_EXPERIMENT: u32 = 100;

/// Typed access to a remote tracking/registry server.
///
/// Implementations translate every transport failure into
/// [`DomainError::RegistryUnavailable`] and never expose the backing
/// client's own response or error types.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// Lists every experiment, following pagination until exhausted
    async fn list_experiments(&self) -> Result<Vec<Experiment>, DomainError>;

    /// Lists up to `max_results` runs of an experiment, in registry order
    async fn list_runs(
        &self,
        experiment_id: &str,
        max_results: u32,
    ) -> Result<Vec<Run>, DomainError>;

    /// Lists every registered model, following pagination until exhausted
    async fn list_registered_models(&self) -> Result<Vec<RegisteredModel>, DomainError>;

    /// Latest version per lifecycle stage; empty when the model has none
    async fn get_latest_versions(
        &self,
        model_name: &str,
    ) -> Result<Vec<ModelVersion>, DomainError>;

    /// Lists artifacts under `path` (empty string is the run's artifact root)
    async fn list_artifacts(
        &self,
        run_id: &str,
        path: &str,
    ) -> Result<Vec<Artifact>, DomainError>;

    /// Points `alias` at `version`, replacing any existing binding
    async fn set_alias(
        &self,
        model_name: &str,
        alias: &str,
        version: u64,
    ) -> Result<(), DomainError>;

    /// Cheap reachability probe
    async fn ping(&self) -> Result<(), DomainError>;
}
