//! Application state for shared services

use std::sync::Arc;

use serde_json::Value;

use crate::domain::{
    AliasBinding, Artifact, DomainError, Experiment, ModelVersion, RegisteredModel, Run,
    ServingHandle, WorkerHealth,
};
use crate::infrastructure::services::{RegistryService, ServingService};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub registry_service: Arc<dyn RegistryServiceTrait>,
    pub serving_service: Arc<dyn ServingServiceTrait>,
}

impl AppState {
    pub fn new(
        registry_service: Arc<dyn RegistryServiceTrait>,
        serving_service: Arc<dyn ServingServiceTrait>,
    ) -> Self {
        Self {
            registry_service,
            serving_service,
        }
    }
}

/// Trait for registry facade operations
#[async_trait::async_trait]
pub trait RegistryServiceTrait: Send + Sync {
    async fn list_experiments(&self) -> Result<Vec<Experiment>, DomainError>;
    async fn list_runs(&self, experiment_id: &str) -> Result<Vec<Run>, DomainError>;
    async fn list_registered_models(&self) -> Result<Vec<RegisteredModel>, DomainError>;
    async fn get_model_versions(&self, model_name: &str) -> Result<Vec<ModelVersion>, DomainError>;
    async fn get_latest_run_id_for_model(&self, model_name: &str) -> Result<String, DomainError>;
    async fn list_artifacts(
        &self,
        run_id: &str,
        path: Option<&str>,
    ) -> Result<Vec<Artifact>, DomainError>;
    async fn set_alias(
        &self,
        model_name: &str,
        alias: &str,
        version: &str,
    ) -> Result<AliasBinding, DomainError>;
    async fn extract_model_names(&self, experiment_id: &str) -> Result<Vec<String>, DomainError>;
    async fn ping(&self) -> Result<(), DomainError>;
}

/// Trait for serving worker operations
#[async_trait::async_trait]
pub trait ServingServiceTrait: Send + Sync {
    async fn serve_configured(&self) -> Result<ServingHandle, DomainError>;
    async fn check_worker_health(&self) -> WorkerHealth;
    async fn predict(&self, columns: Vec<String>, data: Vec<Vec<Value>>) -> Result<Value, DomainError>;
}

// Implement traits for the actual services

#[async_trait::async_trait]
impl RegistryServiceTrait for RegistryService {
    async fn list_experiments(&self) -> Result<Vec<Experiment>, DomainError> {
        RegistryService::list_experiments(self).await
    }

    async fn list_runs(&self, experiment_id: &str) -> Result<Vec<Run>, DomainError> {
        RegistryService::list_runs(self, experiment_id).await
    }

    async fn list_registered_models(&self) -> Result<Vec<RegisteredModel>, DomainError> {
        RegistryService::list_registered_models(self).await
    }

    async fn get_model_versions(&self, model_name: &str) -> Result<Vec<ModelVersion>, DomainError> {
        RegistryService::get_model_versions(self, model_name).await
    }

    async fn get_latest_run_id_for_model(&self, model_name: &str) -> Result<String, DomainError> {
        RegistryService::get_latest_run_id_for_model(self, model_name).await
    }

    async fn list_artifacts(
        &self,
        run_id: &str,
        path: Option<&str>,
    ) -> Result<Vec<Artifact>, DomainError> {
        RegistryService::list_artifacts(self, run_id, path).await
    }

    async fn set_alias(
        &self,
        model_name: &str,
        alias: &str,
        version: &str,
    ) -> Result<AliasBinding, DomainError> {
        RegistryService::set_alias(self, model_name, alias, version).await
    }

    async fn extract_model_names(&self, experiment_id: &str) -> Result<Vec<String>, DomainError> {
        RegistryService::extract_model_names(self, experiment_id).await
    }

    async fn ping(&self) -> Result<(), DomainError> {
        RegistryService::ping(self).await
    }
}

#[async_trait::async_trait]
impl ServingServiceTrait for ServingService {
    async fn serve_configured(&self) -> Result<ServingHandle, DomainError> {
        ServingService::serve_configured(self).await
    }

    async fn check_worker_health(&self) -> WorkerHealth {
        ServingService::check_worker_health(self).await
    }

    async fn predict(&self, columns: Vec<String>, data: Vec<Vec<Value>>) -> Result<Value, DomainError> {
        ServingService::predict(self, columns, data).await
    }
}
