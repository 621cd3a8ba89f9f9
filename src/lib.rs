//! Registry Gateway
//!
//! A typed HTTP facade over an MLflow-compatible tracking server:
//! - Experiments, runs, artifacts and registered model versions
//! - Alias management shared by the HTTP API and the CLI
//! - Launching `models serve` workers for a configured model alias

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use api::state::AppState;
use infrastructure::{
    http_client::HttpClient,
    registry::MlflowRegistryClient,
    services::{RegistryService, ServingService},
    serving::ProcessServingLauncher,
};
use tracing::info;

/// Build the registry facade for the configured tracking server
pub fn create_registry_service(config: &AppConfig) -> anyhow::Result<RegistryService> {
    let timeout = Duration::from_secs(config.registry.request_timeout_secs);
    let http = HttpClient::with_timeout(timeout)?;
    let client = MlflowRegistryClient::new(http, config.registry.tracking_uri.as_str());

    info!(
        tracking_uri = %client.base_url(),
        timeout_secs = config.registry.request_timeout_secs,
        "Registry client configured"
    );

    Ok(RegistryService::new(Arc::new(client)))
}

/// Create the application state with all services initialized
pub fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let registry_service = create_registry_service(config)?;

    let worker_http = HttpClient::with_timeout(Duration::from_secs(
        config.registry.request_timeout_secs,
    ))?;
    let serving_service = ServingService::new(
        Arc::new(ProcessServingLauncher::from_config(&config.serving)),
        Arc::new(worker_http),
        config.serving.clone(),
    );

    Ok(AppState::new(
        Arc::new(registry_service),
        Arc::new(serving_service),
    ))
}
