//! Registry domain - Experiments, runs, registered models and aliases

mod client;
mod entity;
mod model_names;
mod validation;

pub use client::{RegistryClient, MAX_RUNS_PER_EXPERIMENT};
#[cfg(test)]
pub use client::MockRegistryClient;
pub use entity::{
    latest_version, AliasBinding, Artifact, Experiment, ModelVersion, ModelVersionStatus,
    RegisteredModel, Run,
};
pub use model_names::{extract_model_names_from_runs, LOG_MODEL_HISTORY_TAG, MODEL_NAME_TAG};
pub use validation::{
    parse_version, validate_alias, validate_identifier, RegistryValidationError,
};
