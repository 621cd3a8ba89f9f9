//! Domain layer - Registry entities, serving types and errors

pub mod error;
pub mod registry;
pub mod serving;

pub use error::DomainError;
pub use registry::{
    AliasBinding, Artifact, Experiment, ModelVersion, ModelVersionStatus, RegisteredModel,
    RegistryClient, Run,
};
pub use serving::{ModelUri, ServingHandle, ServingLauncher, ServingSpec, WorkerHealth};
