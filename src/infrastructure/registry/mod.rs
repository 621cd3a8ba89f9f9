//! Tracking server client implementation

mod mlflow;
mod wire;

pub use mlflow::MlflowRegistryClient;
