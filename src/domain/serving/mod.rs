//! Serving domain - Launching model serving workers

mod entity;
mod launcher;

pub use entity::{ModelUri, ServingHandle, ServingSpec, WorkerHealth, WorkerStatus};
#[cfg(test)]
pub use launcher::MockServingLauncher;
pub use launcher::ServingLauncher;
