//! Serving launcher trait

use async_trait::async_trait;

use super::{ServingHandle, ServingSpec};
use crate::domain::error::DomainError;

#[cfg(test)]
use mockall::automock;

/// Starts out-of-process model serving workers.
///
/// `launch` returns as soon as the process exists; it never waits for the
/// worker to accept traffic. Every call starts a new, independent worker,
/// so launching the same spec twice yields two processes competing for
/// the same port.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ServingLauncher: Send + Sync {
    async fn launch(&self, spec: &ServingSpec) -> Result<ServingHandle, DomainError>;
}
