use std::process::Stdio;

use async_trait::async_trait;
use chrono::Utc;
use tokio::process::Command;
use tracing::{info, warn};

use crate::config::ServingConfig;
use crate::domain::{DomainError, ServingHandle, ServingLauncher, ServingSpec};

/// Launches workers as `<executable> models serve -m <uri> --host <host> -p <port> [extra args]`
#[derive(Debug, Clone)]
pub struct ProcessServingLauncher {
    executable: String,
    extra_args: Vec<String>,
}

impl ProcessServingLauncher {
    pub fn new(executable: impl Into<String>, extra_args: Vec<String>) -> Self {
        Self {
            executable: executable.into(),
            extra_args,
        }
    }

    pub fn from_config(config: &ServingConfig) -> Self {
        Self::new(config.executable.clone(), config.extra_args.clone())
    }

    fn args(&self, spec: &ServingSpec) -> Vec<String> {
        let mut args = vec![
            "models".to_string(),
            "serve".to_string(),
            "-m".to_string(),
            spec.model_uri.to_string(),
            "--host".to_string(),
            spec.host.clone(),
            "-p".to_string(),
            spec.port.to_string(),
        ];
        args.extend(self.extra_args.iter().cloned());
        args
    }
}

#[async_trait]
impl ServingLauncher for ProcessServingLauncher {
    async fn launch(&self, spec: &ServingSpec) -> Result<ServingHandle, DomainError> {
        let args = self.args(spec);
        let model_uri = spec.model_uri.to_string();

        let mut child = Command::new(&self.executable)
            .args(&args)
            .stdin(Stdio::null())
            .kill_on_drop(false)
            .spawn()
            .map_err(|e| {
                DomainError::launch_failed(format!(
                    "Failed to start '{}' for {}: {}",
                    self.executable, model_uri, e
                ))
            })?;

        let pid = child.id();

        info!(
            executable = %self.executable,
            model_uri = %model_uri,
            port = spec.port,
            pid = ?pid,
            "Serving worker started"
        );

        // Reap the worker so it never lingers as a zombie
        let reaped_uri = model_uri.clone();
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) if status.success() => {
                    info!(model_uri = %reaped_uri, pid = ?pid, "Serving worker exited")
                }
                Ok(status) => {
                    warn!(model_uri = %reaped_uri, pid = ?pid, %status, "Serving worker exited with failure")
                }
                Err(e) => {
                    warn!(model_uri = %reaped_uri, pid = ?pid, error = %e, "Failed to wait on serving worker")
                }
            }
        });

        Ok(ServingHandle {
            pid,
            model_uri,
            port: spec.port,
            started_at: Utc::now(),
        })
    }
}
