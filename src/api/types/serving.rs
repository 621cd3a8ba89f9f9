//! Serving request and response bodies

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::ServingHandle;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServeModelResponse {
    pub message: String,
    pub model_uri: String,
    pub port: u16,
    pub pid: Option<u32>,
}

impl From<ServingHandle> for ServeModelResponse {
    fn from(handle: ServingHandle) -> Self {
        Self {
            message: format!(
                "Model serving started for {} on port {}",
                handle.model_uri, handle.port
            ),
            model_uri: handle.model_uri,
            port: handle.port,
            pid: handle.pid,
        }
    }
}

/// Tabular prediction input: column names plus rows of values
#[derive(Debug, Clone, Deserialize)]
pub struct PredictRequest {
    pub columns: Vec<String>,
    pub data: Vec<Vec<Value>>,
}
