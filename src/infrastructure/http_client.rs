use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::domain::DomainError;

/// Failures of a single HTTP exchange, before any domain interpretation
#[derive(Debug, Clone, Error, PartialEq)]
pub enum HttpError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    Decode(String),
}

/// Trait for HTTP client operations (for mocking)
#[async_trait]
pub trait HttpClientTrait: Send + Sync + std::fmt::Debug {
    async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value, HttpError>;

    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, HttpError>;

    /// Issue a GET and report only the status code, ignoring the body
    async fn get_status(&self, url: &str) -> Result<u16, HttpError>;
}

/// Real HTTP client using reqwest
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn with_timeout(timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

async fn read_json(response: reqwest::Response) -> Result<Value, HttpError> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(HttpError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| HttpError::Transport(e.to_string()))?;

    // Mutation endpoints may answer 200 with an empty body
    if bytes.is_empty() {
        return Ok(Value::Object(serde_json::Map::new()));
    }

    serde_json::from_slice(&bytes).map_err(|e| HttpError::Decode(e.to_string()))
}

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value, HttpError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| HttpError::Transport(e.to_string()))?;

        read_json(response).await
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, HttpError> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| HttpError::Transport(e.to_string()))?;

        read_json(response).await
    }

    async fn get_status(&self, url: &str) -> Result<u16, HttpError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| HttpError::Transport(e.to_string()))?;

        Ok(response.status().as_u16())
    }
}
