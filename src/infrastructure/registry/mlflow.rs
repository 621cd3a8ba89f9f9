use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::wire::{
    GetLatestVersionsResponse, ListArtifactsResponse, SearchExperimentsResponse,
    SearchRegisteredModelsResponse, SearchRunsResponse, WireError,
};
use crate::domain::{
    Artifact, DomainError, Experiment, ModelVersion, RegisteredModel, RegistryClient, Run,
};
use crate::infrastructure::http_client::{HttpClientTrait, HttpError};

const API_PREFIX: &str = "api/2.0/mlflow";

/// Page size requested from paginated search endpoints
const SEARCH_PAGE_SIZE: u32 = 1000;

/// Registry client speaking the MLflow tracking server REST API
#[derive(Debug)]
pub struct MlflowRegistryClient<C: HttpClientTrait> {
    client: C,
    base_url: String,
}

impl<C: HttpClientTrait> MlflowRegistryClient<C> {
    pub fn new(client: C, tracking_uri: impl Into<String>) -> Self {
        let base_url = tracking_uri.into().trim_end_matches('/').to_string();

        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!("{}/{}/{}", self.base_url, API_PREFIX, endpoint)
    }

    async fn post<T: DeserializeOwned>(
        &self,
        operation: &str,
        endpoint: &str,
        body: Value,
    ) -> Result<T, DomainError> {
        let url = self.api_url(endpoint);
        debug!(operation, url = %url, "Calling registry");

        let value = self
            .client
            .post_json(&url, &body)
            .await
            .map_err(|e| map_http_error(operation, e))?;

        decode(operation, value)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        operation: &str,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, DomainError> {
        let url = self.api_url(endpoint);
        debug!(operation, url = %url, "Calling registry");

        let value = self
            .client
            .get_json(&url, query)
            .await
            .map_err(|e| map_http_error(operation, e))?;

        decode(operation, value)
    }
}

fn decode<T: DeserializeOwned>(operation: &str, value: Value) -> Result<T, DomainError> {
    serde_json::from_value(value).map_err(|e| {
        DomainError::registry_unavailable(format!(
            "{} returned an unexpected response: {}",
            operation, e
        ))
    })
}

/// Translate an HTTP failure into the domain taxonomy.
///
/// Only the registry's own error codes produce `NotFound`/`InvalidArgument`;
/// every other failure, including a bare 404 from a misrouted base URL, is
/// reported as the registry being unavailable.
fn map_http_error(operation: &str, error: HttpError) -> DomainError {
    match error {
        HttpError::Status { status, body } => {
            let parsed = serde_json::from_str::<WireError>(&body).ok();
            let code = parsed.as_ref().and_then(|e| e.error_code.clone());
            let message = parsed
                .and_then(|e| e.message)
                .unwrap_or_else(|| body.clone());

            match code.as_deref() {
                Some("RESOURCE_DOES_NOT_EXIST") => DomainError::not_found(message),
                Some("INVALID_PARAMETER_VALUE") => DomainError::invalid_argument(message),
                _ => DomainError::registry_unavailable(format!(
                    "{} failed with HTTP {}: {}",
                    operation, status, message
                )),
            }
        }
        other => DomainError::registry_unavailable(format!("{} failed: {}", operation, other)),
    }
}

/// Advance to the next page, stopping on an absent, empty or repeated token
fn next_token(current: Option<&str>, next: Option<String>) -> Option<String> {
    match next {
        Some(token) if token.is_empty() => None,
        Some(token) if Some(token.as_str()) == current => {
            warn!(token = %token, "Registry returned the same page token twice, stopping");
            None
        }
        other => other,
    }
}

#[async_trait]
impl<C: HttpClientTrait> RegistryClient for MlflowRegistryClient<C> {
    async fn list_experiments(&self) -> Result<Vec<Experiment>, DomainError> {
        let mut experiments = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut body = json!({ "max_results": SEARCH_PAGE_SIZE });
            if let Some(token) = &page_token {
                body["page_token"] = json!(token);
            }

            let page: SearchExperimentsResponse =
                self.post("search_experiments", "experiments/search", body).await?;

            experiments.extend(page.experiments.into_iter().map(Experiment::from));

            match next_token(page_token.as_deref(), page.next_page_token) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(experiments)
    }

    async fn list_runs(
        &self,
        experiment_id: &str,
        max_results: u32,
    ) -> Result<Vec<Run>, DomainError> {
        let body = json!({
            "experiment_ids": [experiment_id],
            "max_results": max_results,
        });

        let response: SearchRunsResponse = self.post("search_runs", "runs/search", body).await?;

        response.runs.into_iter().map(Run::try_from).collect()
    }

    async fn list_registered_models(&self) -> Result<Vec<RegisteredModel>, DomainError> {
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![("max_results", SEARCH_PAGE_SIZE.to_string())];
            if let Some(token) = &page_token {
                query.push(("page_token", token.clone()));
            }

            let page: SearchRegisteredModelsResponse = self
                .get("search_registered_models", "registered-models/search", &query)
                .await?;

            for model in page.registered_models {
                models.push(RegisteredModel::try_from(model)?);
            }

            match next_token(page_token.as_deref(), page.next_page_token) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(models)
    }

    async fn get_latest_versions(
        &self,
        model_name: &str,
    ) -> Result<Vec<ModelVersion>, DomainError> {
        let response: GetLatestVersionsResponse = self
            .post(
                "get_latest_versions",
                "registered-models/get-latest-versions",
                json!({ "name": model_name }),
            )
            .await?;

        response
            .model_versions
            .into_iter()
            .map(ModelVersion::try_from)
            .collect()
    }

    async fn list_artifacts(
        &self,
        run_id: &str,
        path: &str,
    ) -> Result<Vec<Artifact>, DomainError> {
        let mut query = vec![("run_id", run_id.to_string())];
        if !path.is_empty() {
            query.push(("path", path.to_string()));
        }

        let response: ListArtifactsResponse =
            self.get("list_artifacts", "artifacts/list", &query).await?;

        Ok(response.files.into_iter().map(Artifact::from).collect())
    }

    async fn set_alias(
        &self,
        model_name: &str,
        alias: &str,
        version: u64,
    ) -> Result<(), DomainError> {
        let body = json!({
            "name": model_name,
            "alias": alias,
            "version": version.to_string(),
        });

        let _: Value = self
            .post("set_registered_model_alias", "registered-models/alias", body)
            .await?;

        Ok(())
    }

    async fn ping(&self) -> Result<(), DomainError> {
        let _: SearchExperimentsResponse = self
            .post("ping", "experiments/search", json!({ "max_results": 1 }))
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::domain::ModelVersionStatus;
    use crate::infrastructure::http_client::HttpClient;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn registry(server: &MockServer) -> MlflowRegistryClient<HttpClient> {
        let http = HttpClient::with_timeout(Duration::from_secs(5)).unwrap();
        MlflowRegistryClient::new(http, format!("{}/", server.uri()))
    }

    #[tokio::test]
    async fn test_list_experiments_follows_pages() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/2.0/mlflow/experiments/search"))
            .and(body_json(json!({"max_results": 1000})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "experiments": [{"experiment_id": "0", "name": "Default"}],
                "next_page_token": "page-2"
            })))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/2.0/mlflow/experiments/search"))
            .and(body_json(json!({"max_results": 1000, "page_token": "page-2"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "experiments": [{"experiment_id": "1", "name": "iris"}]
            })))
            .mount(&server)
            .await;

        let experiments = registry(&server).list_experiments().await.unwrap();

        assert_eq!(
            experiments,
            vec![Experiment::new("0", "Default"), Experiment::new("1", "iris")]
        );
    }

    #[tokio::test]
    async fn test_list_runs_bounds_results() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/2.0/mlflow/runs/search"))
            .and(body_json(json!({"experiment_ids": ["1"], "max_results": 100})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "runs": [
                    {"info": {"run_uuid": "b", "run_id": "b", "experiment_id": "1"}, "data": {}},
                    {"info": {"run_id": "a", "experiment_id": "1"}}
                ]
            })))
            .mount(&server)
            .await;

        let runs = registry(&server).list_runs("1", 100).await.unwrap();

        let ids: Vec<&str> = runs.iter().map(|r| r.run_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn test_list_registered_models_follows_pages() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/2.0/mlflow/registered-models/search"))
            .and(query_param("page_token", "next"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "registered_models": [{"name": "wine", "latest_versions": [{"version": "1"}]}]
            })))
            .with_priority(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/2.0/mlflow/registered-models/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "registered_models": [{"name": "iris-data", "latest_versions": [{"version": "3"}]}],
                "next_page_token": "next"
            })))
            .with_priority(2)
            .mount(&server)
            .await;

        let models = registry(&server).list_registered_models().await.unwrap();

        assert_eq!(models.len(), 2);
        assert_eq!(models[0].name, "iris-data");
        assert_eq!(models[0].latest_versions, vec![3]);
        assert_eq!(models[1].name, "wine");
    }

    #[tokio::test]
    async fn test_get_latest_versions_empty() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/2.0/mlflow/registered-models/get-latest-versions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let versions = registry(&server).get_latest_versions("empty").await.unwrap();
        assert!(versions.is_empty());
    }

    #[tokio::test]
    async fn test_get_latest_versions_maps_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/2.0/mlflow/registered-models/get-latest-versions"))
            .and(body_json(json!({"name": "iris-data"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model_versions": [
                    {"name": "iris-data", "version": "1", "run_id": "r1", "status": "READY"},
                    {"name": "iris-data", "version": "2", "run_id": "r2", "status": "FAILED_REGISTRATION"}
                ]
            })))
            .mount(&server)
            .await;

        let versions = registry(&server).get_latest_versions("iris-data").await.unwrap();

        assert_eq!(versions[0].status, ModelVersionStatus::Ready);
        assert_eq!(versions[1].status, ModelVersionStatus::Failed);
    }

    #[tokio::test]
    async fn test_list_artifacts_root_omits_path() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/2.0/mlflow/artifacts/list"))
            .and(query_param("run_id", "abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "files": [{"path": "model", "is_dir": true}]
            })))
            .mount(&server)
            .await;

        let artifacts = registry(&server).list_artifacts("abc", "").await.unwrap();

        assert_eq!(artifacts.len(), 1);
        let requests = server.received_requests().await.unwrap();
        assert!(!requests[0].url.query().unwrap_or_default().contains("path="));
    }

    #[tokio::test]
    async fn test_list_artifacts_unknown_run_is_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/2.0/mlflow/artifacts/list"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error_code": "RESOURCE_DOES_NOT_EXIST",
                "message": "Run 'missing' not found"
            })))
            .mount(&server)
            .await;

        let error = registry(&server)
            .list_artifacts("missing", "")
            .await
            .unwrap_err();

        assert!(matches!(error, DomainError::NotFound { .. }));
        assert!(error.to_string().contains("Run 'missing' not found"));
    }

    #[tokio::test]
    async fn test_set_alias_sends_string_version() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/2.0/mlflow/registered-models/alias"))
            .and(body_json(json!({"name": "iris-data", "alias": "production", "version": "3"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(2)
            .mount(&server)
            .await;

        let client = registry(&server);
        client.set_alias("iris-data", "production", 3).await.unwrap();
        client.set_alias("iris-data", "production", 3).await.unwrap();
    }

    #[tokio::test]
    async fn test_set_alias_invalid_parameter() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/2.0/mlflow/registered-models/alias"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error_code": "INVALID_PARAMETER_VALUE",
                "message": "Model version 99 does not exist"
            })))
            .mount(&server)
            .await;

        let error = registry(&server)
            .set_alias("iris-data", "production", 99)
            .await
            .unwrap_err();

        assert!(matches!(error, DomainError::InvalidArgument { .. }));
    }

    #[tokio::test]
    async fn test_server_error_is_registry_unavailable() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/2.0/mlflow/experiments/search"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let error = registry(&server).list_experiments().await.unwrap_err();

        assert!(matches!(error, DomainError::RegistryUnavailable { .. }));
        assert!(error.to_string().contains("HTTP 503"));
    }

    #[tokio::test]
    async fn test_ping_searches_one_experiment() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/2.0/mlflow/experiments/search"))
            .and(body_json(json!({"max_results": 1})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "experiments": [{"experiment_id": "0", "name": "Default"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        registry(&server).ping().await.unwrap();
    }

    #[tokio::test]
    async fn test_ping_unavailable() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/2.0/mlflow/experiments/search"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let error = registry(&server).ping().await.unwrap_err();
        assert!(matches!(error, DomainError::RegistryUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_unexpected_shape_is_registry_unavailable() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/2.0/mlflow/runs/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"runs": "nope"})))
            .mount(&server)
            .await;

        let error = registry(&server).list_runs("1", 100).await.unwrap_err();
        assert!(matches!(error, DomainError::RegistryUnavailable { .. }));
    }

    #[test]
    fn test_bare_404_is_registry_unavailable() {
        let error = map_http_error(
            "search_runs",
            HttpError::Status {
                status: 404,
                body: "<html>Not Found</html>".to_string(),
            },
        );

        assert!(matches!(error, DomainError::RegistryUnavailable { .. }));
    }

    #[test]
    fn test_transport_error_is_registry_unavailable() {
        let error = map_http_error("ping", HttpError::Transport("connection refused".into()));

        assert!(matches!(error, DomainError::RegistryUnavailable { .. }));
        assert!(error.to_string().contains("connection refused"));
    }

    #[test]
    fn test_next_token() {
        assert_eq!(next_token(None, None), None);
        assert_eq!(next_token(None, Some(String::new())), None);
        assert_eq!(next_token(None, Some("a".into())), Some("a".to_string()));
        assert_eq!(next_token(Some("a"), Some("a".into())), None);
    }

    #[test]
    fn test_base_url_trimmed() {
        let http = HttpClient::with_timeout(Duration::from_secs(1)).unwrap();
        let client = MlflowRegistryClient::new(http, "http://mlflow:5000/");

        assert_eq!(client.base_url(), "http://mlflow:5000");
        assert_eq!(
            client.api_url("runs/search"),
            "http://mlflow:5000/api/2.0/mlflow/runs/search"
        );
    }
}
