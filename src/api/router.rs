use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use super::health;
use super::middleware::{logging_middleware, metrics_middleware};
use super::registry;
use super::serving;
use super::state::AppState;

/// Create the full router with application state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .merge(registry::create_registry_router())
        .merge(serving::create_serving_router())
        .with_state(state)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use chrono::Utc;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::ServingConfig;
    use crate::domain::registry::{MockRegistryClient, LOG_MODEL_HISTORY_TAG};
    use crate::domain::serving::MockServingLauncher;
    use crate::domain::{
        Artifact, DomainError, Experiment, ModelVersion, ModelVersionStatus, RegisteredModel, Run,
        ServingHandle,
    };
    use crate::infrastructure::http_client::mock::MockHttpClient;
    use crate::infrastructure::services::{RegistryService, ServingService};

    fn serving_config() -> ServingConfig {
        ServingConfig {
            model_name: Some("iris-data".to_string()),
            alias: "production".to_string(),
            ..ServingConfig::default()
        }
    }

    fn app(client: MockRegistryClient) -> Router {
        app_with(client, MockServingLauncher::new(), MockHttpClient::new())
    }

    fn app_with(
        client: MockRegistryClient,
        launcher: MockServingLauncher,
        http: MockHttpClient,
    ) -> Router {
        let registry = RegistryService::new(Arc::new(client));
        let serving = ServingService::new(Arc::new(launcher), Arc::new(http), serving_config());

        create_router(AppState::new(Arc::new(registry), Arc::new(serving)))
    }

    fn post(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, body)
    }

    #[tokio::test]
    async fn test_health_and_live() {
        let router = app(MockRegistryClient::new());

        let (status, body) = send(router.clone(), get_request("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");

        let (status, _) = send(router, get_request("/live")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_ready_reports_registry_down() {
        let mut client = MockRegistryClient::new();
        client
            .expect_ping()
            .returning(|| {
                Err(DomainError::registry_unavailable(
                    "search_experiments failed: connection refused to 10.0.0.3:5000",
                ))
            });

        let (status, body) = send(app(client), get_request("/ready")).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["checks"][0]["name"], "registry");
        assert_eq!(body["checks"][0]["status"], "unhealthy");
        assert_eq!(body["checks"][0]["message"], "registry unreachable");
        assert!(!body.to_string().contains("10.0.0.3"));
    }

    #[tokio::test]
    async fn test_list_models() {
        let mut client = MockRegistryClient::new();
        client.expect_list_registered_models().returning(|| {
            Ok(vec![RegisteredModel {
                name: "iris-data".to_string(),
                latest_versions: vec![1, 3],
            }])
        });

        let (status, body) = send(app(client), get_request("/models/")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([{"name": "iris-data", "latest_versions": [1, 3]}]));
    }

    #[tokio::test]
    async fn test_list_experiments_registry_down_is_generic_500() {
        let mut client = MockRegistryClient::new();
        client
            .expect_list_experiments()
            .returning(|| Err(DomainError::registry_unavailable("dial tcp 10.0.0.7:5000")));

        let (status, body) = send(app(client), get_request("/experiments/")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["message"], "Failed to list experiments");
        assert!(!body.to_string().contains("10.0.0.7"));
    }

    #[tokio::test]
    async fn test_list_experiments() {
        let mut client = MockRegistryClient::new();
        client
            .expect_list_experiments()
            .returning(|| Ok(vec![Experiment::new("0", "Default")]));

        let (status, body) = send(app(client), get_request("/experiments/")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([{"experiment_id": "0", "name": "Default"}]));
    }

    #[tokio::test]
    async fn test_model_versions() {
        let mut client = MockRegistryClient::new();
        client
            .expect_get_latest_versions()
            .returning(|_| Ok(vec![ModelVersion::new(2, "r2", ModelVersionStatus::Pending)]));

        let (status, body) = send(
            app(client),
            post("/model-versions/", json!({"model_name": "iris-data"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([{"version": 2, "run_id": "r2", "status": "PENDING"}]));
    }

    #[tokio::test]
    async fn test_runs() {
        let mut client = MockRegistryClient::new();
        client.expect_list_runs().returning(|_, _| {
            Ok(vec![Run::new("abc", "1")
                .with_metric("accuracy", 0.5)
                .with_param("max_depth", "3")])
        });

        let (status, body) = send(app(client), post("/runs/", json!({"experiment_id": "1"}))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["run_id"], "abc");
        assert_eq!(body[0]["metrics"]["accuracy"], 0.5);
        assert_eq!(body[0]["params"]["max_depth"], "3");
    }

    #[tokio::test]
    async fn test_runs_empty_experiment_id_is_422() {
        let mut client = MockRegistryClient::new();
        client.expect_list_runs().never();

        let (status, body) = send(app(client), post("/runs/", json!({"experiment_id": ""}))).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["type"], "invalid_request_error");
        assert_eq!(body["error"]["param"], "experiment_id");
    }

    #[tokio::test]
    async fn test_runs_missing_body_field_is_422() {
        let (status, _) = send(app(MockRegistryClient::new()), post("/runs/", json!({}))).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_artifacts_unknown_run_is_404() {
        let mut client = MockRegistryClient::new();
        client
            .expect_list_artifacts()
            .returning(|run_id, _| Err(DomainError::not_found(format!("Run '{}' not found", run_id))));

        let (status, body) = send(app(client), post("/artifacts/", json!({"run_id": "nope"}))).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["type"], "not_found_error");
        assert_eq!(body["error"]["message"], "Run 'nope' not found");
    }

    #[tokio::test]
    async fn test_artifacts_with_path() {
        let mut client = MockRegistryClient::new();
        client
            .expect_list_artifacts()
            .withf(|run_id, path| run_id == "abc" && path == "model")
            .returning(|_, _| {
                Ok(vec![Artifact {
                    path: "model/MLmodel".to_string(),
                    is_dir: false,
                    file_size: Some(512),
                }])
            });

        let (status, body) = send(
            app(client),
            post("/artifacts/", json!({"run_id": "abc", "path": "model"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([{"path": "model/MLmodel", "is_dir": false, "file_size": 512}]));
    }

    #[tokio::test]
    async fn test_extract_model_names() {
        let mut client = MockRegistryClient::new();
        client.expect_list_runs().returning(|_, _| {
            Ok(vec![
                Run::new("r1", "1").with_tag(LOG_MODEL_HISTORY_TAG, r#"[{"artifact_path": "iris_model"}]"#),
                Run::new("r2", "1").with_tag(LOG_MODEL_HISTORY_TAG, r#"[{"artifact_path": "iris_model"}]"#),
            ])
        });

        let (status, body) = send(
            app(client),
            post("/extract-model-names/", json!({"experiment_id": "1"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"model_names": ["iris_model"]}));
    }

    #[tokio::test]
    async fn test_run_id_picks_greatest_version() {
        let mut client = MockRegistryClient::new();
        client.expect_get_latest_versions().returning(|_| {
            Ok(vec![
                ModelVersion::new(1, "r1", ModelVersionStatus::Ready),
                ModelVersion::new(3, "r3", ModelVersionStatus::Ready),
                ModelVersion::new(2, "r2", ModelVersionStatus::Ready),
            ])
        });

        let (status, body) = send(app(client), post("/run-id/", json!({"model_name": "iris-data"}))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"run_id": "r3"}));
    }

    #[tokio::test]
    async fn test_run_id_without_versions_is_404() {
        let mut client = MockRegistryClient::new();
        client.expect_get_latest_versions().returning(|_| Ok(vec![]));

        let (status, body) = send(app(client), post("/run-id/", json!({"model_name": "empty"}))).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["type"], "not_found_error");
    }

    #[tokio::test]
    async fn test_update_alias_message() {
        let mut client = MockRegistryClient::new();
        client
            .expect_set_alias()
            .withf(|name, alias, version| name == "iris-data" && alias == "production" && *version == 3)
            .times(2)
            .returning(|_, _, _| Ok(()));

        let router = app(client);

        let (status, body) = send(
            router.clone(),
            post(
                "/update-alias",
                json!({"model_name": "iris-data", "alias": "production", "version": "3"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"message": "Alias 'production' set to version '3' for model 'iris-data'."})
        );

        let (status, _) = send(
            router,
            post(
                "/update-alias",
                json!({"model_name": "iris-data", "alias": "production", "version": 3}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_update_alias_unknown_version_then_router_still_serves() {
        let mut client = MockRegistryClient::new();
        client
            .expect_set_alias()
            .withf(|_, _, version| *version == 42)
            .times(1)
            .returning(|_, _, _| Err(DomainError::not_found("Model version 42 not found")));
        client
            .expect_set_alias()
            .withf(|_, _, version| *version == 3)
            .times(1)
            .returning(|_, _, _| Ok(()));

        let router = app(client);

        let (status, body) = send(
            router.clone(),
            post(
                "/update-alias",
                json!({"model_name": "iris-data", "alias": "production", "version": "42"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("Model version 42 not found"));

        let (status, body) = send(
            router,
            post(
                "/update-alias",
                json!({"model_name": "iris-data", "alias": "production", "version": "3"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["message"],
            "Alias 'production' set to version '3' for model 'iris-data'."
        );
    }

    #[tokio::test]
    async fn test_update_alias_bad_version_is_400() {
        let mut client = MockRegistryClient::new();
        client.expect_set_alias().never();

        let (status, body) = send(
            app(client),
            post(
                "/update-alias",
                json!({"model_name": "iris-data", "alias": "production", "version": "abc"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "invalid_argument");
    }

    #[tokio::test]
    async fn test_serve_model() {
        let mut launcher = MockServingLauncher::new();
        launcher.expect_launch().returning(|spec| {
            Ok(ServingHandle {
                pid: Some(31337),
                model_uri: spec.model_uri.to_string(),
                port: spec.port,
                started_at: Utc::now(),
            })
        });

        let (status, body) = send(
            app_with(MockRegistryClient::new(), launcher, MockHttpClient::new()),
            post("/serve-model", json!({})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["model_uri"], "models:/iris-data@production");
        assert_eq!(body["port"], 5000);
        assert_eq!(body["pid"], 31337);
    }

    #[tokio::test]
    async fn test_serve_model_launch_failure_then_router_still_serves() {
        let mut launcher = MockServingLauncher::new();
        launcher.expect_launch().returning(|_| {
            Err(DomainError::launch_failed(
                "Failed to start 'mlflow': No such file or directory (os error 2)",
            ))
        });

        let router = app_with(MockRegistryClient::new(), launcher, MockHttpClient::new());

        let (status, body) = send(router.clone(), post("/serve-model", json!({}))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("No such file or directory"));

        let (status, _) = send(router, get_request("/health")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_worker_health_unreachable_is_503() {
        let (status, body) = send(
            app(MockRegistryClient::new()),
            get_request("/serve-model/health"),
        )
        .await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "unhealthy");
        assert_eq!(body["url"], "http://127.0.0.1:5000/health");
    }

    #[tokio::test]
    async fn test_predict() {
        let http = MockHttpClient::new()
            .with_response("http://127.0.0.1:5000/invocations", json!({"predictions": [1]}));

        let (status, body) = send(
            app_with(MockRegistryClient::new(), MockServingLauncher::new(), http),
            post("/predict", json!({"columns": ["a", "b"], "data": [[1.0, 2.0]]})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"predictions": {"predictions": [1]}}));
    }

    #[tokio::test]
    async fn test_predict_worker_down_is_generic_500() {
        let (status, body) = send(
            app(MockRegistryClient::new()),
            post("/predict", json!({"columns": ["a"], "data": [[1]]})),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["message"], "Failed to get predictions");
    }

    #[tokio::test]
    async fn test_response_carries_request_id() {
        let request = Request::builder()
            .uri("/live")
            .header("x-request-id", "trace-me")
            .body(Body::empty())
            .unwrap();

        let response = app(MockRegistryClient::new()).oneshot(request).await.unwrap();

        assert_eq!(response.headers()["x-request-id"], "trace-me");
    }
}
