use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub serving: ServingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Tracking server connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryConfig {
    /// Base URL of the tracking server, e.g. `http://mlflow:5000`
    #[serde(default)]
    pub tracking_uri: String,
    /// Upper bound for every outbound registry call
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Serving worker settings used by `/serve-model`
#[derive(Debug, Clone, Deserialize)]
pub struct ServingConfig {
    /// Registered model to serve; required only when launching workers
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub alias: String,
    #[serde(default = "default_serving_port")]
    pub port: u16,
    #[serde(default = "default_serving_host")]
    pub host: String,
    /// Executable providing `models serve`
    #[serde(default = "default_executable")]
    pub executable: String,
    #[serde(default = "default_extra_args")]
    pub extra_args: Vec<String>,
    /// Where the worker is reachable from this process; defaults to loopback on `port`
    #[serde(default)]
    pub worker_url: Option<String>,
    #[serde(default = "default_health_timeout_secs")]
    pub health_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_serving_port() -> u16 {
    5000
}

fn default_serving_host() -> String {
    "0.0.0.0".to_string()
}

fn default_executable() -> String {
    "mlflow".to_string()
}

fn default_extra_args() -> Vec<String> {
    vec!["--no-conda".to_string()]
}

fn default_health_timeout_secs() -> u64 {
    2
}

fn default_true() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            tracking_uri: String::new(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for ServingConfig {
    fn default() -> Self {
        Self {
            model_name: None,
            alias: String::new(),
            port: default_serving_port(),
            host: default_serving_host(),
            executable: default_executable(),
            extra_args: default_extra_args(),
            worker_url: None,
            health_timeout_secs: default_health_timeout_secs(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_metrics_path(),
        }
    }
}

impl ServingConfig {
    /// Base URL of the worker as seen from this process
    pub fn worker_base_url(&self) -> String {
        match &self.worker_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("http://127.0.0.1:{}", self.port),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            );

        Self::from_builder(builder)
    }

    /// Deserialize and validate a prepared configuration builder
    pub fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, config::ConfigError> {
        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Check the keys every command needs
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        let uri = self.registry.tracking_uri.trim();

        if uri.is_empty() {
            return Err(config::ConfigError::Message(
                "registry.tracking_uri is required".to_string(),
            ));
        }

        if !uri.starts_with("http://") && !uri.starts_with("https://") {
            return Err(config::ConfigError::Message(format!(
                "registry.tracking_uri must be an http(s) URL, got '{}'",
                uri
            )));
        }

        if self.serving.alias.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "serving.alias is required".to_string(),
            ));
        }

        if self.registry.request_timeout_secs == 0 {
            return Err(config::ConfigError::Message(
                "registry.request_timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
