//! Application configuration loaded from files and `APP__*` environment variables

mod app_config;

pub use app_config::{
    AppConfig, LogFormat, LoggingConfig, MetricsConfig, RegistryConfig, ServerConfig,
    ServingConfig,
};
