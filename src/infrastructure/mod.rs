//! Infrastructure layer - External service implementations

pub mod http_client;
pub mod logging;
pub mod observability;
pub mod registry;
pub mod services;
pub mod serving;
