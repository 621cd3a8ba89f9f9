//! Infrastructure services

mod registry_service;
mod serving_service;

pub use registry_service::RegistryService;
pub use serving_service::ServingService;
