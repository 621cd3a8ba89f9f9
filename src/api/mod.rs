//! API layer - HTTP endpoints and middleware

pub mod health;
pub mod middleware;
pub mod registry;
pub mod router;
pub mod serving;
pub mod state;
pub mod types;

pub use router::create_router;
pub use state::{AppState, RegistryServiceTrait, ServingServiceTrait};
