//! Request, response and error types of the HTTP API

pub mod error;
pub mod json;
pub mod registry;
pub mod serving;

pub use error::{ApiError, ApiErrorResponse};
pub use json::{Json, ValidatedJson};
pub use registry::{
    ArtifactResponse, ArtifactsRequest, ExperimentRequest, ExperimentResponse, MessageResponse,
    ModelNameRequest, ModelNamesResponse, ModelVersionResponse, RegisteredModelResponse,
    RunIdResponse, RunResponse, UpdateAliasRequest,
};
pub use serving::{PredictRequest, ServeModelResponse};
