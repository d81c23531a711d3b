//! Error taxonomy for the prediction pipeline

use thiserror::Error;

/// Errors raised while loading the model artifact or serving a prediction.
///
/// Every variant except `ArtifactLoad` is request-scoped: the service
/// reports it to the caller and keeps serving. `ArtifactLoad` is fatal at
/// startup because no prediction can be produced without a usable artifact.
#[derive(Error, Debug)]
pub enum PredictionError {
    /// A request value falls outside its enumerated options or numeric bounds
    #[error("field '{field}': value '{value}' is outside the supported domain")]
    UnmappedValue { field: &'static str, value: String },

    /// The feature record is missing a feature the artifact requires
    #[error("feature record is missing required feature '{feature}'")]
    SchemaMismatch { feature: String },

    /// The underlying model computation failed
    #[error("inference failed: {0}")]
    Inference(String),

    /// The model artifact bundle could not be loaded
    #[error("failed to load model artifact: {0}")]
    ArtifactLoad(String),
}

impl PredictionError {
    /// Stable machine-readable code, used in API error bodies and logs
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnmappedValue { .. } => "unmapped_value",
            Self::SchemaMismatch { .. } => "schema_mismatch",
            Self::Inference(_) => "inference_error",
            Self::ArtifactLoad(_) => "artifact_load_error",
        }
    }

    /// Whether the error is scoped to a single request rather than the process
    pub fn is_request_scoped(&self) -> bool {
        !matches!(self, Self::ArtifactLoad(_))
    }
}
