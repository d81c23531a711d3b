//! Core library for the obesity level predictor
//!
//! This crate provides the core functionality for:
//! - Encoding localized form input into the model vocabulary
//! - Loading and verifying the trained classifier artifact
//! - ONNX inference and result translation
//! - Health checks and observability

pub mod artifact;
pub mod error;
pub mod health;
pub mod models;
pub mod observability;
pub mod predictor;

pub use artifact::ModelStore;
pub use error::PredictionError;
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use models::*;
pub use observability::{ServiceMetrics, StructuredLogger};
pub use predictor::{Classifier, Encoder, OnnxClassifier, PredictionPipeline, ResultTranslator};
