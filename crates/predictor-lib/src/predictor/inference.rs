//! ONNX inference using tract
//!
//! Runs the trained weight-status classifier via tract-onnx. The adapter
//! validates a feature record against the artifact schema, lowers it into
//! the dense row the graph was fit on, executes the plan and maps the
//! winning score back to a class label.

use super::schema::ArtifactSchema;
use super::Classifier;
use crate::error::PredictionError;
use crate::models::FeatureRecord;
use std::time::Instant;
use tract_onnx::prelude::*;
use tracing::{debug, warn};

/// Maximum inference latency before warning (5ms target)
const MAX_INFERENCE_MS: u128 = 5;

type TractModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Classifier backed by an ONNX graph executed with tract
#[derive(Debug)]
pub struct OnnxClassifier {
    model: TractModel,
    schema: ArtifactSchema,
    feature_names: Vec<String>,
}

impl OnnxClassifier {
    /// Build a classifier from raw graph bytes and the schema it was fit with
    pub fn from_bytes(model_bytes: &[u8], schema: ArtifactSchema) -> Result<Self, PredictionError> {
        schema.validate()?;
        let model = Self::load_model(model_bytes, schema.dense_width())?;
        let feature_names = schema.feature_names();
        Ok(Self {
            model,
            schema,
            feature_names,
        })
    }

    /// Load and optimize an ONNX model from bytes
    fn load_model(model_bytes: &[u8], input_width: usize) -> Result<TractModel, PredictionError> {
        let model = tract_onnx::onnx()
            .model_for_read(&mut std::io::Cursor::new(model_bytes))
            .map_err(|e| PredictionError::ArtifactLoad(format!("failed to parse ONNX model: {}", e)))?
            .with_input_fact(0, f32::fact([1, input_width]).into())
            .map_err(|e| PredictionError::ArtifactLoad(format!("failed to set input shape: {}", e)))?
            .into_optimized()
            .map_err(|e| PredictionError::ArtifactLoad(format!("failed to optimize model: {}", e)))?
            .into_runnable()
            .map_err(|e| {
                PredictionError::ArtifactLoad(format!("failed to create runnable model: {}", e))
            })?;
        Ok(model)
    }

    pub fn schema(&self) -> &ArtifactSchema {
        &self.schema
    }

    pub fn classes(&self) -> &[String] {
        &self.schema.classes
    }

    /// Convert a lowered row to the model's input tensor
    fn row_to_tensor(&self, row: Vec<f32>) -> Result<Tensor, PredictionError> {
        let width = row.len();
        let array = tract_ndarray::Array2::from_shape_vec((1, width), row)
            .map_err(|e| PredictionError::Inference(format!("failed to shape input tensor: {}", e)))?;
        Ok(array.into())
    }
}

/// Pick the class with the highest score
fn argmax_class(classes: &[String], scores: &[f32]) -> Result<String, PredictionError> {
    if scores.len() != classes.len() {
        return Err(PredictionError::Inference(format!(
            "model emitted {} scores, schema declares {} classes",
            scores.len(),
            classes.len()
        )));
    }

    let mut best = 0;
    let mut best_score = f32::NEG_INFINITY;
    for (index, score) in scores.iter().enumerate() {
        if *score > best_score {
            best = index;
            best_score = *score;
        }
    }

    Ok(classes[best].clone())
}

impl Classifier for OnnxClassifier {
    fn predict(&self, record: &FeatureRecord) -> Result<String, PredictionError> {
        let start = Instant::now();

        let row = self.schema.lower(record)?;
        let input = self.row_to_tensor(row)?;

        let result = self
            .model
            .run(tvec!(input.into()))
            .map_err(|e| PredictionError::Inference(format!("model execution failed: {}", e)))?;
        let output = result
            .first()
            .ok_or_else(|| PredictionError::Inference("no output from model".to_string()))?;
        let output_view = output
            .to_array_view::<f32>()
            .map_err(|e| PredictionError::Inference(format!("unexpected output tensor: {}", e)))?;
        let scores: Vec<f32> = output_view.iter().copied().collect();

        let label = argmax_class(&self.schema.classes, &scores)?;

        let elapsed = start.elapsed();
        if elapsed.as_millis() > MAX_INFERENCE_MS {
            warn!(
                elapsed_ms = elapsed.as_millis(),
                "Inference exceeded {}ms target", MAX_INFERENCE_MS
            );
        } else {
            debug!(elapsed_us = elapsed.as_micros(), label = %label, "Inference completed");
        }

        Ok(label)
    }

    fn required_features(&self) -> &[String] {
        &self.feature_names
    }

    fn classes(&self) -> &[String] {
        &self.schema.classes
    }

    fn version(&self) -> &str {
        &self.schema.version
    }
}
