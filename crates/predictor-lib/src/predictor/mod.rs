//! Weight-status prediction pipeline
//!
//! The request path is Encoder -> Classifier -> ResultTranslator: localized
//! form values are encoded into the model vocabulary, the classifier picks
//! a raw class label, and the translator maps it to the display label.

mod encoder;
mod inference;
mod schema;
mod translator;

pub use encoder::{
    Encoder, AGE_RANGE, FREQUENCY_MAP, GENDER_MAP, HEIGHT_RANGE, TRANSPORT_MAP, WEIGHT_RANGE,
    YES_NO_MAP,
};
pub use inference::OnnxClassifier;
pub use schema::{ArtifactSchema, FeatureSpec};
pub use translator::{ResultTranslator, CATEGORY_LABELS};

use crate::error::PredictionError;
use crate::models::{FeatureRecord, Prediction, PredictionRequest};
use std::sync::Arc;

/// Trait for classifier implementations
pub trait Classifier: Send + Sync {
    /// Predict the raw class label for an encoded feature record
    fn predict(&self, record: &FeatureRecord) -> Result<String, PredictionError>;

    /// Feature names the artifact requires, in its declared order
    fn required_features(&self) -> &[String];

    /// Class labels the artifact can emit, in score order
    fn classes(&self) -> &[String];

    /// Version string of the loaded artifact
    fn version(&self) -> &str;
}

/// The full request pipeline over a loaded classifier.
///
/// Stateless between requests: each call encodes, classifies and translates
/// with no retries and no caching, so concurrent requests never interact.
pub struct PredictionPipeline {
    encoder: Encoder,
    classifier: Arc<dyn Classifier>,
    translator: ResultTranslator,
}

impl PredictionPipeline {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self {
            encoder: Encoder::new(),
            classifier,
            translator: ResultTranslator::new(),
        }
    }

    /// Serve one prediction request end to end
    pub fn predict(&self, request: &PredictionRequest) -> Result<Prediction, PredictionError> {
        let record = self.encoder.encode(request)?;
        let label = self.classifier.predict(&record)?;
        let category = self.translator.translate(&label);

        Ok(Prediction {
            category,
            predicted_label: label,
            model_version: self.classifier.version().to_string(),
            generated_at: chrono::Utc::now().timestamp(),
        })
    }

    pub fn model_version(&self) -> &str {
        self.classifier.version()
    }

    pub fn required_features(&self) -> &[String] {
        self.classifier.required_features()
    }

    pub fn classes(&self) -> &[String] {
        self.classifier.classes()
    }
}
