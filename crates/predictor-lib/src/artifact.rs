//! Model artifact bundle loading
//!
//! A trained artifact ships as a directory holding the serialized graph
//! (`model.onnx`) and its declared schema (`schema.json`). The offline
//! trainer writes the bundle; this service only ever reads it. [`ModelStore`]
//! reads the bundle once per process and hands out the cached classifier to
//! every caller afterwards.

use crate::error::PredictionError;
use crate::predictor::{ArtifactSchema, Classifier, OnnxClassifier};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

/// Graph file name inside an artifact bundle
pub const MODEL_FILE: &str = "model.onnx";

/// Schema file name inside an artifact bundle
pub const SCHEMA_FILE: &str = "schema.json";

/// Load an artifact bundle from a directory.
///
/// Read order is schema first, then graph bytes, then checksum verification
/// when the schema pins one, so corruption is reported before tract ever
/// sees the bytes.
pub fn load_bundle(dir: &Path) -> Result<OnnxClassifier, PredictionError> {
    let schema_path = dir.join(SCHEMA_FILE);
    let schema_bytes = fs::read(&schema_path).map_err(|e| {
        PredictionError::ArtifactLoad(format!("failed to read {}: {}", schema_path.display(), e))
    })?;
    let schema: ArtifactSchema = serde_json::from_slice(&schema_bytes).map_err(|e| {
        PredictionError::ArtifactLoad(format!("failed to parse {}: {}", schema_path.display(), e))
    })?;

    let model_path = dir.join(MODEL_FILE);
    let model_bytes = fs::read(&model_path).map_err(|e| {
        PredictionError::ArtifactLoad(format!("failed to read {}: {}", model_path.display(), e))
    })?;

    if let Some(expected) = &schema.model_sha256 {
        let computed = compute_checksum(&model_bytes);
        if !computed.eq_ignore_ascii_case(expected) {
            return Err(PredictionError::ArtifactLoad(format!(
                "checksum mismatch for {}: expected {}, got {}",
                model_path.display(),
                expected,
                computed
            )));
        }
    }

    let classifier = OnnxClassifier::from_bytes(&model_bytes, schema)?;

    info!(
        version = %classifier.version(),
        features = classifier.required_features().len(),
        classes = classifier.classes().len(),
        size_bytes = model_bytes.len(),
        "Model artifact loaded"
    );

    Ok(classifier)
}

/// Compute SHA256 checksum of data
fn compute_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

type BundleLoader = fn(&Path) -> Result<Arc<dyn Classifier>, PredictionError>;

/// Process-wide artifact store with load-once semantics.
///
/// Concurrent first calls race to a single disk read; everyone else waits
/// for that load and shares the resulting classifier. A failed load leaves
/// the cell empty, so startup retries hit the disk again.
pub struct ModelStore {
    dir: PathBuf,
    loader: BundleLoader,
    cell: OnceCell<Arc<dyn Classifier>>,
}

impl ModelStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            loader: |dir| {
                load_bundle(dir).map(|classifier| Arc::new(classifier) as Arc<dyn Classifier>)
            },
            cell: OnceCell::new(),
        }
    }

    #[cfg(test)]
    fn with_loader(dir: impl Into<PathBuf>, loader: BundleLoader) -> Self {
        Self {
            dir: dir.into(),
            loader,
            cell: OnceCell::new(),
        }
    }

    /// Return the cached classifier, loading the bundle on first call
    pub async fn get_or_load(&self) -> Result<Arc<dyn Classifier>, PredictionError> {
        self.cell
            .get_or_try_init(|| async { (self.loader)(&self.dir) })
            .await
            .map(Arc::clone)
    }

    /// Whether the artifact has been loaded already
    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
