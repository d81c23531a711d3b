//! Artifact input schema and dense feature lowering
//!
//! A trained artifact ships with a `schema.json` declaring the exact input
//! layout the graph was fit on: feature order, the category order of every
//! one-hot block, and the class order of the output scores. The schema is
//! the single contract between the offline trainer and this service, so
//! lowering reproduces the declared layout exactly instead of assuming the
//! encoder's column order.

use crate::error::PredictionError;
use crate::models::{FeatureRecord, FeatureValue};
use serde::{Deserialize, Serialize};

/// Declared encoding of a single input feature
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeatureSpec {
    /// Passed through as a single f32 column
    Numeric { name: String },
    /// One-hot expanded into one indicator column per category, in declared order
    Categorical { name: String, categories: Vec<String> },
}

impl FeatureSpec {
    pub fn name(&self) -> &str {
        match self {
            FeatureSpec::Numeric { name } => name,
            FeatureSpec::Categorical { name, .. } => name,
        }
    }

    /// Number of dense columns this feature occupies
    pub fn width(&self) -> usize {
        match self {
            FeatureSpec::Numeric { .. } => 1,
            FeatureSpec::Categorical { categories, .. } => categories.len(),
        }
    }
}

/// Input and output schema of a trained artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactSchema {
    /// Artifact version string, assigned by the trainer
    pub version: String,
    /// Input features in the exact order the graph consumes them
    pub features: Vec<FeatureSpec>,
    /// Output classes in the exact order of the score row
    pub classes: Vec<String>,
    /// SHA-256 of the model graph bytes, verified at load when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_sha256: Option<String>,
}

impl ArtifactSchema {
    /// Check structural invariants that lowering and argmax rely on
    pub fn validate(&self) -> Result<(), PredictionError> {
        if self.features.is_empty() {
            return Err(PredictionError::ArtifactLoad(
                "schema declares no input features".to_string(),
            ));
        }
        if self.classes.is_empty() {
            return Err(PredictionError::ArtifactLoad(
                "schema declares no output classes".to_string(),
            ));
        }
        for feature in &self.features {
            if let FeatureSpec::Categorical { name, categories } = feature {
                if categories.is_empty() {
                    return Err(PredictionError::ArtifactLoad(format!(
                        "categorical feature '{}' declares no categories",
                        name
                    )));
                }
            }
        }
        let mut seen = std::collections::HashSet::new();
        for feature in &self.features {
            if !seen.insert(feature.name()) {
                return Err(PredictionError::ArtifactLoad(format!(
                    "schema declares feature '{}' more than once",
                    feature.name()
                )));
            }
        }
        Ok(())
    }

    /// Feature names in schema order
    pub fn feature_names(&self) -> Vec<String> {
        self.features.iter().map(|f| f.name().to_string()).collect()
    }

    /// Total width of the dense input row
    pub fn dense_width(&self) -> usize {
        self.features.iter().map(FeatureSpec::width).sum()
    }

    /// Lower an encoded record into one dense f32 row in schema order.
    ///
    /// Categorical values produce a one-hot block; a value matching none of
    /// the declared categories produces an all-zero block, matching how the
    /// training pipeline treats categories it never saw. Missing features
    /// are a schema mismatch and type confusion is an inference failure.
    pub fn lower(&self, record: &FeatureRecord) -> Result<Vec<f32>, PredictionError> {
        let mut row = Vec::with_capacity(self.dense_width());

        for feature in &self.features {
            let value = record
                .get(feature.name())
                .ok_or_else(|| PredictionError::SchemaMismatch {
                    feature: feature.name().to_string(),
                })?;

            match (feature, value) {
                (FeatureSpec::Numeric { .. }, FeatureValue::Number(number)) => {
                    row.push(*number);
                }
                (FeatureSpec::Categorical { categories, .. }, FeatureValue::Text(token)) => {
                    for category in categories {
                        row.push(if category == token { 1.0 } else { 0.0 });
                    }
                }
                (FeatureSpec::Numeric { name }, FeatureValue::Text(_)) => {
                    return Err(PredictionError::Inference(format!(
                        "feature '{}' carries a text value but the schema declares it numeric",
                        name
                    )));
                }
                (FeatureSpec::Categorical { name, .. }, FeatureValue::Number(_)) => {
                    return Err(PredictionError::Inference(format!(
                        "feature '{}' carries a numeric value but the schema declares it categorical",
                        name
                    )));
                }
            }
        }

        Ok(row)
    }
}


#[cfg(test)]
mod tests {
    use super::testutil::obesity_schema;
    use super::*;
    use crate::models::PredictionRequest;
    use crate::predictor::Encoder;

    fn sample_request() -> PredictionRequest {
        PredictionRequest {
            gender: "Feminino".to_string(),
            age: 30,
            height_m: 1.70,
            weight_kg: 70.0,
            family_history: "Não".to_string(),
            high_calorie_food: "Sim".to_string(),
            vegetable_consumption: 2,
            main_meals: 3,
            snacking: "Às vezes".to_string(),
            smokes: "Não".to_string(),
            water_intake: 2,
            calorie_monitoring: "Não".to_string(),
            physical_activity: 1,
            screen_time: 1,
            alcohol: "Nunca".to_string(),
            transport: "A pé".to_string(),
        }
    }

    #[test]
    fn test_dense_width_counts_one_hot_columns() {
        let schema = obesity_schema();
        // 8 one-hot blocks (2+2+2+4+2+2+4+5) plus 8 numeric columns
        assert_eq!(schema.dense_width(), 31);
        assert_eq!(schema.features.len(), 16);
        assert_eq!(schema.classes.len(), 7);
    }

    #[test]
    fn test_lowering_follows_schema_order_not_record_order() {
        let schema = obesity_schema();
        let record = Encoder::new().encode(&sample_request()).unwrap();
        let row = schema.lower(&record).unwrap();

        assert_eq!(row.len(), 31);
        // Gender block: Female selected
        assert_eq!(&row[0..2], &[1.0, 0.0]);
        // family_history block: no
        assert_eq!(&row[2..4], &[1.0, 0.0]);
        // FAVC block: yes
        assert_eq!(&row[4..6], &[0.0, 1.0]);
        // CAEC block: Sometimes is the third declared category
        assert_eq!(&row[6..10], &[0.0, 0.0, 1.0, 0.0]);
        // CALC block: no is the fourth declared category
        assert_eq!(&row[14..18], &[0.0, 0.0, 0.0, 1.0]);
        // MTRANS block: Walking is last of five
        assert_eq!(&row[18..23], &[0.0, 0.0, 0.0, 0.0, 1.0]);
        // Numerics trail in schema order: Age, Height, Weight, ...
        assert_eq!(row[23], 30.0);
        assert_eq!(row[24], 1.70);
        assert_eq!(row[25], 70.0);
        assert_eq!(row[30], 1.0);
    }

    #[test]
    fn test_exactly_one_indicator_per_known_category_block() {
        let schema = obesity_schema();
        let record = Encoder::new().encode(&sample_request()).unwrap();
        let row = schema.lower(&record).unwrap();

        let mut offset = 0;
        for feature in &schema.features {
            if let FeatureSpec::Categorical { name, categories } = feature {
                let block = &row[offset..offset + categories.len()];
                let ones = block.iter().filter(|v| **v == 1.0).count();
                assert_eq!(ones, 1, "block for {} should have one indicator", name);
            }
            offset += feature.width();
        }
    }

    fn with_value(record: &FeatureRecord, name: &str, value: FeatureValue) -> FeatureRecord {
        let mut replaced = FeatureRecord::new();
        for entry in record.names().map(str::to_string).collect::<Vec<_>>() {
            if entry == name {
                replaced.push(entry, value.clone());
            } else {
                replaced.push(entry.clone(), record.get(&entry).unwrap().clone());
            }
        }
        replaced
    }

    #[test]
    fn test_unknown_category_lowers_to_zero_block() {
        let schema = obesity_schema();
        let record = Encoder::new().encode(&sample_request()).unwrap();
        // Simulate a record from a vocabulary the artifact was never fit on
        let narrowed = with_value(&record, "MTRANS", FeatureValue::Text("Scooter".to_string()));

        let row = schema.lower(&narrowed).unwrap();
        assert_eq!(&row[18..23], &[0.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_missing_feature_is_schema_mismatch() {
        let schema = obesity_schema();
        let mut record = FeatureRecord::new();
        record.push("Gender", FeatureValue::Text("Female".to_string()));

        match schema.lower(&record) {
            Err(PredictionError::SchemaMismatch { feature }) => {
                assert_eq!(feature, "family_history");
            }
            other => panic!("expected SchemaMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_type_confusion_is_an_inference_error() {
        let schema = obesity_schema();
        let record = Encoder::new().encode(&sample_request()).unwrap();
        let swapped = with_value(&record, "Age", FeatureValue::Text("thirty".to_string()));

        assert!(matches!(
            schema.lower(&swapped),
            Err(PredictionError::Inference(_))
        ));
    }

    #[test]
    fn test_schema_parses_from_trainer_json() {
        let json = r#"{
            "version": "2024.2",
            "features": [
                {"kind": "categorical", "name": "Gender", "categories": ["Female", "Male"]},
                {"kind": "numeric", "name": "Age"}
            ],
            "classes": ["Normal_Weight", "Obesity_Type_I"],
            "model_sha256": "abc123"
        }"#;

        let schema: ArtifactSchema = serde_json::from_str(json).unwrap();
        assert_eq!(schema.version, "2024.2");
        assert_eq!(schema.dense_width(), 3);
        assert_eq!(schema.feature_names(), vec!["Gender", "Age"]);
        assert_eq!(schema.model_sha256.as_deref(), Some("abc123"));
        assert!(schema.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_degenerate_schemas() {
        let mut schema = obesity_schema();
        schema.classes.clear();
        assert!(schema.validate().is_err());

        let mut schema = obesity_schema();
        schema.features.clear();
        assert!(schema.validate().is_err());

        let mut schema = obesity_schema();
        schema.features.push(FeatureSpec::Numeric {
            name: "Age".to_string(),
        });
        assert!(schema.validate().is_err());

        let mut schema = obesity_schema();
        schema.features.push(FeatureSpec::Categorical {
            name: "Empty".to_string(),
            categories: vec![],
        });
        assert!(schema.validate().is_err());
    }
}
