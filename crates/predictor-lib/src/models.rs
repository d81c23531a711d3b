//! Core data models for the obesity level predictor

use serde::{Deserialize, Serialize};

/// Raw prediction request as captured by the form boundary.
///
/// Categorical fields carry the localized pt-BR option values exactly as the
/// form presents them ("Feminino", "Sim", "Às vezes", "A pé", ...). The
/// encoder owns the translation into the vocabulary the model was fit on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub gender: String,
    /// Years, 14-61
    pub age: u32,
    /// Meters, 1.40-2.00
    pub height_m: f32,
    /// Kilograms, 30-200
    pub weight_kg: f32,
    pub family_history: String,
    pub high_calorie_food: String,
    /// 1-3 scale
    pub vegetable_consumption: u8,
    /// 1-4 meals per day
    pub main_meals: u8,
    pub snacking: String,
    pub smokes: String,
    /// 1-3 scale
    pub water_intake: u8,
    pub calorie_monitoring: String,
    /// 0-3 days per week
    pub physical_activity: u8,
    /// 0-2 scale
    pub screen_time: u8,
    pub alcohol: String,
    pub transport: String,
}

/// A single encoded feature value in the model's vocabulary
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Text(String),
    Number(f32),
}

impl FeatureValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FeatureValue::Text(text) => Some(text),
            FeatureValue::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f32> {
        match self {
            FeatureValue::Number(number) => Some(*number),
            FeatureValue::Text(_) => None,
        }
    }
}

/// Encoded feature record keyed by the model's canonical feature names.
///
/// Order is preserved from insertion; the inference adapter reorders by the
/// artifact schema, so the order here carries no meaning beyond determinism.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureRecord {
    entries: Vec<(String, FeatureValue)>,
}

impl FeatureRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: FeatureValue) {
        self.entries.push((name.into(), value));
    }

    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.entries
            .iter()
            .find(|(entry_name, _)| entry_name == name)
            .map(|(_, value)| value)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Final prediction returned to the display boundary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// Localized display label, e.g. "Obesidade – Grau III"
    pub category: String,
    /// Raw class label emitted by the model, e.g. "Obesity_Type_III"
    pub predicted_label: String,
    pub model_version: String,
    pub generated_at: i64,
}
