//! Feature encoding for the prediction pipeline
//!
//! Translates the localized pt-BR form values into the vocabulary the
//! classifier was fit on and checks numeric fields against the form's
//! bounds. Translation is table-driven and exhaustive over the form's
//! option sets; anything outside them is rejected as unmapped.

use crate::error::PredictionError;
use crate::models::{FeatureRecord, FeatureValue, PredictionRequest};

/// Localized gender options mapped to dataset tokens
pub const GENDER_MAP: &[(&str, &str)] = &[("Feminino", "Female"), ("Masculino", "Male")];

/// Localized yes/no options mapped to dataset tokens
pub const YES_NO_MAP: &[(&str, &str)] = &[("Sim", "yes"), ("Não", "no")];

/// Localized consumption-frequency options mapped to dataset tokens.
///
/// "Nunca" maps to the literal "no", not a "Never" token. The training data
/// uses "no" for the never case and the model only recognizes that spelling.
pub const FREQUENCY_MAP: &[(&str, &str)] = &[
    ("Nunca", "no"),
    ("Às vezes", "Sometimes"),
    ("Frequentemente", "Frequently"),
    ("Sempre", "Always"),
];

/// Localized transport options mapped to dataset tokens
pub const TRANSPORT_MAP: &[(&str, &str)] = &[
    ("Carro", "Automobile"),
    ("Moto", "Motorbike"),
    ("Bicicleta", "Bike"),
    ("Transporte público", "Public_Transportation"),
    ("A pé", "Walking"),
];

/// Age bounds in years, inclusive
pub const AGE_RANGE: (f32, f32) = (14.0, 61.0);

/// Height bounds in meters, inclusive
pub const HEIGHT_RANGE: (f32, f32) = (1.40, 2.00);

/// Weight bounds in kilograms, inclusive
pub const WEIGHT_RANGE: (f32, f32) = (30.0, 200.0);

/// Encodes raw form requests into feature records in the model vocabulary.
///
/// Pure and deterministic: the same request always yields the same record,
/// with features in the same order.
#[derive(Debug, Default)]
pub struct Encoder;

impl Encoder {
    pub fn new() -> Self {
        Self
    }

    /// Encode a request, rejecting any value outside its supported domain
    pub fn encode(&self, request: &PredictionRequest) -> Result<FeatureRecord, PredictionError> {
        let mut record = FeatureRecord::new();

        record.push("Gender", text(lookup(GENDER_MAP, "gender", &request.gender)?));
        record.push("Age", number(in_range("age", request.age as f32, AGE_RANGE)?));
        record.push(
            "Height",
            number(in_range("height_m", request.height_m, HEIGHT_RANGE)?),
        );
        record.push(
            "Weight",
            number(in_range("weight_kg", request.weight_kg, WEIGHT_RANGE)?),
        );
        record.push(
            "family_history",
            text(lookup(YES_NO_MAP, "family_history", &request.family_history)?),
        );
        record.push(
            "FAVC",
            text(lookup(YES_NO_MAP, "high_calorie_food", &request.high_calorie_food)?),
        );
        record.push(
            "FCVC",
            number(scale("vegetable_consumption", request.vegetable_consumption, 1, 3)?),
        );
        record.push("NCP", number(scale("main_meals", request.main_meals, 1, 4)?));
        record.push("CAEC", text(lookup(FREQUENCY_MAP, "snacking", &request.snacking)?));
        record.push("SMOKE", text(lookup(YES_NO_MAP, "smokes", &request.smokes)?));
        record.push("CH2O", number(scale("water_intake", request.water_intake, 1, 3)?));
        record.push(
            "SCC",
            text(lookup(YES_NO_MAP, "calorie_monitoring", &request.calorie_monitoring)?),
        );
        record.push(
            "FAF",
            number(scale("physical_activity", request.physical_activity, 0, 3)?),
        );
        record.push("TUE", number(scale("screen_time", request.screen_time, 0, 2)?));
        record.push("CALC", text(lookup(FREQUENCY_MAP, "alcohol", &request.alcohol)?));
        record.push(
            "MTRANS",
            text(lookup(TRANSPORT_MAP, "transport", &request.transport)?),
        );

        Ok(record)
    }
}

fn text(value: &str) -> FeatureValue {
    FeatureValue::Text(value.to_string())
}

fn number(value: f32) -> FeatureValue {
    FeatureValue::Number(value)
}

fn lookup(
    table: &'static [(&'static str, &'static str)],
    field: &'static str,
    value: &str,
) -> Result<&'static str, PredictionError> {
    table
        .iter()
        .find(|(localized, _)| *localized == value)
        .map(|(_, encoded)| *encoded)
        .ok_or_else(|| PredictionError::UnmappedValue {
            field,
            value: value.to_string(),
        })
}

fn in_range(field: &'static str, value: f32, (min, max): (f32, f32)) -> Result<f32, PredictionError> {
    if value < min || value > max {
        return Err(PredictionError::UnmappedValue {
            field,
            value: value.to_string(),
        });
    }
    Ok(value)
}

fn scale(field: &'static str, value: u8, min: u8, max: u8) -> Result<f32, PredictionError> {
    if value < min || value > max {
        return Err(PredictionError::UnmappedValue {
            field,
            value: value.to_string(),
        });
    }
    Ok(f32::from(value))
}
