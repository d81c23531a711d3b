//! Prediction result translation
//!
//! Maps the model's raw class labels to the localized display strings the
//! product shows users.

/// Raw class label to localized display label, one entry per weight-status
/// category the current artifact can emit
pub const CATEGORY_LABELS: &[(&str, &str)] = &[
    ("Insufficient_Weight", "Abaixo do peso"),
    ("Normal_Weight", "Peso normal"),
    ("Overweight_Level_I", "Sobrepeso – Nível I"),
    ("Overweight_Level_II", "Sobrepeso – Nível II"),
    ("Obesity_Type_I", "Obesidade – Grau I"),
    ("Obesity_Type_II", "Obesidade – Grau II"),
    ("Obesity_Type_III", "Obesidade – Grau III"),
];

/// Translates raw class labels into localized display labels.
///
/// Total over all inputs: a label outside the table comes back unchanged,
/// so a newer artifact emitting an unexpected class still yields something
/// displayable instead of an error.
#[derive(Debug, Default)]
pub struct ResultTranslator;

impl ResultTranslator {
    pub fn new() -> Self {
        Self
    }

    pub fn translate(&self, label: &str) -> String {
        CATEGORY_LABELS
            .iter()
            .find(|(raw, _)| *raw == label)
            .map(|(_, display)| (*display).to_string())
            .unwrap_or_else(|| label.to_string())
    }
}
