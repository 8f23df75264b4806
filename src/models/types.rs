//! Core types for the prediction pipeline

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::errors::{AppError, AppResult};
use crate::utils::constants::{Field, BENIGN_EXPLANATION, MALIGNANT_EXPLANATION};

/// The four measurements for one prediction.
///
/// Values outside the reference ranges are accepted as-is; only NaN and
/// infinities are refused by [`PredictionInput::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionInput {
    pub mean_radius: f64,
    pub texture: f64,
    pub smoothness: f64,
    pub compactness: f64,
}

impl PredictionInput {
    /// Build an input, rejecting non-finite values
    pub fn new(mean_radius: f64, texture: f64, smoothness: f64, compactness: f64) -> AppResult<Self> {
        let input = Self {
            mean_radius,
            texture,
            smoothness,
            compactness,
        };
        input.validate()?;
        Ok(input)
    }

    /// Check every field is finite, reporting the first that is not
    pub fn validate(&self) -> AppResult<()> {
        for field in Field::ALL {
            let value = self.get(field);
            if !value.is_finite() {
                return Err(AppError::non_finite(field, value));
            }
        }
        Ok(())
    }

    /// Value of a single field
    pub fn get(&self, field: Field) -> f64 {
        match field {
            Field::MeanRadius => self.mean_radius,
            Field::Texture => self.texture,
            Field::Smoothness => self.smoothness,
            Field::Compactness => self.compactness,
        }
    }

    /// Values in canonical field order
    pub fn values(&self) -> [f64; 4] {
        [self.mean_radius, self.texture, self.smoothness, self.compactness]
    }
}

/// Predicted class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Benign,
    Malignant,
}

impl Label {
    /// Canned explanation for this label
    pub fn explanation(&self) -> &'static str {
        match self {
            Self::Benign => BENIGN_EXPLANATION,
            Self::Malignant => MALIGNANT_EXPLANATION,
        }
    }

    /// Lowercase wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Benign => "benign",
            Self::Malignant => "malignant",
        }
    }

    /// Heading shown to users
    pub fn display(&self) -> &'static str {
        match self {
            Self::Benign => "Benign (educational)",
            Self::Malignant => "Malignant (educational)",
        }
    }

    pub fn is_malignant(&self) -> bool {
        matches!(self, Self::Malignant)
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Benign => "✅",
            Self::Malignant => "⚠️",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classified output of one prediction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub label: Label,
    /// Logistic output in (0, 1)
    pub probability: f64,
    /// `round(probability * 100)`, half away from zero
    pub confidence_percent: u8,
    pub explanation: &'static str,
}

impl PredictionResult {
    /// One-line summary for logs and terminal output
    pub fn summary(&self) -> String {
        format!(
            "{} {} | Confidence: {}%",
            self.label.emoji(),
            self.label.display(),
            self.confidence_percent
        )
    }
}

/// Result paired with the inputs that produced it (feature summary)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub input: PredictionInput,
    pub result: PredictionResult,
}
