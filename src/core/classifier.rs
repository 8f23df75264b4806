//! Classification Module
//!
//! Turns a probability into a labelled, human-readable result.
//!
//! Confidence rounding is half away from zero (`f64::round`), so a
//! probability whose percentage lands on `x.5` rounds up: 0.125 -> 13.

use crate::models::config::ScoringModel;
use crate::models::types::{Label, PredictionResult};

impl Label {
    /// Closed threshold: a probability equal to `threshold` is malignant
    pub fn from_probability(probability: f64, threshold: f64) -> Self {
        if probability >= threshold {
            Self::Malignant
        } else {
            Self::Benign
        }
    }
}

/// `round(probability * 100)` as an integer percentage
#[inline]
pub fn confidence_percent(probability: f64) -> u8 {
    // f64 -> u8 casts saturate, so values outside [0, 1] cannot wrap
    (probability * 100.0).round() as u8
}

/// Label a probability against the reference model's threshold (0.5)
pub fn classify(probability: f64) -> PredictionResult {
    classify_with(&ScoringModel::REFERENCE, probability)
}

/// Label a probability against `model.threshold` and attach the explanation
pub fn classify_with(model: &ScoringModel, probability: f64) -> PredictionResult {
    let label = Label::from_probability(probability, model.threshold);

    PredictionResult {
        label,
        probability,
        confidence_percent: confidence_percent(probability),
        explanation: label.explanation(),
    }
}
