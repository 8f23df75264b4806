//! Logistic Scoring Module
//!
//! Logistic regression-inspired score over four measurements:
//! - each value is normalised against a fixed anchor `(v - offset) / scale`
//! - the normalised values are combined with fixed positive weights plus a bias
//! - the resulting logit is mapped through the sigmoid
//!
//! The weights are literals, not trained coefficients. Any finite input
//! produces a probability in (0, 1) up to IEEE-754 rounding; nothing is
//! clamped or special-cased.

use serde::Serialize;
use tracing::debug;

use crate::models::config::ScoringModel;
use crate::models::types::PredictionInput;

/// Sigmoid function: 1 / (1 + exp(-x))
#[inline]
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Intermediate values of one score, for explanation output
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    /// Normalised features in canonical order
    pub normalized: [f64; 4],
    /// Weighted contribution of each feature
    pub contributions: [f64; 4],
    pub bias: f64,
    pub logit: f64,
    pub probability: f64,
}

/// Scores inputs with a fixed [`ScoringModel`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Scorer {
    model: ScoringModel,
}

impl Scorer {
    /// Scorer using the reference literals
    pub fn new() -> Self {
        Self {
            model: ScoringModel::REFERENCE,
        }
    }

    pub fn with_model(model: ScoringModel) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &ScoringModel {
        &self.model
    }

    /// Normalised features in canonical order
    pub fn normalize(&self, input: &PredictionInput) -> [f64; 4] {
        let terms = self.model.terms();
        let values = input.values();
        [
            terms[0].anchor.normalize(values[0]),
            terms[1].anchor.normalize(values[1]),
            terms[2].anchor.normalize(values[2]),
            terms[3].anchor.normalize(values[3]),
        ]
    }

    /// Weighted sum of normalised features plus bias
    pub fn logit(&self, input: &PredictionInput) -> f64 {
        let [rn, tn, sn, cn] = self.normalize(input);
        let m = &self.model;
        // Summed left to right in field order so results stay bit-stable
        m.mean_radius.weight * rn
            + m.texture.weight * tn
            + m.smoothness.weight * sn
            + m.compactness.weight * cn
            + m.bias
    }

    /// Probability of the malignant class
    pub fn score(&self, input: &PredictionInput) -> f64 {
        let z = self.logit(input);
        let probability = sigmoid(z);
        debug!("🧮 logit {:.6} -> probability {:.6}", z, probability);
        probability
    }

    /// Full breakdown of one score
    pub fn breakdown(&self, input: &PredictionInput) -> ScoreBreakdown {
        let normalized = self.normalize(input);
        let terms = self.model.terms();
        let contributions = [
            terms[0].weight * normalized[0],
            terms[1].weight * normalized[1],
            terms[2].weight * normalized[2],
            terms[3].weight * normalized[3],
        ];
        let logit = self.logit(input);

        ScoreBreakdown {
            normalized,
            contributions,
            bias: self.model.bias,
            logit,
            probability: sigmoid(logit),
        }
    }
}

/// Score with the reference model
pub fn score(input: &PredictionInput) -> f64 {
    Scorer::new().score(input)
}

/// Logit with the reference model
pub fn logit(input: &PredictionInput) -> f64 {
    Scorer::new().logit(input)
}
