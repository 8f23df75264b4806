//! Prediction entry points: collector -> scorer -> classifier

use tracing::debug;

use super::classifier::classify_with;
use super::collector::InputCollector;
use super::scorer::Scorer;
use crate::models::config::ScoringModel;
use crate::models::errors::AppResult;
use crate::models::types::{Prediction, PredictionInput, PredictionResult};

/// Stateless predictor; safe to share and call concurrently
#[derive(Debug, Clone, Copy, Default)]
pub struct Predictor {
    scorer: Scorer,
}

impl Predictor {
    pub fn new() -> Self {
        Self {
            scorer: Scorer::new(),
        }
    }

    /// Predictor for a custom model; its threshold decides the label
    pub fn with_model(model: ScoringModel) -> Self {
        Self {
            scorer: Scorer::with_model(model),
        }
    }

    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    /// Score and classify an already validated input
    pub fn predict_input(&self, input: &PredictionInput) -> PredictionResult {
        let result = classify_with(self.scorer.model(), self.scorer.score(input));
        debug!("{}", result.summary());
        result
    }

    /// Prediction with the inputs echoed back
    pub fn predict_with_summary(&self, input: PredictionInput) -> Prediction {
        Prediction {
            result: self.predict_input(&input),
            input,
        }
    }

    /// Run a filled-in form; fails if any field is incomplete
    pub fn predict_form(&self, collector: &InputCollector) -> AppResult<Prediction> {
        let input = collector.to_input()?;
        Ok(self.predict_with_summary(input))
    }
}

/// Predict from four numbers, rejecting NaN and infinities
pub fn predict(
    mean_radius: f64,
    texture: f64,
    smoothness: f64,
    compactness: f64,
) -> AppResult<PredictionResult> {
    let input = PredictionInput::new(mean_radius, texture, smoothness, compactness)?;
    Ok(Predictor::new().predict_input(&input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::errors::ErrorCode;
    use crate::models::types::Label;

    #[test]
    fn test_predict_reference_scenario() {
        let result = predict(14.5, 19.3, 0.1, 0.12).unwrap();
        assert_eq!(result.label, Label::Malignant);
        assert_eq!(result.confidence_percent, 53);
        assert!((result.probability - 0.5252).abs() < 1e-3);
    }

    #[test]
    fn test_predict_anchor_is_benign() {
        let result = predict(14.0, 19.0, 0.1, 0.1).unwrap();
        assert_eq!(result.label, Label::Benign);
        assert_eq!(result.confidence_percent, 45);
    }

    #[test]
    fn test_predict_guards_non_finite() {
        let err = predict(f64::NAN, 19.0, 0.1, 0.1).unwrap_err();
        assert_eq!(err.code, ErrorCode::InputNonFinite);
    }

    #[test]
    fn test_predict_is_idempotent() {
        let a = predict(17.99, 10.38, 0.1184, 0.2776).unwrap();
        let b = predict(17.99, 10.38, 0.1184, 0.2776).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.probability.to_bits(), b.probability.to_bits());
    }

    #[test]
    fn test_model_threshold_drives_label() {
        let input = PredictionInput::new(14.5, 19.3, 0.1, 0.12).unwrap();
        assert_eq!(Predictor::new().predict_input(&input).label, Label::Malignant);

        let strict = Predictor::with_model(ScoringModel {
            threshold: 0.6,
            ..ScoringModel::REFERENCE
        });
        let result = strict.predict_input(&input);
        assert_eq!(result.label, Label::Benign);
        assert_eq!(result.confidence_percent, 53);
    }

    #[test]
    fn test_predict_form() {
        let predictor = Predictor::new();
        let form = InputCollector::from_raw("14.5", "19.3", "0.1", "0.12");
        let prediction = predictor.predict_form(&form).unwrap();
        assert_eq!(prediction.input.texture, 19.3);
        assert_eq!(prediction.result.confidence_percent, 53);

        let incomplete = InputCollector::from_raw("14.5", "", "0.1", "0.12");
        assert!(predictor.predict_form(&incomplete).is_err());
    }
}
