//! WDBC Scorer Library
//!
//! Educational tumour scoring inspired by the Wisconsin Diagnostic Breast
//! Cancer dataset. Four measurements (mean radius, texture, smoothness,
//! compactness) are normalised, combined with fixed weights and mapped
//! through a sigmoid:
//! - Input collection with a single "ready to submit" gate
//! - Fixed-weight logistic scoring
//! - Thresholded classification with canned explanations
//!
//! The weights are hand-picked literals, not a trained model, and the
//! output is not diagnostic guidance.

pub mod api;
pub mod core;
pub mod models;
pub mod utils;

pub use crate::core::{classify, classify_with, predict, score, InputCollector, FieldValue, Predictor, Scorer};
pub use models::{
    AppError, AppResult, ErrorCode, Label, Prediction, PredictionInput, PredictionResult,
    ScoringModel, ServerConfig,
};
pub use utils::constants::{Field, DISCLAIMER};
pub use utils::telemetry::{PredictionTelemetry, TelemetryStats};
