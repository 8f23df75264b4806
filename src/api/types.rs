//! API Request/Response Types

use serde::{Deserialize, Serialize};

use crate::core::collector::InputCollector;
use crate::core::scorer::ScoreBreakdown;
use crate::models::config::ScoringModel;
use crate::models::errors::AppError;
use crate::models::types::{Prediction, PredictionInput};
use crate::utils::constants::{Field, FieldSpec, DISCLAIMER};
use crate::utils::telemetry::TelemetryStats;

/// API Response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
    pub latency_ms: f64,
    pub timestamp: i64,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T, latency_ms: f64) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            latency_ms,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

impl ApiResponse<()> {
    pub fn error(error: ApiError, latency_ms: f64) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            latency_ms,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

/// API Error
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Per-field problems for form submissions
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldIssue>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "API_BAD_REQUEST".to_string(),
            message: message.into(),
            details: None,
            fields: Vec::new(),
        }
    }

    pub fn rate_limited(retry_after: u64) -> Self {
        Self {
            code: "API_RATE_LIMITED".to_string(),
            message: format!("Rate limit exceeded. Retry after {} seconds", retry_after),
            details: Some(format!("retry_after: {}", retry_after)),
            fields: Vec::new(),
        }
    }

    pub fn not_found(path: &str) -> Self {
        Self {
            code: "API_NOT_FOUND".to_string(),
            message: format!("No route for {}", path),
            details: None,
            fields: Vec::new(),
        }
    }

    /// Error for an incomplete form, listing every blocking field
    pub fn incomplete_form(collector: &InputCollector) -> Self {
        let errors = collector.errors();
        let first = errors
            .first()
            .map(|e| (e.code_str().to_string(), e.message.clone()))
            .unwrap_or_else(|| ("INPUT_MISSING".to_string(), "Form is incomplete".to_string()));

        Self {
            code: first.0,
            message: first.1,
            details: Some("All four measurements must be numbers".to_string()),
            fields: collector
                .incomplete_fields()
                .into_iter()
                .zip(errors.iter())
                .map(|(field, err)| FieldIssue {
                    field: field.key().to_string(),
                    code: err.code_str().to_string(),
                    message: err.message.clone(),
                })
                .collect(),
        }
    }
}

impl From<&AppError> for ApiError {
    fn from(err: &AppError) -> Self {
        Self {
            code: err.code_str().to_string(),
            message: err.message.clone(),
            details: None,
            fields: Vec::new(),
        }
    }
}

/// One field that blocks a form submission
#[derive(Debug, Serialize)]
pub struct FieldIssue {
    pub field: String,
    pub code: String,
    pub message: String,
}

// ============================================
// Prediction
// ============================================

/// Numeric prediction request
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PredictRequest {
    #[serde(alias = "meanRadius")]
    pub mean_radius: f64,
    pub texture: f64,
    pub smoothness: f64,
    pub compactness: f64,
    /// Include the per-feature breakdown
    #[serde(default)]
    pub explain: bool,
}

/// Raw text request, validated by the input collector
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormPredictRequest {
    #[serde(default, alias = "meanRadius")]
    pub mean_radius: String,
    #[serde(default)]
    pub texture: String,
    #[serde(default)]
    pub smoothness: String,
    #[serde(default)]
    pub compactness: String,
}

impl FormPredictRequest {
    pub fn collector(&self) -> InputCollector {
        InputCollector::from_raw(
            &self.mean_radius,
            &self.texture,
            &self.smoothness,
            &self.compactness,
        )
    }
}

/// Echo of the submitted measurements
#[derive(Debug, Serialize)]
pub struct FeatureSummary {
    pub mean_radius: f64,
    pub texture: f64,
    pub smoothness: f64,
    pub compactness: f64,
}

impl From<PredictionInput> for FeatureSummary {
    fn from(input: PredictionInput) -> Self {
        Self {
            mean_radius: input.mean_radius,
            texture: input.texture,
            smoothness: input.smoothness,
            compactness: input.compactness,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    /// "benign" | "malignant"
    pub label: String,
    pub display_label: String,
    pub probability: f64,
    pub confidence_percent: u8,
    pub explanation: String,
    /// True when the alert icon should be shown
    pub alert: bool,
    pub features: FeatureSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<ScoreBreakdown>,
    pub disclaimer: String,
}

impl PredictionResponse {
    pub fn with_breakdown(mut self, breakdown: ScoreBreakdown) -> Self {
        self.breakdown = Some(breakdown);
        self
    }
}

impl From<Prediction> for PredictionResponse {
    fn from(prediction: Prediction) -> Self {
        let result = prediction.result;
        Self {
            label: result.label.as_str().to_string(),
            display_label: result.label.display().to_string(),
            probability: result.probability,
            confidence_percent: result.confidence_percent,
            explanation: result.explanation.to_string(),
            alert: result.label.is_malignant(),
            features: prediction.input.into(),
            breakdown: None,
            disclaimer: DISCLAIMER.to_string(),
        }
    }
}

// ============================================
// Batch Prediction
// ============================================

#[derive(Debug, Deserialize)]
pub struct BatchPredictRequest {
    pub items: Vec<PredictRequest>,
}

#[derive(Debug, Serialize)]
pub struct BatchPredictData {
    pub total_requested: usize,
    pub total_processed: usize,
    pub total_malignant: usize,
    pub total_benign: usize,
    pub total_failed: usize,
    pub results: Vec<BatchItemResult>,
    pub processing_time_ms: f64,
}

#[derive(Debug, Serialize)]
pub struct BatchItemResult {
    pub index: usize,
    pub status: String, // "success" | "error"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prediction: Option<PredictionResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

// ============================================
// Field Metadata
// ============================================

#[derive(Debug, Serialize)]
pub struct FieldInfo {
    pub key: String,
    pub label: String,
    pub placeholder: String,
    pub reference_min: f64,
    pub reference_max: f64,
}

impl From<&FieldSpec> for FieldInfo {
    fn from(spec: &FieldSpec) -> Self {
        Self {
            key: spec.field.key().to_string(),
            label: spec.label.to_string(),
            placeholder: spec.placeholder.to_string(),
            reference_min: spec.reference_min,
            reference_max: spec.reference_max,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FieldsData {
    pub fields: Vec<FieldInfo>,
    pub hint: String,
    pub model: ScoringModel,
    pub disclaimer: String,
}

impl FieldsData {
    pub fn current() -> Self {
        Self {
            fields: Field::ALL.iter().map(|f| f.spec().into()).collect(),
            hint: crate::utils::constants::reference_ranges_hint(),
            model: ScoringModel::REFERENCE,
            disclaimer: DISCLAIMER.to_string(),
        }
    }
}

// ============================================
// Stats / Telemetry
// ============================================

#[derive(Debug, Serialize)]
pub struct StatsData {
    #[serde(flatten)]
    pub stats: TelemetryStats,
    pub uptime_seconds: u64,
    pub api_version: String,
}

// ============================================
// Health Check
// ============================================

#[derive(Debug, Serialize)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}
