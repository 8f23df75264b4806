//! API Request Handlers

use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::{StatusCode, Uri},
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::middleware::RateLimiter;
use super::types::*;
use crate::core::predictor::Predictor;
use crate::models::config::ServerConfig;
use crate::models::errors::AppError;
use crate::models::types::{Label, PredictionInput};
use crate::utils::telemetry::PredictionTelemetry;

/// Shared application state
pub struct AppState {
    pub telemetry: Arc<PredictionTelemetry>,
    pub predictor: Predictor,
    pub config: ServerConfig,
    pub rate_limiter: Arc<RateLimiter>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(telemetry: Arc<PredictionTelemetry>, config: ServerConfig) -> Self {
        Self {
            telemetry,
            predictor: Predictor::new(),
            rate_limiter: Arc::new(RateLimiter::from(&config)),
            config,
            start_time: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Score one validated input and record it
    fn run_prediction(&self, input: PredictionInput, explain: bool) -> (Label, PredictionResponse) {
        let started = Instant::now();
        let prediction = self.predictor.predict_with_summary(input);
        let breakdown = explain.then(|| self.predictor.scorer().breakdown(&input));
        self.telemetry
            .record_prediction(prediction.result.label, started.elapsed().as_micros() as u64);

        let label = prediction.result.label;
        let mut response = PredictionResponse::from(prediction);
        if let Some(breakdown) = breakdown {
            response = response.with_breakdown(breakdown);
        }
        (label, response)
    }
}

/// Error half of every handler result
pub type ApiFailure = (StatusCode, Json<ApiResponse<()>>);

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

fn status_for(err: &AppError) -> StatusCode {
    StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

fn failure(err: &AppError, start: Instant) -> ApiFailure {
    (
        status_for(err),
        Json(ApiResponse::error(ApiError::from(err), elapsed_ms(start))),
    )
}

fn rejection_failure(rejection: JsonRejection, start: Instant) -> ApiFailure {
    warn!("Malformed request body: {}", rejection.body_text());
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::error(
            ApiError::bad_request(rejection.body_text()),
            elapsed_ms(start),
        )),
    )
}

// ============================================
// Health Check
// ============================================

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<ApiResponse<HealthData>> {
    let start = Instant::now();

    let data = HealthData {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
    };

    Json(ApiResponse::success(data, elapsed_ms(start)))
}

// ============================================
// Field Metadata
// ============================================

pub async fn get_fields() -> Json<ApiResponse<FieldsData>> {
    let start = Instant::now();
    Json(ApiResponse::success(FieldsData::current(), elapsed_ms(start)))
}

// ============================================
// Prediction
// ============================================

pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<PredictionResponse>>, ApiFailure> {
    let start = Instant::now();

    let Json(req) = payload.map_err(|rejection| {
        state.telemetry.record_rejection();
        rejection_failure(rejection, start)
    })?;

    let input = PredictionInput::new(req.mean_radius, req.texture, req.smoothness, req.compactness)
        .map_err(|e| {
            state.telemetry.record_rejection();
            failure(&e, start)
        })?;

    let (label, data) = state.run_prediction(input, req.explain);
    info!("🔬 Prediction served: {} ({}%)", label, data.confidence_percent);

    Ok(Json(ApiResponse::success(data, elapsed_ms(start))))
}

pub async fn predict_form(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<FormPredictRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<PredictionResponse>>, ApiFailure> {
    let start = Instant::now();

    let Json(req) = payload.map_err(|rejection| {
        state.telemetry.record_rejection();
        rejection_failure(rejection, start)
    })?;

    let collector = req.collector();
    if !collector.is_ready() {
        state.telemetry.record_rejection();
        debug!(incomplete = ?collector.incomplete_fields(), "Form not ready");
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiResponse::error(
                ApiError::incomplete_form(&collector),
                elapsed_ms(start),
            )),
        ));
    }

    let input = collector.to_input().map_err(|e| failure(&e, start))?;
    let (label, data) = state.run_prediction(input, false);
    info!("🔬 Form prediction served: {} ({}%)", label, data.confidence_percent);

    Ok(Json(ApiResponse::success(data, elapsed_ms(start))))
}

// ============================================
// Batch Prediction
// ============================================

pub async fn batch_predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<BatchPredictRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<BatchPredictData>>, ApiFailure> {
    let start = Instant::now();

    let Json(req) = payload.map_err(|rejection| {
        state.telemetry.record_rejection();
        rejection_failure(rejection, start)
    })?;

    if req.items.is_empty() {
        return Err(failure(&AppError::bad_request("Batch must contain at least one item"), start));
    }

    let max_batch = state.config.max_batch;
    if req.items.len() > max_batch {
        warn!("Batch of {} rejected (max {})", req.items.len(), max_batch);
        return Err(failure(&AppError::batch_too_large(req.items.len(), max_batch), start));
    }

    info!("📦 Batch prediction: {} items", req.items.len());

    let mut results = Vec::with_capacity(req.items.len());
    let (mut malignant, mut benign, mut failed) = (0, 0, 0);

    for (index, item) in req.items.iter().enumerate() {
        match PredictionInput::new(item.mean_radius, item.texture, item.smoothness, item.compactness) {
            Ok(input) => {
                let (label, prediction) = state.run_prediction(input, item.explain);
                if label.is_malignant() {
                    malignant += 1;
                } else {
                    benign += 1;
                }
                results.push(BatchItemResult {
                    index,
                    status: "success".to_string(),
                    prediction: Some(prediction),
                    error: None,
                });
            }
            Err(e) => {
                state.telemetry.record_rejection();
                failed += 1;
                results.push(BatchItemResult {
                    index,
                    status: "error".to_string(),
                    prediction: None,
                    error: Some(ApiError::from(&e)),
                });
            }
        }
    }

    let data = BatchPredictData {
        total_requested: req.items.len(),
        total_processed: malignant + benign,
        total_malignant: malignant,
        total_benign: benign,
        total_failed: failed,
        results,
        processing_time_ms: elapsed_ms(start),
    };

    Ok(Json(ApiResponse::success(data, elapsed_ms(start))))
}

// ============================================
// Stats
// ============================================

pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<ApiResponse<StatsData>> {
    let start = Instant::now();

    let data = StatsData {
        stats: state.telemetry.get_stats(),
        uptime_seconds: state.uptime_seconds(),
        api_version: env!("CARGO_PKG_VERSION").to_string(),
    };

    Json(ApiResponse::success(data, elapsed_ms(start)))
}

// ============================================
// Fallback
// ============================================

pub async fn not_found(uri: Uri) -> ApiFailure {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::error(ApiError::not_found(uri.path()), 0.0)),
    )
}
