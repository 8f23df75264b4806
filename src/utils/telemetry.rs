//! Telemetry Module
//!
//! Aggregate counters for the prediction service:
//! - predictions served, split by label
//! - submissions rejected at the collector
//! - average scoring latency
//!
//! Privacy-first: measurements and results are never retained, only
//! counts. Nothing is written to disk.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::models::types::Label;

/// Aggregated statistics for reporting
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TelemetryStats {
    /// Successful predictions
    pub total_predictions: u64,
    pub malignant: u64,
    pub benign: u64,
    /// Submissions refused before scoring
    pub rejected: u64,
    /// Share of predictions labelled malignant (0.0 when none)
    pub malignant_ratio: f64,
    /// Average time spent scoring (ms)
    pub avg_latency_ms: f64,
    /// Period start timestamp
    pub period_start: i64,
    /// Period end timestamp
    pub period_end: i64,
}

impl TelemetryStats {
    /// Plain-text summary for shutdown logs
    pub fn summary(&self) -> String {
        format!(
            "predictions={} (malignant={}, benign={}), rejected={}, avg_latency={:.3}ms",
            self.total_predictions,
            self.malignant,
            self.benign,
            self.rejected,
            self.avg_latency_ms,
        )
    }
}

/// Lock-free counters shared across request handlers
pub struct PredictionTelemetry {
    malignant: AtomicU64,
    benign: AtomicU64,
    rejected: AtomicU64,
    /// Summed scoring latency in microseconds
    total_latency_us: AtomicU64,
    session_start: i64,
}

impl PredictionTelemetry {
    pub fn new() -> Self {
        Self {
            malignant: AtomicU64::new(0),
            benign: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
            total_latency_us: AtomicU64::new(0),
            session_start: chrono::Utc::now().timestamp(),
        }
    }

    /// Record a served prediction
    pub fn record_prediction(&self, label: Label, latency_us: u64) {
        match label {
            Label::Malignant => self.malignant.fetch_add(1, Ordering::Relaxed),
            Label::Benign => self.benign.fetch_add(1, Ordering::Relaxed),
        };
        self.total_latency_us.fetch_add(latency_us, Ordering::Relaxed);
    }

    /// Record a submission that failed validation
    pub fn record_rejection(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current statistics
    pub fn get_stats(&self) -> TelemetryStats {
        let malignant = self.malignant.load(Ordering::Relaxed);
        let benign = self.benign.load(Ordering::Relaxed);
        let rejected = self.rejected.load(Ordering::Relaxed);
        let total_latency_us = self.total_latency_us.load(Ordering::Relaxed);
        let total = malignant + benign;

        let (malignant_ratio, avg_latency_ms) = if total > 0 {
            (
                malignant as f64 / total as f64,
                total_latency_us as f64 / total as f64 / 1000.0,
            )
        } else {
            (0.0, 0.0)
        };

        TelemetryStats {
            total_predictions: total,
            malignant,
            benign,
            rejected,
            malignant_ratio,
            avg_latency_ms,
            period_start: self.session_start,
            period_end: chrono::Utc::now().timestamp(),
        }
    }

    /// Reset counters (for new reporting period)
    pub fn reset(&self) {
        self.malignant.store(0, Ordering::Relaxed);
        self.benign.store(0, Ordering::Relaxed);
        self.rejected.store(0, Ordering::Relaxed);
        self.total_latency_us.store(0, Ordering::Relaxed);
    }
}

impl Default for PredictionTelemetry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_averages() {
        let telemetry = PredictionTelemetry::new();

        telemetry.record_prediction(Label::Malignant, 1000);
        telemetry.record_prediction(Label::Benign, 3000);
        telemetry.record_prediction(Label::Benign, 2000);
        telemetry.record_rejection();

        let stats = telemetry.get_stats();
        assert_eq!(stats.total_predictions, 3);
        assert_eq!(stats.malignant, 1);
        assert_eq!(stats.benign, 2);
        assert_eq!(stats.rejected, 1);
        assert!((stats.malignant_ratio - 1.0 / 3.0).abs() < 1e-12);
        assert!((stats.avg_latency_ms - 2.0).abs() < 1e-12);
        assert!(stats.period_end >= stats.period_start);
    }

    #[test]
    fn test_empty_stats() {
        let stats = PredictionTelemetry::new().get_stats();
        assert_eq!(stats.total_predictions, 0);
        assert_eq!(stats.malignant_ratio, 0.0);
        assert_eq!(stats.avg_latency_ms, 0.0);
    }

    #[test]
    fn test_reset() {
        let telemetry = PredictionTelemetry::new();
        telemetry.record_prediction(Label::Malignant, 10);
        telemetry.record_rejection();
        telemetry.reset();

        let stats = telemetry.get_stats();
        assert_eq!(stats.total_predictions, 0);
        assert_eq!(stats.rejected, 0);
    }

    #[test]
    fn test_summary() {
        let stats = TelemetryStats {
            total_predictions: 10,
            malignant: 4,
            benign: 6,
            rejected: 2,
            avg_latency_ms: 0.25,
            ..Default::default()
        };
        assert_eq!(
            stats.summary(),
            "predictions=10 (malignant=4, benign=6), rejected=2, avg_latency=0.250ms"
        );
    }
}
