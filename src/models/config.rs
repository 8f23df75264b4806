//! Configuration module
//!
//! Two kinds of configuration live here:
//! - `ScoringModel`: the fixed literals of the educational score, gathered
//!   into named fields. It is never read from the environment.
//! - `ServerConfig`: runtime knobs for the HTTP service, read from env.

use serde::Serialize;
use std::time::Duration;
use tracing::warn;

use crate::models::errors::{AppError, AppResult};
use crate::utils::constants::{
    BIAS, COMPACTNESS_OFFSET, COMPACTNESS_SCALE, COMPACTNESS_WEIGHT, DECISION_THRESHOLD,
    RADIUS_OFFSET, RADIUS_SCALE, RADIUS_WEIGHT, SMOOTHNESS_OFFSET, SMOOTHNESS_SCALE,
    SMOOTHNESS_WEIGHT, TEXTURE_OFFSET, TEXTURE_SCALE, TEXTURE_WEIGHT,
};

/// Fixed (offset, scale) pair used to rescale one raw feature
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalizationAnchor {
    pub offset: f64,
    pub scale: f64,
}

impl NormalizationAnchor {
    pub const fn new(offset: f64, scale: f64) -> Self {
        Self { offset, scale }
    }

    /// `(value - offset) / scale`
    #[inline]
    pub fn normalize(&self, value: f64) -> f64 {
        (value - self.offset) / self.scale
    }
}

/// Anchor and weight for each of the four measurements
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureTerm {
    pub anchor: NormalizationAnchor,
    pub weight: f64,
}

impl FeatureTerm {
    pub const fn new(offset: f64, scale: f64, weight: f64) -> Self {
        Self {
            anchor: NormalizationAnchor::new(offset, scale),
            weight,
        }
    }
}

/// The educational linear model.
///
/// These are hand-picked literals, not trained coefficients. `Default`
/// and `ScoringModel::REFERENCE` are the only values the pipeline uses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoringModel {
    pub mean_radius: FeatureTerm,
    pub texture: FeatureTerm,
    pub smoothness: FeatureTerm,
    pub compactness: FeatureTerm,
    pub bias: f64,
    pub threshold: f64,
}

impl ScoringModel {
    pub const REFERENCE: ScoringModel = ScoringModel {
        mean_radius: FeatureTerm::new(RADIUS_OFFSET, RADIUS_SCALE, RADIUS_WEIGHT),
        texture: FeatureTerm::new(TEXTURE_OFFSET, TEXTURE_SCALE, TEXTURE_WEIGHT),
        smoothness: FeatureTerm::new(SMOOTHNESS_OFFSET, SMOOTHNESS_SCALE, SMOOTHNESS_WEIGHT),
        compactness: FeatureTerm::new(COMPACTNESS_OFFSET, COMPACTNESS_SCALE, COMPACTNESS_WEIGHT),
        bias: BIAS,
        threshold: DECISION_THRESHOLD,
    };

    /// Terms in canonical field order
    pub fn terms(&self) -> [FeatureTerm; 4] {
        [self.mean_radius, self.texture, self.smoothness, self.compactness]
    }
}

impl Default for ScoringModel {
    fn default() -> Self {
        Self::REFERENCE
    }
}

// ============================================
// SERVER CONFIG
// ============================================

/// Configuration for the prediction API
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind host
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Requests allowed per client per window
    pub rate_limit: u32,
    /// Rate limit window
    pub rate_window: Duration,
    /// Maximum items in one batch request
    pub max_batch: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            rate_limit: 100,
            rate_window: Duration::from_secs(60),
            max_batch: 100,
        }
    }
}

impl ServerConfig {
    /// Build from environment, falling back to defaults on missing or bad values
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (env in production, a map in tests)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = lookup("WDBC_HOST")
            .filter(|h| !h.trim().is_empty())
            .unwrap_or(defaults.host);

        // Hosting platforms set PORT; WDBC_PORT is for local runs
        let port = lookup("PORT")
            .map(|v| ("PORT", v))
            .or_else(|| lookup("WDBC_PORT").map(|v| ("WDBC_PORT", v)))
            .map(|(key, v)| parse_or_default(key, &v, defaults.port))
            .unwrap_or(defaults.port);

        let rate_limit = lookup("WDBC_RATE_LIMIT")
            .map(|v| parse_or_default("WDBC_RATE_LIMIT", &v, defaults.rate_limit))
            .unwrap_or(defaults.rate_limit);

        let rate_window = lookup("WDBC_RATE_WINDOW_SECS")
            .map(|v| {
                Duration::from_secs(parse_or_default(
                    "WDBC_RATE_WINDOW_SECS",
                    &v,
                    defaults.rate_window.as_secs(),
                ))
            })
            .unwrap_or(defaults.rate_window);

        let max_batch = lookup("WDBC_MAX_BATCH")
            .map(|v| parse_or_default("WDBC_MAX_BATCH", &v, defaults.max_batch))
            .unwrap_or(defaults.max_batch);

        Self {
            host,
            port,
            rate_limit,
            rate_window,
            max_batch,
        }
    }

    /// `host:port` string
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parse a positive integer config value
pub fn parse_positive<T>(key: &str, raw: &str) -> AppResult<T>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    match raw.trim().parse::<T>() {
        Ok(v) if v > T::default() => Ok(v),
        _ => Err(AppError::invalid_config(key, raw)),
    }
}

fn parse_or_default<T>(key: &str, raw: &str, default: T) -> T
where
    T: std::str::FromStr + PartialOrd + Default + std::fmt::Display + Copy,
{
    parse_positive(key, raw).unwrap_or_else(|e| {
        warn!("⚠️ {} - using default {}", e, default);
        default
    })
}
