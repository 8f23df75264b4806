//! Centralized Error Handling Module
//!
//! Every failure carries a unique code so CLI output, API responses and
//! logs all agree on what went wrong.
//!
//! Error codes follow pattern: CATEGORY_SPECIFIC_ERROR
//! - INPUT_xxx: Input collection / validation errors
//! - API_xxx: API errors
//! - CFG_xxx: Configuration errors

use std::fmt;

use crate::utils::constants::Field;

/// Application-wide error type
#[derive(Debug)]
pub struct AppError {
    /// Unique error code for logging/monitoring
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Optional underlying error
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new AppError
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create AppError with source error
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get error code as string (for logging)
    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }

    /// HTTP status for this error
    pub fn http_status(&self) -> u16 {
        self.code.http_status()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Unique error codes for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // ============================================
    // Input Errors (1xx)
    // ============================================
    /// Field left empty
    InputMissing,
    /// Field text does not parse as a number
    InputNotNumeric,
    /// Field is NaN or infinite
    InputNonFinite,

    // ============================================
    // API Errors (3xx)
    // ============================================
    /// Invalid request format
    ApiBadRequest,
    /// Rate limit exceeded
    ApiRateLimited,
    /// Batch exceeds configured maximum
    ApiBatchTooLarge,
    /// Internal server error
    ApiInternalError,
    /// Resource not found
    ApiNotFound,

    // ============================================
    // Configuration Errors (4xx)
    // ============================================
    /// Invalid configuration value
    ConfigInvalidValue,

    // ============================================
    // Generic Errors (9xx)
    // ============================================
    /// Unknown error
    Unknown,
}

impl ErrorCode {
    /// Get string representation of error code
    pub fn as_str(&self) -> &'static str {
        match self {
            // Input Errors
            Self::InputMissing => "INPUT_MISSING",
            Self::InputNotNumeric => "INPUT_NOT_NUMERIC",
            Self::InputNonFinite => "INPUT_NON_FINITE",

            // API Errors
            Self::ApiBadRequest => "API_BAD_REQUEST",
            Self::ApiRateLimited => "API_RATE_LIMITED",
            Self::ApiBatchTooLarge => "API_BATCH_TOO_LARGE",
            Self::ApiInternalError => "API_INTERNAL_ERROR",
            Self::ApiNotFound => "API_NOT_FOUND",

            // Configuration Errors
            Self::ConfigInvalidValue => "CFG_INVALID_VALUE",

            // Generic
            Self::Unknown => "UNKNOWN_ERROR",
        }
    }

    /// Get HTTP status code for API responses
    pub fn http_status(&self) -> u16 {
        match self {
            Self::ApiBadRequest | Self::InputNonFinite | Self::ConfigInvalidValue => 400,
            Self::ApiNotFound => 404,
            Self::ApiBatchTooLarge => 413,
            Self::InputMissing | Self::InputNotNumeric => 422,
            Self::ApiRateLimited => 429,
            _ => 500,
        }
    }
}

// ============================================
// Convenience constructors
// ============================================

impl AppError {
    /// Field left empty
    pub fn missing_field(field: Field) -> Self {
        Self::new(ErrorCode::InputMissing, format!("{} is required", field))
    }

    /// Field text is not a number
    pub fn not_numeric(field: Field, raw: &str) -> Self {
        Self::new(
            ErrorCode::InputNotNumeric,
            format!("{} must be a number, got {:?}", field, raw),
        )
    }

    /// Field value is NaN or infinite
    pub fn non_finite(field: Field, value: f64) -> Self {
        Self::new(
            ErrorCode::InputNonFinite,
            format!("{} must be finite, got {}", field, value),
        )
    }

    /// API bad request
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiBadRequest, msg)
    }

    /// Batch over the configured limit
    pub fn batch_too_large(requested: usize, max: usize) -> Self {
        Self::new(
            ErrorCode::ApiBatchTooLarge,
            format!("Batch of {} exceeds maximum of {}", requested, max),
        )
    }

    /// Invalid configuration value
    pub fn invalid_config(key: &str, value: &str) -> Self {
        Self::new(
            ErrorCode::ConfigInvalidValue,
            format!("Invalid value for {}: {:?}", key, value),
        )
    }
}

// ============================================
// Result type alias
// ============================================

/// Application Result type
pub type AppResult<T> = Result<T, AppError>;

// ============================================
// Conversion from common error types
// ============================================

impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        Self::new(ErrorCode::Unknown, err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorCode::Unknown, "IO error", err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorCode::ApiBadRequest, "JSON parse error", err)
    }
}
