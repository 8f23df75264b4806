//! Input Collector Module
//!
//! Captures raw text for the four measurements and decides whether the
//! set is ready to score. A field is complete only when its trimmed text
//! parses as a finite number. Empty text is kept distinct from zero.

use serde::Serialize;
use tracing::debug;

use crate::models::errors::{AppError, AppResult};
use crate::models::types::PredictionInput;
use crate::utils::constants::Field;

/// State of a single field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    /// Unset or cleared
    Empty,
    /// Parsed finite number
    Number(f64),
    /// Text that is not a finite number, kept for error reporting
    Invalid(String),
}

impl FieldValue {
    /// Parse raw text the way the form does
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => Self::Number(v),
            _ => Self::Invalid(trimmed.to_string()),
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Number(_))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        Self::Empty
    }
}

/// Form state for one prediction request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputCollector {
    fields: [FieldValue; 4],
}

impl InputCollector {
    /// All fields empty
    pub fn new() -> Self {
        Self::default()
    }

    /// Collector pre-filled from four raw strings in canonical order
    pub fn from_raw(mean_radius: &str, texture: &str, smoothness: &str, compactness: &str) -> Self {
        let mut collector = Self::new();
        collector.set(Field::MeanRadius, mean_radius);
        collector.set(Field::Texture, texture);
        collector.set(Field::Smoothness, smoothness);
        collector.set(Field::Compactness, compactness);
        collector
    }

    /// Replace a field from raw text; returns the parsed state
    pub fn set(&mut self, field: Field, raw: &str) -> &FieldValue {
        let value = FieldValue::parse(raw);
        debug!(field = %field, complete = value.is_complete(), "field updated");
        self.fields[field.index()] = value;
        &self.fields[field.index()]
    }

    /// Return a field to the empty state
    pub fn clear(&mut self, field: Field) {
        self.fields[field.index()] = FieldValue::Empty;
    }

    pub fn get(&self, field: Field) -> &FieldValue {
        &self.fields[field.index()]
    }

    /// True only when all four fields hold finite numbers
    pub fn is_ready(&self) -> bool {
        self.fields.iter().all(FieldValue::is_complete)
    }

    /// Fields that block submission, in canonical order
    pub fn incomplete_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| !self.get(*f).is_complete())
            .collect()
    }

    /// One error per incomplete field
    pub fn errors(&self) -> Vec<AppError> {
        Field::ALL
            .into_iter()
            .filter_map(|f| Self::field_error(f, self.get(f)))
            .collect()
    }

    fn field_error(field: Field, value: &FieldValue) -> Option<AppError> {
        match value {
            FieldValue::Number(_) => None,
            FieldValue::Empty => Some(AppError::missing_field(field)),
            FieldValue::Invalid(raw) => Some(AppError::not_numeric(field, raw)),
        }
    }

    /// Build the scoring input; fails on the first incomplete field
    pub fn to_input(&self) -> AppResult<PredictionInput> {
        let mut values = [0.0; 4];
        for field in Field::ALL {
            let value = self.get(field);
            match value.as_number() {
                Some(v) => values[field.index()] = v,
                None => {
                    return Err(Self::field_error(field, value)
                        .unwrap_or_else(|| AppError::missing_field(field)))
                }
            }
        }
        PredictionInput::new(values[0], values[1], values[2], values[3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::errors::ErrorCode;

    #[test]
    fn test_parse_field_values() {
        assert_eq!(FieldValue::parse(""), FieldValue::Empty);
        assert_eq!(FieldValue::parse("   "), FieldValue::Empty);
        assert_eq!(FieldValue::parse(" 14.5 "), FieldValue::Number(14.5));
        assert_eq!(FieldValue::parse("-3"), FieldValue::Number(-3.0));
        assert_eq!(FieldValue::parse("1e-2"), FieldValue::Number(0.01));
        assert_eq!(FieldValue::parse("0"), FieldValue::Number(0.0));
        assert_eq!(FieldValue::parse("abc"), FieldValue::Invalid("abc".to_string()));
        assert_eq!(FieldValue::parse("NaN"), FieldValue::Invalid("NaN".to_string()));
        assert_eq!(FieldValue::parse("inf"), FieldValue::Invalid("inf".to_string()));
        assert_eq!(FieldValue::parse("1.2.3"), FieldValue::Invalid("1.2.3".to_string()));
    }

    #[test]
    fn test_empty_is_distinct_from_zero() {
        let mut c = InputCollector::from_raw("0", "0", "0", "0");
        assert!(c.is_ready());
        c.clear(Field::Texture);
        assert_eq!(c.get(Field::Texture), &FieldValue::Empty);
        assert!(!c.is_ready());
    }

    #[test]
    fn test_ready_gate() {
        let mut c = InputCollector::new();
        assert!(!c.is_ready());
        assert_eq!(c.incomplete_fields(), Field::ALL.to_vec());

        c.set(Field::MeanRadius, "14.5");
        c.set(Field::Texture, "19.3");
        c.set(Field::Smoothness, "0.1");
        assert!(!c.is_ready());
        assert_eq!(c.incomplete_fields(), vec![Field::Compactness]);

        c.set(Field::Compactness, "oops");
        assert!(!c.is_ready());

        c.set(Field::Compactness, "0.12");
        assert!(c.is_ready());
        assert!(c.incomplete_fields().is_empty());
    }

    #[test]
    fn test_ready_regardless_of_sign_or_magnitude() {
        let c = InputCollector::from_raw("-100", "1e6", "-0.0", "123456789");
        assert!(c.is_ready());
    }

    #[test]
    fn test_to_input_reports_first_problem() {
        let c = InputCollector::from_raw("14", "", "x", "0.1");
        let err = c.to_input().unwrap_err();
        assert_eq!(err.code, ErrorCode::InputMissing);
        assert!(err.message.contains("texture"));

        let errors = c.errors();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[1].code, ErrorCode::InputNotNumeric);
    }

    #[test]
    fn test_to_input_values() {
        let c = InputCollector::from_raw("14.5", "19.3", "0.1", "0.12");
        let input = c.to_input().unwrap();
        assert_eq!(input.values(), [14.5, 19.3, 0.1, 0.12]);
    }
}
