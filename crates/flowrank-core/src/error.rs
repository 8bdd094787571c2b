//! Core error types for flowrank-core.
//!
//! Every failure in this crate happens at the input boundary: a record set
//! with the wrong shape, or a configuration that cannot produce well-formed
//! scores. Nothing fails mid-computation.

use serde::Serialize;
use thiserror::Error;

/// A single shape problem found in one input record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("record {index} ({}): {field}: {message}", .id.as_deref().unwrap_or("<no id>"))]
pub struct RecordError {
    /// Position of the record in the input set.
    pub index: usize,
    /// The record's id, when one could be read.
    pub id: Option<String>,
    /// The offending field (`"record"` when the record itself is malformed).
    pub field: String,
    /// What is wrong with it.
    pub message: String,
}

impl RecordError {
    pub fn new(index: usize, id: Option<&str>, field: &str, message: impl Into<String>) -> Self {
        RecordError {
            index,
            id: id.map(str::to_string),
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Core errors produced by the flowrank-core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The record set failed shape validation. Holds every problem found.
    #[error("{}", summarize(.0))]
    Validation(Vec<RecordError>),

    /// The rule configuration cannot be used.
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// JSON decoding failed after validation passed, or a config file was
    /// not valid JSON.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

fn summarize(errors: &[RecordError]) -> String {
    match errors.first() {
        Some(first) => format!("{} invalid record(s); first: {}", errors.len(), first),
        None => "invalid record set".to_string(),
    }
}

impl CoreError {
    pub(crate) fn config(reason: impl Into<String>) -> Self {
        CoreError::InvalidConfig {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_error_display_names_record_and_field() {
        let err = RecordError::new(2, Some("k"), "dependsOn", "must be a list");
        assert_eq!(err.to_string(), "record 2 (k): dependsOn: must be a list");

        let err = RecordError::new(0, None, "id", "missing");
        assert_eq!(err.to_string(), "record 0 (<no id>): id: missing");
    }

    #[test]
    fn validation_error_reports_count() {
        let err = CoreError::Validation(vec![
            RecordError::new(0, None, "id", "missing"),
            RecordError::new(1, None, "id", "missing"),
        ]);
        assert!(err.to_string().starts_with("2 invalid record(s)"));
    }
}
