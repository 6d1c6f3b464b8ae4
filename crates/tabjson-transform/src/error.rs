//! Error types for normalization.

use serde::Serialize;
use thiserror::Error;

/// Configuration errors that stop a normalization pass before any row is read.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransformError {
    /// The projection must name one source column per canonical field.
    #[error("column selection has {actual} entries, expected {expected} ({fields})")]
    SelectionArity {
        expected: usize,
        actual: usize,
        fields: String,
    },
}

/// A single cell that failed a required coercion.
///
/// Recovered locally: the record is dropped and counted, never fatal.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize)]
#[error("{field}: cannot read '{value}' as {expected}")]
pub struct ParseError {
    pub field: &'static str,
    pub value: String,
    pub expected: &'static str,
}

impl ParseError {
    pub fn new(field: &'static str, value: impl Into<String>, expected: &'static str) -> Self {
        Self {
            field,
            value: value.into(),
            expected,
        }
    }
}

/// Result type for normalization operations.
pub type Result<T> = std::result::Result<T, TransformError>;
