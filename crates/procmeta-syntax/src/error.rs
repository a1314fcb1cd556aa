//! Error types.
//!
//! [`SkipReason`] explains why one decorator produced no record; the walker
//! logs it and moves on. [`ParseError`] is the only failure that escapes a
//! parse call.

use crate::model::AnnotationKind;
use thiserror::Error;

/// Why a single decorator was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("unsupported annotation '{name}'")]
    UnsupportedAnnotation { name: String },

    #[error("@{}: missing required field '{field}'", .annotation.as_str())]
    MissingRequiredField {
        annotation: AnnotationKind,
        field: &'static str,
    },

    #[error("@parameter '{name}' has no data_processor before it in the same decorator sequence")]
    MissingOwningProcessor { name: String },

    #[error("@data_processor: '{value}' is not a valid {field}")]
    UnknownEnumValue { field: &'static str, value: String },
}

/// Failure of a whole parse call. No partial result accompanies it.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid parameter name '{name}': only letters, digits, '_' and '-' are allowed")]
    BadParameterName { name: String },

    #[error("failed to read source: {0}")]
    Io(#[from] std::io::Error),
}
