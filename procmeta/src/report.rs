//! Per-input report, the unit every renderer consumes.

use procmeta_syntax::{ParameterDescriptor, ParseResult, Uuid};
use serde::Serialize;

/// Descriptors and syntax diagnostics for one source.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// File path, or `<stdin>`.
    pub source: String,
    #[serde(flatten)]
    pub result: ParseResult,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
}

impl Report {
    /// Parameters owned by `processor`, in declaration order.
    pub fn parameters_of(&self, processor: Uuid) -> impl Iterator<Item = &ParameterDescriptor> {
        self.result
            .parameters()
            .filter(move |p| p.processor_id == processor)
    }
}
