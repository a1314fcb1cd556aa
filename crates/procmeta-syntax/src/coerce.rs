//! String → enum lookup tables.
//!
//! Processor fields use closed tables: no match is an error for the caller
//! to report. Parameter and metric types use alias tables that fall back to
//! `UNDEFINED`, and the `required` flag falls back to `false`. Every match
//! ignores ASCII case.

use crate::model::*;

pub const PROCESSOR_KINDS: &[(&str, ProcessorKind)] = &[
    ("OPERATION", ProcessorKind::Operation),
    ("ALGORITHM", ProcessorKind::Algorithm),
    ("VISUALIZATION", ProcessorKind::Visualization),
];

pub const DATA_KINDS: &[(&str, DataKind)] = &[
    ("IMAGE", DataKind::Image),
    ("VIDEO", DataKind::Video),
    ("AUDIO", DataKind::Audio),
    ("TEXT", DataKind::Text),
    ("TABULAR", DataKind::Tabular),
    ("TIME_SERIES", DataKind::TimeSeries),
    ("GRAPH", DataKind::Graph),
    ("NUMBER", DataKind::Number),
];

pub const VISIBILITIES: &[(&str, Visibility)] = &[
    ("PUBLIC", Visibility::Public),
    ("PRIVATE", Visibility::Private),
    ("SHARED", Visibility::Shared),
];

const PARAMETER_TYPE_ALIASES: &[(&str, ParameterType)] = &[
    ("STRING", ParameterType::String),
    ("STR", ParameterType::String),
    ("INTEGER", ParameterType::Integer),
    ("INT", ParameterType::Integer),
    ("FLOAT", ParameterType::Float),
    ("BOOLEAN", ParameterType::Boolean),
    ("BOOL", ParameterType::Boolean),
    ("COMPLEX", ParameterType::Complex),
    ("DICTIONARY", ParameterType::Dictionary),
    ("LIST", ParameterType::List),
    ("TUPLE", ParameterType::Tuple),
];

const METRIC_KIND_ALIASES: &[(&str, MetricKind)] = &[
    ("RECALL", MetricKind::Recall),
    ("PRECISION", MetricKind::Precision),
    ("F1_SCORE", MetricKind::F1Score),
    ("F1", MetricKind::F1Score),
];

/// Case-insensitive lookup in a closed table.
pub fn lookup<T: Copy>(table: &[(&str, T)], raw: &str) -> Option<T> {
    table
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(raw))
        .map(|&(_, value)| value)
}

pub fn parameter_type(raw: &str) -> ParameterType {
    lookup(PARAMETER_TYPE_ALIASES, raw).unwrap_or(ParameterType::Undefined)
}

pub fn metric_kind(raw: &str) -> MetricKind {
    lookup(METRIC_KIND_ALIASES, raw).unwrap_or(MetricKind::Undefined)
}

/// Only a case-insensitive `true` is true.
pub fn flag(raw: &str) -> bool {
    raw.eq_ignore_ascii_case("TRUE")
}
