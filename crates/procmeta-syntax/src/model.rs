//! Descriptor records produced from recognized annotations.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The three decorator names the resolver understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationKind {
    Processor,
    Parameter,
    Metric,
}

impl AnnotationKind {
    /// Match the final segment of a decorator's dotted name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "data_processor" => Some(Self::Processor),
            "parameter" => Some(Self::Parameter),
            "metric" => Some(Self::Metric),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processor => "data_processor",
            Self::Parameter => "parameter",
            Self::Metric => "metric",
        }
    }
}

/// One recognized decorator, in source order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "annotation", rename_all = "lowercase")]
pub enum AnnotationRecord {
    Processor(ProcessorDescriptor),
    Parameter(ParameterDescriptor),
    Metric(MetricDescriptor),
}

impl AnnotationRecord {
    pub fn kind(&self) -> AnnotationKind {
        match self {
            Self::Processor(_) => AnnotationKind::Processor,
            Self::Parameter(_) => AnnotationKind::Parameter,
            Self::Metric(_) => AnnotationKind::Metric,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessorDescriptor {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    /// Never known from source; filled in by whoever publishes the descriptor.
    pub author: Option<String>,
    pub command: String,
    pub description: String,
    pub input_type: DataKind,
    /// `None` for visualizations.
    pub output_type: Option<DataKind>,
    pub visibility: Visibility,
    #[serde(rename = "type")]
    pub kind: ProcessorKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDescriptor {
    pub id: Uuid,
    /// Id of the processor built earlier in the same decorator sequence.
    pub processor_id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: ParameterType,
    pub required: bool,
    /// Raw source text, quotes stripped, never interpreted.
    pub default_value: String,
    pub order: usize,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricDescriptor {
    #[serde(rename = "type")]
    pub kind: MetricKind,
    pub ground_truth: String,
    pub prediction: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessorKind {
    Operation,
    Algorithm,
    Visualization,
}

impl ProcessorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Operation => "OPERATION",
            Self::Algorithm => "ALGORITHM",
            Self::Visualization => "VISUALIZATION",
        }
    }

    /// Whether descriptors of this kind carry an output data kind.
    pub fn has_output(&self) -> bool {
        !matches!(self, Self::Visualization)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataKind {
    Image,
    Video,
    Audio,
    Text,
    Tabular,
    TimeSeries,
    Graph,
    Number,
}

impl DataKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "IMAGE",
            Self::Video => "VIDEO",
            Self::Audio => "AUDIO",
            Self::Text => "TEXT",
            Self::Tabular => "TABULAR",
            Self::TimeSeries => "TIME_SERIES",
            Self::Graph => "GRAPH",
            Self::Number => "NUMBER",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Visibility {
    Public,
    Private,
    Shared,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "PUBLIC",
            Self::Private => "PRIVATE",
            Self::Shared => "SHARED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParameterType {
    String,
    Integer,
    Float,
    Boolean,
    Complex,
    Dictionary,
    List,
    Tuple,
    Undefined,
}

impl ParameterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "STRING",
            Self::Integer => "INTEGER",
            Self::Float => "FLOAT",
            Self::Boolean => "BOOLEAN",
            Self::Complex => "COMPLEX",
            Self::Dictionary => "DICTIONARY",
            Self::List => "LIST",
            Self::Tuple => "TUPLE",
            Self::Undefined => "UNDEFINED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetricKind {
    Recall,
    Precision,
    F1Score,
    Undefined,
}

impl MetricKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Recall => "RECALL",
            Self::Precision => "PRECISION",
            Self::F1Score => "F1_SCORE",
            Self::Undefined => "UNDEFINED",
        }
    }
}

/// Everything one parse produced: records in source order plus counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResult {
    pub annotations: Vec<AnnotationRecord>,
    pub total_functions: usize,
    pub total_decorated_functions: usize,
    pub total_parameters: usize,
    pub total_processors: usize,
    pub total_metrics: usize,
}

impl ParseResult {
    pub fn processors(&self) -> impl Iterator<Item = &ProcessorDescriptor> {
        self.annotations.iter().filter_map(|record| match record {
            AnnotationRecord::Processor(p) => Some(p),
            _ => None,
        })
    }

    pub fn parameters(&self) -> impl Iterator<Item = &ParameterDescriptor> {
        self.annotations.iter().filter_map(|record| match record {
            AnnotationRecord::Parameter(p) => Some(p),
            _ => None,
        })
    }

    pub fn metrics(&self) -> impl Iterator<Item = &MetricDescriptor> {
        self.annotations.iter().filter_map(|record| match record {
            AnnotationRecord::Metric(m) => Some(m),
            _ => None,
        })
    }
}
