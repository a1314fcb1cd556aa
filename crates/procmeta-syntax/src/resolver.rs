//! Annotation resolver: one decorator clause in, one outcome out.

use crate::builder;
use crate::error::SkipReason;
use crate::merge::Arguments;
use crate::model::{AnnotationKind, AnnotationRecord};
use crate::tree::Decorator;
use uuid::Uuid;

/// State carried from one decorator to the next within a single function.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SequenceContext {
    /// `order` the next parameter receives.
    pub next_order: usize,
    /// Id of the most recently built processor in this sequence.
    pub active_processor: Option<Uuid>,
}

impl SequenceContext {
    /// Context after `record` was built.
    pub fn advance(self, record: &AnnotationRecord) -> Self {
        match record {
            AnnotationRecord::Processor(p) => Self {
                active_processor: Some(p.id),
                ..self
            },
            AnnotationRecord::Parameter(_) => Self {
                next_order: self.next_order + 1,
                ..self
            },
            AnnotationRecord::Metric(_) => self,
        }
    }
}

/// What one decorator clause produced.
#[derive(Debug, Clone, PartialEq)]
pub enum DecoratorOutcome {
    Built(AnnotationRecord),
    Skipped(SkipReason),
}

/// Resolve one decorator against the sequence context, returning the
/// context the next decorator should see.
///
/// A skipped decorator leaves the context untouched.
pub fn resolve(decorator: &Decorator, context: SequenceContext) -> (SequenceContext, DecoratorOutcome) {
    match build(decorator, &context) {
        Ok(record) => (context.advance(&record), DecoratorOutcome::Built(record)),
        Err(reason) => (context, DecoratorOutcome::Skipped(reason)),
    }
}

fn build(decorator: &Decorator, context: &SequenceContext) -> Result<AnnotationRecord, SkipReason> {
    let kind = AnnotationKind::from_name(decorator.name.last()).ok_or_else(|| {
        SkipReason::UnsupportedAnnotation {
            name: decorator.name.to_string(),
        }
    })?;

    let args = Arguments::partition(decorator.argument_list());
    let record = match kind {
        AnnotationKind::Processor => AnnotationRecord::Processor(builder::processor(&args)?),
        AnnotationKind::Parameter => AnnotationRecord::Parameter(builder::parameter(
            &args,
            context.active_processor,
            context.next_order,
        )?),
        AnnotationKind::Metric => AnnotationRecord::Metric(builder::metric(&args)?),
    };
    Ok(record)
}
