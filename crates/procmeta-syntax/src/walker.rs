//! Tree walker and result accumulator.
//!
//! One pass over the module in document order. Every function definition is
//! counted once; decorated functions additionally run their decorator
//! sequence through the resolver. Class bodies and nested function bodies are
//! walked as well.

use crate::error::SkipReason;
use crate::model::{AnnotationRecord, ParseResult};
use crate::resolver::{self, DecoratorOutcome, SequenceContext};
use crate::tree::{Decorated, Decorator, Definition, FunctionDef, Module, Node};

/// Walk `module` and collect every record the decorators produce.
pub fn walk(module: &Module) -> ParseResult {
    let mut acc = Accumulator::default();
    acc.walk_nodes(&module.body);
    acc.result
}

#[derive(Default)]
struct Accumulator {
    result: ParseResult,
}

impl Accumulator {
    fn walk_nodes(&mut self, nodes: &[Node]) {
        for node in nodes {
            match node {
                Node::Function(function) => {
                    self.result.total_functions += 1;
                    self.walk_nodes(&function.body);
                }
                Node::Class(class) => self.walk_nodes(&class.body),
                Node::Decorated(decorated) => self.walk_decorated(decorated),
            }
        }
    }

    fn walk_decorated(&mut self, decorated: &Decorated) {
        match &decorated.definition {
            Definition::Function(function) => {
                self.result.total_functions += 1;
                self.result.total_decorated_functions += 1;
                self.run_sequence(function, &decorated.decorators);
                self.walk_nodes(&function.body);
            }
            Definition::Class(class) => {
                tracing::debug!(
                    class = %class.name,
                    line = class.span.line,
                    decorators = decorated.decorators.len(),
                    "ignoring class decorators"
                );
                self.walk_nodes(&class.body);
            }
        }
    }

    /// Resolve each decorator in source order, threading the sequence context.
    fn run_sequence(&mut self, function: &FunctionDef, decorators: &[Decorator]) {
        let mut context = SequenceContext::default();
        for decorator in decorators {
            let (next, outcome) = resolver::resolve(decorator, context);
            context = next;
            match outcome {
                DecoratorOutcome::Built(record) => self.push(record),
                DecoratorOutcome::Skipped(reason) => log_skip(function, decorator, &reason),
            }
        }
    }

    fn push(&mut self, record: AnnotationRecord) {
        match &record {
            AnnotationRecord::Processor(_) => self.result.total_processors += 1,
            AnnotationRecord::Parameter(_) => self.result.total_parameters += 1,
            AnnotationRecord::Metric(_) => self.result.total_metrics += 1,
        }
        self.result.annotations.push(record);
    }
}

fn log_skip(function: &FunctionDef, decorator: &Decorator, reason: &SkipReason) {
    match reason {
        // Ordinary decorators (staticmethod, wraps, ...) are not mistakes
        SkipReason::UnsupportedAnnotation { .. } => tracing::debug!(
            function = %function.name,
            decorator = %decorator.name,
            line = decorator.span.line,
            "{}", reason
        ),
        _ => tracing::warn!(
            function = %function.name,
            decorator = %decorator.name,
            line = decorator.span.line,
            "skipping decorator: {}", reason
        ),
    }
}
