//! Grammar front-end: turns source bytes into a [`Module`] tree.
//!
//! The walker only depends on the [`Grammar`] trait. [`IndentGrammar`] is the
//! bundled line-oriented implementation for indentation-based sources.

mod args;
mod indent;
mod lines;

pub use indent::IndentGrammar;

use crate::tree::{Module, Span};
use std::fmt;

/// A syntax problem reported by a front-end. Never fatal to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxDiagnostic {
    pub span: Span,
    pub message: String,
}

impl SyntaxDiagnostic {
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}

impl fmt::Display for SyntaxDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Error in line {}, column {}: {}",
            self.span.line, self.span.column, self.message
        )
    }
}

/// Everything a front-end hands back for one source.
#[derive(Debug, Default)]
pub struct SyntaxOutput {
    pub module: Module,
    pub diagnostics: Vec<SyntaxDiagnostic>,
}

/// Trait for front-ends that build the syntax tree from raw source.
pub trait Grammar {
    fn parse(&self, source: &[u8]) -> SyntaxOutput;
}
