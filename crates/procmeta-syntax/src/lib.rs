//! procmeta-syntax: read processor metadata from decorated source without
//! running it.
//!
//! A source file is turned into a syntax tree by a [`Grammar`] front-end, the
//! tree is walked once, and every `@data_processor`, `@parameter` and
//! `@metric` decorator becomes a typed descriptor:
//!
//! ```
//! let source = br#"
//! @data_processor(slug="blur", type="OPERATION", input_type="IMAGE",
//!                 output_type="IMAGE", visibility="PUBLIC")
//! @parameter("radius", "int", "true", "3")
//! def blur(image, radius):
//!     pass
//! "#;
//!
//! let result = procmeta_syntax::parse(source, None).unwrap();
//! assert_eq!(result.total_processors, 1);
//! assert_eq!(result.parameters().next().unwrap().name, "radius");
//! ```
//!
//! Malformed or unknown decorators are skipped one at a time and only show
//! up in the logs. The single fatal check, parameter naming, runs over the
//! finished result and discards it on failure.

pub mod builder;
pub mod coerce;
pub mod error;
pub mod grammar;
pub mod merge;
pub mod model;
pub mod resolver;
pub mod tree;
pub mod validate;
pub mod walker;

pub use error::{ParseError, SkipReason};
pub use grammar::{Grammar, IndentGrammar, SyntaxDiagnostic};
pub use model::*;
pub use uuid::Uuid;

use std::io::Read;

/// Parse source bytes with the bundled [`IndentGrammar`].
///
/// Syntax diagnostics are appended to `diagnostics` when a sink is given.
pub fn parse(source: &[u8], diagnostics: Option<&mut Vec<String>>) -> Result<ParseResult, ParseError> {
    parse_with(&IndentGrammar, source, diagnostics)
}

/// Read all of `reader` and [`parse`] it.
pub fn parse_reader<R: Read>(
    mut reader: R,
    diagnostics: Option<&mut Vec<String>>,
) -> Result<ParseResult, ParseError> {
    let mut source = Vec::new();
    reader.read_to_end(&mut source)?;
    parse(&source, diagnostics)
}

/// Parse with a caller-supplied front-end.
pub fn parse_with<G: Grammar + ?Sized>(
    grammar: &G,
    source: &[u8],
    diagnostics: Option<&mut Vec<String>>,
) -> Result<ParseResult, ParseError> {
    let output = grammar.parse(source);
    if let Some(sink) = diagnostics {
        sink.extend(output.diagnostics.iter().map(ToString::to_string));
    }

    let result = walker::walk(&output.module);
    tracing::debug!(
        functions = result.total_functions,
        decorated = result.total_decorated_functions,
        processors = result.total_processors,
        parameters = result.total_parameters,
        metrics = result.total_metrics,
        syntax_errors = output.diagnostics.len(),
        "walk finished"
    );

    validate::validate(result)
}
