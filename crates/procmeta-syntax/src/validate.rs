//! Whole-result checks that run after the walk.

use crate::error::ParseError;
use crate::model::ParseResult;
use regex::Regex;
use std::sync::LazyLock;

static RE_PARAMETER_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]*$").unwrap());

/// Reject the result if any parameter name has characters outside
/// `[a-zA-Z0-9_-]`. The first offending name (in source order) is reported.
pub fn validate(result: ParseResult) -> Result<ParseResult, ParseError> {
    if let Some(bad) = result
        .parameters()
        .find(|p| !RE_PARAMETER_NAME.is_match(&p.name))
    {
        return Err(ParseError::BadParameterName {
            name: bad.name.clone(),
        });
    }
    Ok(result)
}
