//! JSON renderer, structured output for tooling integration.
//!
//! Serializes the report directly; descriptor field names are camelCase and
//! enum values keep their upper-case spelling.

use crate::render::Renderer;
use crate::report::Report;
use anyhow::{Context, Result};

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, report: &Report) -> Result<String> {
        let mut out = serde_json::to_string_pretty(report)
            .with_context(|| format!("failed to serialize report for {}", report.source))?;
        out.push('\n');
        Ok(out)
    }

    fn render_all(&self, reports: &[Report]) -> Result<String> {
        let mut out = serde_json::to_string_pretty(reports).context("failed to serialize reports")?;
        out.push('\n');
        Ok(out)
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}
