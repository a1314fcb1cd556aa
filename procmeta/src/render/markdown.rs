//! GitHub-flavored markdown renderer.
//!
//! One document per source: an index of processors, a section per processor
//! with its parameter table, the metrics, and the counters.

use crate::render::Renderer;
use crate::report::Report;
use crate::toc::{self, Anchors};
use anyhow::Result;
use procmeta_syntax::{MetricDescriptor, ParameterDescriptor, ProcessorDescriptor};
use regex::Regex;
use std::sync::LazyLock;

pub struct MarkdownRenderer;

static RE_LINE_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*\r?\n\s*").unwrap());

impl Renderer for MarkdownRenderer {
    fn render(&self, report: &Report) -> Result<String> {
        Ok(render_report(report))
    }

    fn render_all(&self, reports: &[Report]) -> Result<String> {
        Ok(reports
            .iter()
            .map(render_report)
            .collect::<Vec<_>>()
            .join("\n"))
    }

    fn file_extension(&self) -> &str {
        "md"
    }
}

fn render_report(report: &Report) -> String {
    let mut out = format!("# {}\n\n", report.source);
    let result = &report.result;

    let processors: Vec<&ProcessorDescriptor> = result.processors().collect();
    if !processors.is_empty() {
        // Anchors are numbered across every heading, in document order
        let mut anchors = Anchors::default();
        anchors.next(&report.source);
        anchors.next("Index");

        let sections: Vec<_> = processors
            .iter()
            .map(|&p| {
                let anchor = anchors.next(&p.slug);
                let parameters: Vec<_> = report.parameters_of(p.id).collect();
                if !parameters.is_empty() {
                    anchors.next("Parameters");
                }
                (p, anchor, parameters)
            })
            .collect();

        out.push_str("## Index\n\n");
        for (processor, anchor, _) in &sections {
            out.push_str(&toc::render_toc_item(&processor.slug, anchor));
            out.push('\n');
        }
        out.push('\n');

        for (processor, _, parameters) in &sections {
            out.push_str(&render_processor(processor, parameters));
        }
    }

    let metrics: Vec<&MetricDescriptor> = result.metrics().collect();
    if !metrics.is_empty() {
        out.push_str(&render_metrics(&metrics));
    }

    out.push_str("## Summary\n\n");
    out.push_str("| Counter | Value |\n|---|---|\n");
    for (label, value) in [
        ("Functions", result.total_functions),
        ("Decorated functions", result.total_decorated_functions),
        ("Processors", result.total_processors),
        ("Parameters", result.total_parameters),
        ("Metrics", result.total_metrics),
    ] {
        out.push_str(&format!("| {} | {} |\n", label, value));
    }

    if !report.diagnostics.is_empty() {
        out.push_str("\n## Diagnostics\n\n");
        for diag in &report.diagnostics {
            out.push_str(&format!("* {}\n", diag));
        }
    }

    out
}

fn render_processor(processor: &ProcessorDescriptor, parameters: &[&ParameterDescriptor]) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("## {}\n", processor.slug));

    let flow = match processor.output_type {
        Some(output) => format!("`{}` -> `{}`", processor.input_type.as_str(), output.as_str()),
        None => format!("`{}`", processor.input_type.as_str()),
    };
    lines.push(format!(
        "**{}** · `{}` · {} · `{}`\n",
        processor.name,
        processor.kind.as_str(),
        flow,
        processor.visibility.as_str()
    ));

    lines.push(format!("Command: `{}`\n", processor.command));
    if let Some(ref author) = processor.author {
        lines.push(format!("Author: {}\n", author));
    }
    if !processor.description.is_empty() {
        lines.push(processor.description.clone());
        lines.push(String::new());
    }

    if parameters.is_empty() {
        lines.push("_Processor has no parameters._".to_string());
        lines.push(String::new());
    } else {
        lines.push("#### Parameters\n".to_string());
        lines.push("| # | Name | Type | Required | Default | Description |".to_string());
        lines.push("|---|---|---|---|---|---|".to_string());
        for p in parameters {
            lines.push(format!(
                "| {} | `{}` | {} | {} | {} | {} |",
                p.order,
                p.name,
                p.param_type.as_str(),
                if p.required { "yes" } else { "no" },
                code_cell(&p.default_value),
                cell(&p.description),
            ));
        }
        lines.push(String::new());
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn render_metrics(metrics: &[&MetricDescriptor]) -> String {
    let mut out = String::from("## Metrics\n\n");
    out.push_str("| Type | Ground truth | Prediction |\n|---|---|---|\n");
    for m in metrics {
        out.push_str(&format!(
            "| {} | {} | {} |\n",
            m.kind.as_str(),
            code_cell(&m.ground_truth),
            code_cell(&m.prediction)
        ));
    }
    out.push('\n');
    out
}

/// Table cells are single-line and must not close the row early.
fn cell(text: &str) -> String {
    RE_LINE_BREAK
        .replace_all(text.trim(), " ")
        .replace('|', "\\|")
}

fn code_cell(text: &str) -> String {
    if text.is_empty() {
        String::new()
    } else {
        format!("`{}`", cell(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(source: &[u8]) -> String {
        let report = Report {
            source: "blur.py".into(),
            result: procmeta_syntax::parse(source, None).unwrap(),
            diagnostics: Vec::new(),
        };
        MarkdownRenderer.render(&report).unwrap()
    }

    #[test]
    fn processor_section_with_parameters() {
        let out = render(
            br#"
@data_processor(name="Gaussian Blur", type="OPERATION", input_type="IMAGE", output_type="IMAGE", visibility="PUBLIC", description="Smooths an image")
@parameter("radius", "int", "true", "3", "Kernel radius")
@parameter("mode", "str", "false", "'a|b'")
def blur(image, radius, mode):
    pass
"#,
        );
        assert!(out.starts_with("# blur.py\n\n## Index\n\n* [gaussian-blur](#gaussian-blur)\n"));
        assert!(out.contains("## gaussian-blur\n"));
        assert!(out.contains("**Gaussian Blur** · `OPERATION` · `IMAGE` -> `IMAGE` · `PUBLIC`"));
        assert!(out.contains("Command: `gaussian-blur.py`"));
        assert!(out.contains("Smooths an image"));
        assert!(out.contains("| 0 | `radius` | INTEGER | yes | `3` | Kernel radius |"));
        assert!(out.contains("| 1 | `mode` | STRING | no | `a\\|b` |  |"));
        assert!(out.contains("| Parameters | 2 |"));
    }

    #[test]
    fn processor_anchors_skip_fixed_headings() {
        let out = render(
            br#"
@data_processor(slug="index", type="OPERATION", input_type="TEXT", output_type="TEXT", visibility="PUBLIC")
@parameter("n", "int", "true", "1")
@data_processor(slug="parameters", type="OPERATION", input_type="TEXT", output_type="TEXT", visibility="PUBLIC")
@parameter("m", "int", "true", "1")
@data_processor(slug="blur.py", type="OPERATION", input_type="TEXT", output_type="TEXT", visibility="PUBLIC")
def run(text, n, m):
    pass
"#,
        );
        // `# blur.py`, `## Index` and the first `#### Parameters` come earlier
        assert!(out.contains("* [index](#index-1)\n"));
        assert!(out.contains("* [parameters](#parameters-1)\n"));
        assert!(out.contains("* [blur.py](#blurpy-1)\n"));
    }

    #[test]
    fn visualization_has_no_output_kind() {
        let out = render(
            br#"
@data_processor(slug="plot", type="VISUALIZATION", input_type="TABULAR", visibility="PRIVATE")
def plot(table):
    pass
"#,
        );
        assert!(out.contains("`VISUALIZATION` · `TABULAR` · `PRIVATE`"));
        assert!(out.contains("_Processor has no parameters._"));
    }

    #[test]
    fn metrics_and_summary_without_processors() {
        let out = render(b"@metric('recall', 'y_true', 'y_pred')\ndef score():\n    pass\n");
        assert!(!out.contains("## Index"));
        assert!(out.contains("| RECALL | `y_true` | `y_pred` |"));
        assert!(out.contains("| Decorated functions | 1 |"));
    }

    #[test]
    fn cell_flattens_and_escapes() {
        assert_eq!(cell("  one\n   two | three "), "one two \\| three");
        assert_eq!(code_cell(""), "");
    }
}
