//! procmeta: extract processor metadata from decorated Python sources.
//!
//! Two modes:
//!
//! - **stdin mode**: `procmeta < module.py`
//! - **file mode**: `procmeta -o docs/processors -f markdown processors/*.py`

mod render;
mod report;
mod toc;

use anyhow::{Context, Result};
use clap::Parser;
use report::Report;
use std::collections::HashMap;
use std::fs;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "procmeta",
    about = "Extract data processor, parameter and metric descriptors from decorated Python sources"
)]
struct Cli {
    /// Input files, directories or glob patterns. If omitted, reads from stdin.
    files: Vec<String>,

    /// Write one report per input into this directory instead of stdout
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Output format: json (default), markdown
    #[arg(short = 'f', long, default_value = "json")]
    format: String,

    /// Do not echo syntax diagnostics to stderr
    #[arg(long)]
    no_diagnostics: bool,
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    if cli.files.is_empty() {
        return stdin_mode(&cli);
    }

    file_mode(&cli)
}

/// Log to stderr; `RUST_LOG` overrides the default `warn` level.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .init();
}

/// stdin mode: read from stdin, write one report to stdout.
fn stdin_mode(cli: &Cli) -> Result<()> {
    let renderer = render::create_renderer(&cli.format)?;

    let mut diagnostics = Vec::new();
    let result = procmeta_syntax::parse_reader(io::stdin().lock(), Some(&mut diagnostics))
        .context("failed to extract metadata from <stdin>")?;

    let report = Report {
        source: "<stdin>".to_string(),
        result,
        diagnostics,
    };
    echo_diagnostics(cli, &report);
    print!("{}", renderer.render(&report)?);
    Ok(())
}

/// file mode: parse every input; a failing input is reported and counted
/// without stopping the others.
fn file_mode(cli: &Cli) -> Result<()> {
    let renderer = render::create_renderer(&cli.format)?;

    if let Some(dir) = cli.output.as_deref() {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output directory: {}", dir.display()))?;
    }

    let input_files = expand_globs(&cli.files)?;
    let mut reports = Vec::new();
    let mut failed = 0;

    for path in &input_files {
        match load(path) {
            Ok(report) => {
                echo_diagnostics(cli, &report);
                reports.push(report);
            }
            Err(e) => {
                tracing::error!(file = %path.display(), "{:#}", e);
                failed += 1;
            }
        }
    }

    match cli.output.as_deref() {
        Some(dir) => {
            let ext = renderer.file_extension();
            let names = output_names(&reports);
            for (report, name) in reports.iter().zip(&names) {
                let out_path = dir.join(format!("{}.{}", name, ext));
                fs::write(&out_path, renderer.render(report)?)
                    .with_context(|| format!("failed to write {}", out_path.display()))?;
            }
        }
        None if !reports.is_empty() => print!("{}", renderer.render_all(&reports)?),
        None => {}
    }

    if failed > 0 {
        anyhow::bail!("{} of {} inputs failed", failed, input_files.len());
    }
    Ok(())
}

fn load(path: &Path) -> Result<Report> {
    let source = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let mut diagnostics = Vec::new();
    let result = procmeta_syntax::parse(&source, Some(&mut diagnostics))
        .with_context(|| format!("failed to extract metadata from {}", path.display()))?;
    Ok(Report {
        source: path.to_string_lossy().to_string(),
        result,
        diagnostics,
    })
}

fn echo_diagnostics(cli: &Cli, report: &Report) {
    if cli.no_diagnostics {
        return;
    }
    for diag in &report.diagnostics {
        eprintln!("{}: {}", report.source, diag);
    }
}

/// File extensions recognized as source files.
const SUPPORTED_EXTENSIONS: &[&str] = &["py"];

/// Expand glob patterns into a list of real file paths.
/// Also handles bare directory paths by scanning for supported file types.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        // Directories are scanned non-recursively
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?;
            for entry in entries.flatten() {
                let p = entry.path();
                if p.is_file() && has_supported_extension(&p) {
                    files.push(p);
                }
            }
            continue;
        }
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            tracing::warn!(pattern = %pattern, "no files matched");
        }
        files.extend(matches);
    }
    // Sort for deterministic output
    files.sort();
    files.dedup();
    Ok(files)
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext))
}

/// Derive the output file name (without extension) from a source path.
/// "processors/blur.py" → "blur"
fn derive_output_name(source: &str) -> String {
    let filename = source.rsplit(|c| c == '/' || c == '\\').next().unwrap_or(source);
    filename
        .strip_suffix(".py")
        .unwrap_or(filename)
        .to_string()
}

/// One distinct output name per report.
///
/// Reports whose file names collide are prefixed with as many parent
/// directories as it takes to tell them apart: `a/blur.py` and `b/blur.py`
/// become `a_blur` and `b_blur`.
fn output_names(reports: &[Report]) -> Vec<String> {
    let components: Vec<Vec<&str>> = reports
        .iter()
        .map(|r| {
            r.source
                .split(|c| c == '/' || c == '\\')
                .filter(|part| !part.is_empty() && *part != ".")
                .collect()
        })
        .collect();

    let name_at = |idx: usize, depth: usize| -> String {
        let parts = &components[idx];
        let start = parts.len().saturating_sub(depth);
        let mut name = parts[start..].join("_");
        if let Some(stem) = name.strip_suffix(".py") {
            name.truncate(stem.len());
        }
        name
    };

    let mut names: Vec<String> = (0..reports.len())
        .map(|i| derive_output_name(&reports[i].source))
        .collect();

    let mut depth = 1;
    loop {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for name in &names {
            *counts.entry(name.as_str()).or_default() += 1;
        }
        let colliding: Vec<usize> = (0..names.len())
            .filter(|&i| counts[names[i].as_str()] > 1)
            .collect();
        if colliding.is_empty() {
            return names;
        }

        depth += 1;
        let exhausted = colliding.iter().all(|&i| depth > components[i].len());
        for &i in &colliding {
            names[i] = name_at(i, depth);
        }
        if exhausted {
            // Distinct paths that still join to the same name
            for (n, &i) in colliding.iter().enumerate() {
                names[i] = format!("{}-{}", names[i], n + 1);
            }
            return names;
        }
    }
}
