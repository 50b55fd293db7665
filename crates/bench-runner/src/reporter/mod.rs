//! Benchmark summary reporting
//!
//! # Output Formats
//!
//! - **JSON**: Machine-readable format for CI tooling and threshold checks
//! - **Console**: Human-readable run report with a per-timer table
//!
//! Single benchmarks are reported from a [`BenchmarkSummary`]; whole
//! sessions from a [`RunReport`] via the `*_run` methods.
//!
//! # Example
//!
//! ```no_run
//! use bench_runner::reporter::{Reporter, OutputFormat};
//! use bench_runner::runner::BenchmarkSummary;
//!
//! # fn example(summary: BenchmarkSummary) -> anyhow::Result<()> {
//! let reporter = Reporter::new(OutputFormat::Console);
//! reporter.report(&summary)?;
//!
//! Reporter::new(OutputFormat::JsonPretty)
//!     .write_to_file(&summary, "benchmark-results.json")?;
//! # Ok(())
//! # }
//! ```

mod console;
mod json;

use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::run_report::RunReport;
use crate::runner::BenchmarkSummary;

pub use console::ConsoleReporter;
pub use json::JsonReporter;

/// Output format for benchmark summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// JSON format for machine parsing
    Json,
    /// Pretty-printed JSON
    JsonPretty,
    /// Console report with tables and status markers
    #[default]
    Console,
}

/// Reporter for benchmark summaries
#[derive(Debug, Default)]
pub struct Reporter {
    format: OutputFormat,
}

impl Reporter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Report a summary to stdout
    pub fn report(&self, summary: &BenchmarkSummary) -> Result<()> {
        print_output(&self.format_summary(summary)?)
    }

    /// Report a whole session to stdout
    pub fn report_run(&self, report: &RunReport) -> Result<()> {
        print_output(&self.format_run(report)?)
    }

    /// Write a summary to a file, creating parent directories as needed
    pub fn write_to_file<P: AsRef<Path>>(
        &self,
        summary: &BenchmarkSummary,
        path: P,
    ) -> Result<()> {
        write_output(path.as_ref(), &self.format_summary(summary)?)
    }

    /// Write a session report to a file, creating parent directories as needed
    pub fn write_run_to_file<P: AsRef<Path>>(&self, report: &RunReport, path: P) -> Result<()> {
        write_output(path.as_ref(), &self.format_run(report)?)
    }

    /// Format a summary as a string
    pub fn format_summary(&self, summary: &BenchmarkSummary) -> Result<String> {
        match self.format {
            OutputFormat::Json => JsonReporter::format(summary, false),
            OutputFormat::JsonPretty => JsonReporter::format(summary, true),
            OutputFormat::Console => ConsoleReporter::format(summary),
        }
    }

    /// Format a session report as a string
    pub fn format_run(&self, report: &RunReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => JsonReporter::format(report, false),
            OutputFormat::JsonPretty => JsonReporter::format(report, true),
            OutputFormat::Console => ConsoleReporter::format_run(report),
        }
    }
}

fn print_output(output: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

fn write_output(path: &Path, output: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, output)
        .with_context(|| format!("Failed to write report: {}", path.display()))?;
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reporter_json_format() {
        let output = Reporter::new(OutputFormat::Json)
            .format_summary(&test_support::summary())
            .unwrap();

        assert!(output.contains("Account Switching"));
        assert!(output.contains("openAccountMenu"));
    }

    #[test]
    fn test_reporter_console_format() {
        let output = Reporter::new(OutputFormat::Console)
            .format_summary(&test_support::summary())
            .unwrap();

        assert!(output.contains("Account Switching"));
        assert!(output.contains("switchAccount"));
    }

    #[test]
    fn test_write_to_file_creates_parent_dirs() {
        let dir = std::env::temp_dir().join(format!("bench-runner-report-{}", std::process::id()));
        let path = dir.join("nested").join("summary.json");

        Reporter::new(OutputFormat::JsonPretty)
            .write_to_file(&test_support::summary(), &path)
            .unwrap();

        let written = fs::read_to_string(&path).unwrap();
        let parsed: BenchmarkSummary = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed.name, "Account Switching");
        assert_eq!(parsed.timers.len(), 2);
        assert_eq!(parsed.errors, test_support::summary().errors);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_reporter_run_json_format() {
        let output = Reporter::new(OutputFormat::Json)
            .format_run(&test_support::run_report())
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["benchmarks"].as_array().unwrap().len(), 2);
        assert_eq!(value["skipped"][0]["name"], "nft-list-scrolling");
        assert_eq!(value["end_time"], "2024-01-01T00:01:30Z");
    }

    #[test]
    fn test_write_run_to_file_round_trips() {
        let dir = std::env::temp_dir().join(format!("bench-runner-run-{}", std::process::id()));
        let path = dir.join("run.json");
        let report = test_support::run_report();

        Reporter::new(OutputFormat::JsonPretty)
            .write_run_to_file(&report, &path)
            .unwrap();

        let parsed: RunReport = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.counts(), report.counts());
        assert_eq!(parsed.exit_code(), 1);
        assert_eq!(parsed.duration_ms(), 90_000);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_default_format() {
        assert_eq!(Reporter::default().format, OutputFormat::Console);
    }
}
