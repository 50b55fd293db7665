//! Console reporter for benchmark summaries
//!
//! Provides human-readable output with box-drawn tables and status markers.

use anyhow::Result;
use std::fmt::Write;

use chrono::SecondsFormat;

use crate::run_report::RunReport;
use crate::runner::{BenchmarkSummary, RunStatus};
use crate::stats::{DataQuality, TimerStatistics};

/// Render milliseconds as `1h 2m 3s`, `2m 3s` or `3s`.
fn format_duration(ms: u64) -> String {
    let seconds = ms / 1000;
    let minutes = seconds / 60;
    let hours = minutes / 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes % 60, seconds % 60)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds % 60)
    } else {
        format!("{}s", seconds)
    }
}

/// Console format reporter
pub struct ConsoleReporter;

impl ConsoleReporter {
    /// Format a benchmark summary for console output
    pub fn format(summary: &BenchmarkSummary) -> Result<String> {
        let mut output = String::new();

        writeln!(output)?;
        writeln!(output, "╔══════════════════════════════════════════════════════════════════════════════╗")?;
        writeln!(output, "║                           BENCHMARK RUN REPORT                               ║")?;
        writeln!(output, "╚══════════════════════════════════════════════════════════════════════════════╝")?;
        writeln!(output)?;

        let (symbol, status) = match summary.status() {
            RunStatus::Success => ("✓", "SUCCESS"),
            RunStatus::Failed => ("✗", "FAILED"),
        };
        writeln!(output, "Benchmark:  {}", summary.name)?;
        writeln!(output, "Result:     {} {}", symbol, status)?;
        writeln!(output, "Completed:  {}", summary.timestamp)?;
        writeln!(output)?;

        writeln!(
            output,
            "Iterations: {} successful, {} failed of {} requested",
            summary.successful_runs, summary.failed_runs, summary.iterations
        )?;
        writeln!(output, "Retries:    {}/{}", summary.retries_used, summary.total_retries)?;
        let limit = if summary.exclusion_rate_passed {
            "(within limit)"
        } else {
            "(over limit)"
        };
        writeln!(
            output,
            "Exclusion:  {:.1}% {}",
            summary.exclusion_rate * 100.0,
            limit
        )?;
        if summary.excluded_due_to_quality > 0 {
            writeln!(
                output,
                "Excluded:   {} timer(s) marked unreliable for excessive outliers",
                summary.excluded_due_to_quality
            )?;
        }
        writeln!(output)?;

        if summary.timers.is_empty() {
            writeln!(output, "No timer data collected.")?;
        } else {
            Self::format_timer_table(&mut output, &summary.timers)?;
        }

        if !summary.errors.is_empty() {
            writeln!(output)?;
            writeln!(output, "Errors:")?;
            for error in &summary.errors {
                writeln!(output, "  ✗ {}", error)?;
            }
        }

        if !summary.warnings.is_empty() {
            writeln!(output)?;
            writeln!(output, "Warnings:")?;
            for warning in &summary.warnings {
                writeln!(output, "  ⚠ {}", warning)?;
            }
        }

        writeln!(output)?;
        Ok(output)
    }

    /// Format a multi-benchmark run report for console output
    pub fn format_run(report: &RunReport) -> Result<String> {
        let mut output = String::new();
        let counts = report.counts();

        writeln!(output)?;
        writeln!(output, "╔══════════════════════════════════════════════════════════════════════════════╗")?;
        writeln!(output, "║                           BENCHMARK RUN REPORT                               ║")?;
        writeln!(output, "╚══════════════════════════════════════════════════════════════════════════════╝")?;
        writeln!(output)?;

        let overall = match report.status() {
            RunStatus::Success => "✓ SUCCESS",
            RunStatus::Failed => "✗ FAILED",
        };
        writeln!(output, "Overall Result: {}", overall)?;
        writeln!(output, "Duration:       {}", format_duration(report.duration_ms()))?;
        writeln!(
            output,
            "Completed:      {}",
            report.end_time.to_rfc3339_opts(SecondsFormat::Millis, true)
        )?;
        writeln!(output)?;

        writeln!(
            output,
            "Flows: {} total │ ✓ {} succeeded │ ✗ {} failed │ ⏭ {} skipped",
            counts.total, counts.successful, counts.failed, counts.skipped
        )?;
        writeln!(output)?;

        writeln!(output, "┌──────────────────────────────┬───────────┬─────────┬────────────┐")?;
        writeln!(output, "│ Flow                         │ Status    │ Retries │ Iterations │")?;
        writeln!(output, "├──────────────────────────────┼───────────┼─────────┼────────────┤")?;
        for summary in &report.benchmarks {
            let status = match summary.status() {
                RunStatus::Success => "✓ success",
                RunStatus::Failed => "✗ failed",
            };
            Self::format_flow_row(
                &mut output,
                &summary.name,
                status,
                &format!("{}/{}", summary.retries_used, summary.total_retries),
                &format!("{}/{}", summary.successful_runs, summary.iterations),
            )?;
        }
        for skipped in &report.skipped {
            Self::format_flow_row(&mut output, &skipped.name, "⏭ skipped", "-", "-")?;
        }
        writeln!(output, "└──────────────────────────────┴───────────┴─────────┴────────────┘")?;

        let with_errors: Vec<_> = report
            .benchmarks
            .iter()
            .filter(|s| !s.errors.is_empty())
            .collect();
        if !with_errors.is_empty() {
            writeln!(output)?;
            writeln!(output, "Errors:")?;
            for summary in with_errors {
                writeln!(output, "  {}:", summary.name)?;
                for error in &summary.errors {
                    writeln!(output, "    ✗ {}", error)?;
                }
            }
        }

        let has_warnings = !report.skipped.is_empty()
            || report.benchmarks.iter().any(|s| !s.warnings.is_empty());
        if has_warnings {
            writeln!(output)?;
            writeln!(output, "Warnings:")?;
            for summary in report.benchmarks.iter().filter(|s| !s.warnings.is_empty()) {
                writeln!(output, "  {}:", summary.name)?;
                for warning in &summary.warnings {
                    writeln!(output, "    ⚠ {}", warning)?;
                }
            }
            for skipped in &report.skipped {
                writeln!(output, "  {}:", skipped.name)?;
                writeln!(output, "    ⚠ {}", skipped.reason)?;
            }
        }

        for summary in report
            .benchmarks
            .iter()
            .filter(|s| s.status() == RunStatus::Success && !s.timers.is_empty())
        {
            writeln!(output)?;
            writeln!(output, "{}", summary.name)?;
            Self::format_timer_table(&mut output, &summary.timers)?;
        }

        writeln!(output)?;
        Ok(output)
    }

    fn format_flow_row(
        output: &mut String,
        name: &str,
        status: &str,
        retries: &str,
        iterations: &str,
    ) -> Result<()> {
        let name: String = name.chars().take(28).collect();
        writeln!(
            output,
            "│ {:<28} │ {:<9} │ {:<7} │ {:<10} │",
            name, status, retries, iterations
        )?;
        Ok(())
    }

    fn format_timer_table(output: &mut String, timers: &[TimerStatistics]) -> Result<()> {
        writeln!(output, "┌──────────────────────────┬─────────┬─────────┬─────────┬─────────┬─────────┬───────┬────────────┐")?;
        writeln!(output, "│ Timer                    │  Mean   │   P50   │   P75   │   P95   │   P99   │  CV   │ Quality    │")?;
        writeln!(output, "├──────────────────────────┼─────────┼─────────┼─────────┼─────────┼─────────┼───────┼────────────┤")?;

        for timer in timers {
            Self::format_timer_row(output, timer)?;
        }

        writeln!(output, "└──────────────────────────┴─────────┴─────────┴─────────┴─────────┴─────────┴───────┴────────────┘")?;
        Ok(())
    }

    fn format_timer_row(output: &mut String, timer: &TimerStatistics) -> Result<()> {
        let marker = match timer.data_quality {
            DataQuality::Good => "✓",
            DataQuality::Poor => "~",
            DataQuality::Unreliable => "✗",
        };
        let id: String = timer.id.chars().take(24).collect();

        writeln!(
            output,
            "│ {:<24} │ {:>7.0} │ {:>7.0} │ {:>7.0} │ {:>7.0} │ {:>7.0} │ {:>5.2} │ {} {:<8} │",
            id,
            timer.mean,
            timer.p50,
            timer.p75,
            timer.p95,
            timer.p99,
            timer.cv,
            marker,
            timer.data_quality.as_str(),
        )?;
        Ok(())
    }
}
