//! Reports spanning several benchmarks
//!
//! A [`RunReport`] collects the [`BenchmarkSummary`] of every flow run in one
//! session, along with the flows that were skipped, and derives the overall
//! status and process exit code.
//!
//! # Example
//!
//! ```no_run
//! use bench_runner::run_report::RunReport;
//! use bench_runner::runner::{BenchmarkRunResult, BenchmarkRunner, TimerSample};
//!
//! # async fn example() -> bench_runner::Result<()> {
//! let runner = BenchmarkRunner::new();
//! let mut report = RunReport::start();
//!
//! let summary = runner
//!     .run(
//!         "tab-switching",
//!         || async { BenchmarkRunResult::success(vec![TimerSample::new("switch", 80.0)]) },
//!         10,
//!         2,
//!     )
//!     .await?;
//! report.record(summary);
//! report.skip("nft-list-scrolling", "Unknown flow: nft-list-scrolling");
//! report.finish();
//!
//! std::process::exit(report.exit_code());
//! # }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::runner::{BenchmarkSummary, RunStatus};

/// A flow that was requested but never run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedBenchmark {
    pub name: String,
    pub reason: String,
}

/// Flow totals by outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowCounts {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Outcome of a whole benchmark session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub start_time: DateTime<Utc>,
    /// Equal to `start_time` until [`RunReport::finish`] is called
    pub end_time: DateTime<Utc>,
    /// Summaries in the order they were recorded
    pub benchmarks: Vec<BenchmarkSummary>,
    #[serde(default)]
    pub skipped: Vec<SkippedBenchmark>,
}

impl RunReport {
    /// Begin a report stamped with the current time
    pub fn start() -> Self {
        Self::started_at(Utc::now())
    }

    pub fn started_at(start_time: DateTime<Utc>) -> Self {
        Self {
            start_time,
            end_time: start_time,
            benchmarks: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn record(&mut self, summary: BenchmarkSummary) {
        match summary.status() {
            RunStatus::Success => info!("Flow '{}' succeeded", summary.name),
            RunStatus::Failed => warn!("Flow '{}' failed", summary.name),
        }
        self.benchmarks.push(summary);
    }

    pub fn skip(&mut self, name: impl Into<String>, reason: impl Into<String>) {
        let skipped = SkippedBenchmark {
            name: name.into(),
            reason: reason.into(),
        };
        warn!("Skipping flow '{}': {}", skipped.name, skipped.reason);
        self.skipped.push(skipped);
    }

    /// Stamp the end time with the current time
    pub fn finish(&mut self) {
        self.finish_at(Utc::now());
    }

    pub fn finish_at(&mut self, end_time: DateTime<Utc>) {
        self.end_time = end_time;
    }

    /// Wall-clock length of the session, zero if the clock went backwards
    pub fn duration_ms(&self) -> u64 {
        let ms = (self.end_time - self.start_time).num_milliseconds();
        u64::try_from(ms).unwrap_or(0)
    }

    pub fn counts(&self) -> FlowCounts {
        let failed = self
            .benchmarks
            .iter()
            .filter(|s| s.status() == RunStatus::Failed)
            .count();

        FlowCounts {
            total: self.benchmarks.len() + self.skipped.len(),
            successful: self.benchmarks.len() - failed,
            failed,
            skipped: self.skipped.len(),
        }
    }

    /// `Failed` when any recorded flow failed. Skipped flows do not count.
    pub fn status(&self) -> RunStatus {
        if self.counts().failed > 0 {
            RunStatus::Failed
        } else {
            RunStatus::Success
        }
    }

    /// Process exit code: 1 if any flow failed, 0 otherwise
    pub fn exit_code(&self) -> i32 {
        match self.status() {
            RunStatus::Success => 0,
            RunStatus::Failed => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::test_support;
    use chrono::TimeZone;

    fn failed_summary(name: &str) -> BenchmarkSummary {
        BenchmarkSummary {
            name: name.to_string(),
            successful_runs: 0,
            failed_runs: 10,
            exclusion_rate: 1.0,
            exclusion_rate_passed: false,
            ..test_support::summary()
        }
    }

    #[test]
    fn test_empty_report_succeeds() {
        let report = RunReport::start();

        assert_eq!(report.counts(), FlowCounts::default());
        assert_eq!(report.status(), RunStatus::Success);
        assert_eq!(report.exit_code(), 0);
        assert_eq!(report.duration_ms(), 0);
    }

    #[test]
    fn test_counts_by_outcome() {
        let mut report = RunReport::start();
        report.record(test_support::summary());
        report.record(failed_summary("token-send"));
        report.skip("nft-list-scrolling", "Unknown flow: nft-list-scrolling");

        assert_eq!(
            report.counts(),
            FlowCounts {
                total: 3,
                successful: 1,
                failed: 1,
                skipped: 1,
            }
        );
    }

    #[test]
    fn test_exit_code_is_one_when_any_flow_fails() {
        let mut report = RunReport::start();
        report.record(test_support::summary());
        assert_eq!(report.exit_code(), 0);

        report.record(failed_summary("token-send"));
        assert_eq!(report.status(), RunStatus::Failed);
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn test_skipped_flows_do_not_fail_the_run() {
        let mut report = RunReport::start();
        report.skip("import-srp", "no seed phrase configured");

        assert_eq!(report.counts().skipped, 1);
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn test_duration_from_start_and_end() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut report = RunReport::started_at(start);
        report.finish_at(start + chrono::Duration::milliseconds(90_500));

        assert_eq!(report.duration_ms(), 90_500);

        report.finish_at(start - chrono::Duration::seconds(1));
        assert_eq!(report.duration_ms(), 0);
    }

    #[test]
    fn test_serializes_timestamps_as_rfc3339() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let report = RunReport::started_at(start);

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["start_time"], "2024-01-01T00:00:00Z");
        assert!(value["benchmarks"].as_array().unwrap().is_empty());
    }
}
