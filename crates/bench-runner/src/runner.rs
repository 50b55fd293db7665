//! Benchmark iteration and retry orchestration
//!
//! This module runs a caller-supplied benchmark function a fixed number of
//! times, retries failed attempts, and aggregates the timers of successful
//! iterations into a [`BenchmarkSummary`].
//!
//! # Execution model
//!
//! Iterations run strictly one after another on the calling task, and the
//! attempts of one iteration run in order.
//!
//! ```text
//!  iteration 0          iteration 1          iteration N-1
//! ┌─────────────┐      ┌─────────────┐      ┌─────────────┐
//! │ attempt 1 ✗ │      │ attempt 1 ✓ │      │ attempt 1 ✗ │
//! │   (delay)   │ ───▶ │             │ ───▶ │   (delay)   │ ───▶ aggregate
//! │ attempt 2 ✓ │      │             │      │ attempt 2 ✗ │
//! └─────────────┘      └─────────────┘      └─────────────┘
//!    succeeded            succeeded             failed
//! ```
//!
//! # Example
//!
//! ```no_run
//! use bench_runner::runner::{run_benchmark_with_iterations, BenchmarkRunResult, TimerSample};
//!
//! # async fn example() -> bench_runner::Result<()> {
//! let summary = run_benchmark_with_iterations(
//!     "account-switch",
//!     || async { BenchmarkRunResult::success(vec![TimerSample::new("switch", 120.0)]) },
//!     10,
//!     2,
//! )
//! .await?;
//!
//! for timer in &summary.timers {
//!     println!("{}: p75={:.0}ms ({})", timer.id, timer.p75, timer.data_quality);
//! }
//! # Ok(())
//! # }
//! ```

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::error::Result;
use crate::exclusion::{check_exclusion_rate, MAX_EXCLUSION_RATE};
use crate::stats::{calculate_timer_statistics, DataQuality, StatsConfig, TimerStatistics};

/// Delay between attempts of the same iteration unless configured otherwise.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(1000);

/// One completed timer measurement within an iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSample {
    /// Timer identifier
    pub id: String,
    /// Duration in milliseconds
    pub duration: f64,
}

impl TimerSample {
    pub fn new(id: impl Into<String>, duration: f64) -> Self {
        Self {
            id: id.into(),
            duration,
        }
    }
}

/// Outcome of a single benchmark attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRunResult {
    /// Timers recorded during the attempt, in completion order
    pub timers: Vec<TimerSample>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BenchmarkRunResult {
    pub fn success(timers: Vec<TimerSample>) -> Self {
        Self {
            timers,
            success: true,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            timers: Vec::new(),
            success: false,
            error: Some(error.into()),
        }
    }

    /// A failed attempt that still recorded some timers before failing.
    pub fn partial_failure(timers: Vec<TimerSample>, error: impl Into<String>) -> Self {
        Self {
            timers,
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Final state of one iteration after its retries.
#[derive(Debug, Clone, PartialEq)]
pub enum IterationOutcome {
    /// An attempt succeeded; `retries_used` attempts failed before it.
    Succeeded {
        result: BenchmarkRunResult,
        retries_used: u32,
        /// `"Attempt N: <error>"` for each attempt that failed first
        attempt_errors: Vec<String>,
    },
    /// Every attempt failed; `last_result` is the final attempt.
    Failed {
        last_result: BenchmarkRunResult,
        retries_used: u32,
        attempt_errors: Vec<String>,
    },
}

impl IterationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, IterationOutcome::Succeeded { .. })
    }

    pub fn retries_used(&self) -> u32 {
        match self {
            IterationOutcome::Succeeded { retries_used, .. }
            | IterationOutcome::Failed { retries_used, .. } => *retries_used,
        }
    }

    pub fn attempt_errors(&self) -> &[String] {
        match self {
            IterationOutcome::Succeeded { attempt_errors, .. }
            | IterationOutcome::Failed { attempt_errors, .. } => attempt_errors,
        }
    }
}

/// Overall status of a benchmark run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Success,
    Failed,
}

/// Aggregate over all iterations of one benchmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkSummary {
    /// Benchmark name
    pub name: String,
    /// Iterations requested
    pub iterations: u32,
    pub successful_runs: u32,
    pub failed_runs: u32,
    /// One entry per timer id, in the order the ids were first seen
    pub timers: Vec<TimerStatistics>,
    /// ISO-8601 time the summary was aggregated
    pub timestamp: String,
    /// Timers downgraded to unreliable by the per-timer exclusion gate
    pub excluded_due_to_quality: u32,
    /// Whether the failed-iteration rate is within the ceiling
    pub exclusion_rate_passed: bool,
    /// failed_runs / iterations
    pub exclusion_rate: f64,
    /// Most retries consumed by any single iteration
    pub retries_used: u32,
    /// Retry budget per iteration
    pub total_retries: u32,
    /// Attempt errors of iterations that exhausted their retries
    pub errors: Vec<String>,
    /// Attempt errors of iterations that recovered on a retry
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl BenchmarkSummary {
    /// `Failed` when nothing succeeded or too many iterations failed.
    pub fn status(&self) -> RunStatus {
        if self.successful_runs == 0 || !self.exclusion_rate_passed {
            RunStatus::Failed
        } else {
            RunStatus::Success
        }
    }

    pub fn timer(&self, id: &str) -> Option<&TimerStatistics> {
        self.timers.iter().find(|t| t.id == id)
    }

    /// Number of timers whose final rating is unreliable.
    pub fn unreliable_timers(&self) -> usize {
        self.timers
            .iter()
            .filter(|t| t.data_quality == DataQuality::Unreliable)
            .count()
    }
}

/// Settings for [`BenchmarkRunner`].
#[derive(Debug, Clone, PartialEq)]
pub struct RunnerConfig {
    /// Pause between attempts of the same iteration
    pub retry_delay: Duration,
    /// Ceiling used by both exclusion-rate gates
    pub max_exclusion_rate: f64,
    /// Outlier and quality settings for timer statistics
    pub stats: StatsConfig,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            retry_delay: DEFAULT_RETRY_DELAY,
            max_exclusion_rate: MAX_EXCLUSION_RATE,
            stats: StatsConfig::default(),
        }
    }
}

/// Runs benchmark functions and aggregates their timers.
#[derive(Debug, Clone, Default)]
pub struct BenchmarkRunner {
    config: RunnerConfig,
}

impl BenchmarkRunner {
    /// Create a runner with the default settings
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RunnerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Run `benchmark_fn` for `iterations` iterations with up to `retries`
    /// extra attempts each.
    ///
    /// Failed attempts are data, not errors: they are retried, then counted
    /// in `failed_runs`. Only timers from successful iterations are
    /// aggregated.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::InvalidDuration`](crate::BenchError::InvalidDuration)
    /// if a successful iteration reported a negative or non-finite duration.
    #[instrument(skip(self, benchmark_fn), fields(benchmark = %name))]
    pub async fn run<F, Fut>(
        &self,
        name: &str,
        mut benchmark_fn: F,
        iterations: u32,
        retries: u32,
    ) -> Result<BenchmarkSummary>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = BenchmarkRunResult>,
    {
        info!(
            "Starting benchmark '{}' with {} iterations ({} retries each)",
            name, iterations, retries
        );

        let mut outcomes = Vec::new();
        for iteration in 0..iterations {
            outcomes.push(self.run_iteration(iteration, retries, &mut benchmark_fn).await);
        }

        let summary = self.aggregate(name, iterations, retries, outcomes)?;

        if summary.status() == RunStatus::Success {
            info!(
                "Benchmark '{}' completed: {}/{} iterations succeeded, {} timers",
                name,
                summary.successful_runs,
                iterations,
                summary.timers.len()
            );
        } else {
            warn!(
                "Benchmark '{}' failed: {}/{} iterations failed (rate {:.2})",
                name, summary.failed_runs, iterations, summary.exclusion_rate
            );
        }

        Ok(summary)
    }

    /// Run one iteration, retrying while the attempt reports failure.
    #[instrument(skip(self, benchmark_fn), fields(iteration = %iteration))]
    async fn run_iteration<F, Fut>(
        &self,
        iteration: u32,
        retries: u32,
        benchmark_fn: &mut F,
    ) -> IterationOutcome
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = BenchmarkRunResult>,
    {
        let mut attempt_errors = Vec::new();
        let mut attempt = 0;

        loop {
            debug!("Running attempt {}", attempt + 1);
            let result = benchmark_fn().await;

            if result.success {
                return IterationOutcome::Succeeded {
                    result,
                    retries_used: attempt,
                    attempt_errors,
                };
            }

            let message = result
                .error
                .as_deref()
                .unwrap_or("benchmark reported failure");
            warn!("Attempt {} failed: {}", attempt + 1, message);
            attempt_errors.push(format!("Attempt {}: {}", attempt + 1, message));

            if attempt >= retries {
                return IterationOutcome::Failed {
                    last_result: result,
                    retries_used: attempt,
                    attempt_errors,
                };
            }

            attempt += 1;
            if !self.config.retry_delay.is_zero() {
                tokio::time::sleep(self.config.retry_delay).await;
            }
        }
    }

    /// Fold iteration outcomes into a summary.
    fn aggregate(
        &self,
        name: &str,
        iterations: u32,
        retries: u32,
        outcomes: Vec<IterationOutcome>,
    ) -> Result<BenchmarkSummary> {
        let retries_used = outcomes
            .iter()
            .map(IterationOutcome::retries_used)
            .max()
            .unwrap_or(0);

        let mut order: Vec<String> = Vec::new();
        let mut durations: HashMap<String, Vec<f64>> = HashMap::new();
        let mut successful_runs = 0;
        let mut failed_runs = 0;
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        for (iteration, outcome) in outcomes.into_iter().enumerate() {
            let label = |e: String| format!("Iteration {}: {}", iteration + 1, e);
            match outcome {
                IterationOutcome::Succeeded {
                    result,
                    attempt_errors,
                    ..
                } => {
                    successful_runs += 1;
                    warnings.extend(attempt_errors.into_iter().map(label));
                    for sample in result.timers {
                        if !durations.contains_key(&sample.id) {
                            order.push(sample.id.clone());
                        }
                        durations.entry(sample.id).or_default().push(sample.duration);
                    }
                }
                IterationOutcome::Failed {
                    last_result,
                    attempt_errors,
                    ..
                } => {
                    failed_runs += 1;
                    errors.extend(attempt_errors.into_iter().map(label));
                    debug!(
                        "Discarding {} timers from failed iteration",
                        last_result.timers.len()
                    );
                }
            }
        }

        let mut timers = Vec::with_capacity(order.len());
        let mut excluded_due_to_quality = 0;

        for id in order {
            let raw = durations.remove(&id).unwrap_or_default();
            let mut stats = calculate_timer_statistics(&id, &raw, &self.config.stats)?;

            let gate =
                check_exclusion_rate(raw.len(), stats.outliers, self.config.max_exclusion_rate);
            if !gate.passed && stats.data_quality != DataQuality::Unreliable {
                warn!(
                    "Timer '{}' excluded {:.0}% of samples as outliers, marking unreliable",
                    id,
                    gate.rate * 100.0
                );
                stats.data_quality = DataQuality::Unreliable;
                excluded_due_to_quality += 1;
            }

            timers.push(stats);
        }

        let global = check_exclusion_rate(
            iterations as usize,
            failed_runs as usize,
            self.config.max_exclusion_rate,
        );

        Ok(BenchmarkSummary {
            name: name.to_string(),
            iterations,
            successful_runs,
            failed_runs,
            timers,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            excluded_due_to_quality,
            exclusion_rate_passed: global.passed,
            exclusion_rate: global.rate,
            retries_used,
            total_retries: retries,
            errors,
            warnings,
        })
    }
}

/// Run a benchmark with the default [`RunnerConfig`].
///
/// See [`BenchmarkRunner::run`].
pub async fn run_benchmark_with_iterations<F, Fut>(
    name: &str,
    benchmark_fn: F,
    iterations: u32,
    retries: u32,
) -> Result<BenchmarkSummary>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = BenchmarkRunResult>,
{
    BenchmarkRunner::new()
        .run(name, benchmark_fn, iterations, retries)
        .await
}
