//! Timing statistics and retrying iteration runner for flow benchmarks
//!
//! This crate runs a timed flow many times, retries flaky attempts, and
//! reduces the collected timers to per-timer statistics that downstream
//! tooling can compare against thresholds.
//!
//! # Features
//!
//! - **Statistical Analysis**: Percentiles, IQR outlier removal, and coefficient of variation
//! - **Data Quality**: Each timer is rated `good`, `poor` or `unreliable`
//! - **Bounded Retries**: Failed attempts are retried with a fixed delay and counted, never raised
//! - **Exclusion Gates**: Per-timer and per-benchmark limits on discarded data
//! - **Run Reports**: Several benchmarks collected into one report with an exit code
//! - **Multiple Output Formats**: JSON and Console reports
//!
//! # Example
//!
//! ```no_run
//! use bench_runner::{
//!     BenchmarkRunResult, BenchmarkRunner, Config, OutputFormat, Reporter, TimerSample,
//! };
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::from_file("benchmark.toml")?;
//! let runner = BenchmarkRunner::with_config(config.runner_config());
//!
//! let summary = runner
//!     .run(
//!         "token-send",
//!         || async { BenchmarkRunResult::success(vec![TimerSample::new("confirm", 310.0)]) },
//!         config.runner.iterations,
//!         config.runner.retries,
//!     )
//!     .await?;
//!
//! Reporter::new(OutputFormat::Console).report(&summary)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! ci_multiplier = 1.5
//!
//! [runner]
//! iterations = 10
//! retries = 2
//! retry_delay_ms = 1000
//! max_exclusion_rate = 0.2
//!
//! [quality]
//! iqr_multiplier = 1.5
//! good_cv = 0.15
//! unreliable_cv = 0.5
//! min_samples = 5
//! max_outlier_fraction = 0.3
//!
//! [thresholds.loadNewAccount]
//! warn_p75 = 500.0
//! fail_p95 = 1500.0
//! ```

pub mod config;
pub mod error;
pub mod exclusion;
pub mod reporter;
pub mod run_report;
pub mod runner;
pub mod stats;

// Re-export main types for convenience
pub use config::{Config, ThresholdConfig};
pub use error::{BenchError, Result};
pub use exclusion::{check_exclusion_rate, ExclusionCheck, MAX_EXCLUSION_RATE};
pub use reporter::{OutputFormat, Reporter};
pub use run_report::{FlowCounts, RunReport, SkippedBenchmark};
pub use runner::{
    run_benchmark_with_iterations, BenchmarkRunResult, BenchmarkRunner, BenchmarkSummary,
    IterationOutcome, RunStatus, RunnerConfig, TimerSample,
};
pub use stats::{calculate_timer_statistics, DataQuality, StatsConfig, TimerStatistics};
