//! Statistical analysis of timer samples
//!
//! This module turns the raw durations collected for one timer into a
//! [`TimerStatistics`] value: IQR outlier removal, percentiles, mean and
//! standard deviation, and a data quality rating.
//!
//! # Examples
//!
//! ```
//! use bench_runner::stats::{OutlierResult, PercentileSummary};
//!
//! let samples = vec![10.0, 11.0, 10.5, 11.5, 12.0, 11.0, 150.0];
//!
//! let outliers = OutlierResult::detect(&samples).unwrap();
//! let filtered = outliers.clean_samples(&samples);
//!
//! let summary = PercentileSummary::from_samples(&filtered).unwrap();
//! println!("Median: {}, p95: {}", summary.p50, summary.p95);
//! ```

pub mod outliers;
pub mod percentiles;
pub mod quality;
pub mod timer;

pub use outliers::OutlierResult;
pub use percentiles::{percentile, PercentileSummary};
pub use quality::{DataQuality, StatsConfig};
pub use timer::{calculate_timer_statistics, TimerStatistics};
