//! Per-timer statistics with outlier removal and quality rating.

use serde::{Deserialize, Serialize};

use super::outliers::OutlierResult;
use super::percentiles::PercentileSummary;
use super::quality::{DataQuality, StatsConfig};
use crate::error::{BenchError, Result};

/// Statistical summary for one timer id across all successful iterations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerStatistics {
    /// Timer identifier
    pub id: String,
    /// Mean duration in milliseconds
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Population standard deviation
    pub std_dev: f64,
    /// Coefficient of variation (std_dev / mean), 0 when the mean is 0
    pub cv: f64,
    pub p50: f64,
    pub p75: f64,
    pub p95: f64,
    pub p99: f64,
    /// Samples used after outlier removal
    pub samples: usize,
    /// Samples removed as outliers
    pub outliers: usize,
    pub data_quality: DataQuality,
}

impl TimerStatistics {
    /// Statistics for a timer that produced no usable samples.
    pub fn empty(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            mean: 0.0,
            min: 0.0,
            max: 0.0,
            std_dev: 0.0,
            cv: 0.0,
            p50: 0.0,
            p75: 0.0,
            p95: 0.0,
            p99: 0.0,
            samples: 0,
            outliers: 0,
            data_quality: DataQuality::Unreliable,
        }
    }

    /// Raw sample count before outlier removal.
    pub fn total_samples(&self) -> usize {
        self.samples + self.outliers
    }
}

/// Compute statistics for `id` over raw `durations` in milliseconds.
///
/// Outliers are removed with the IQR method before any other figure is
/// computed. An empty slice yields [`TimerStatistics::empty`].
///
/// # Errors
///
/// Returns [`BenchError::InvalidDuration`] if any duration is negative, NaN,
/// or infinite.
///
/// # Examples
///
/// ```
/// use bench_runner::stats::{calculate_timer_statistics, DataQuality, StatsConfig};
///
/// let durations = [100.0, 102.0, 98.0, 101.0, 99.0, 100.0, 400.0];
/// let stats = calculate_timer_statistics("render", &durations, &StatsConfig::default()).unwrap();
/// assert_eq!(stats.outliers, 1);
/// assert_eq!(stats.samples, 6);
/// assert_eq!(stats.data_quality, DataQuality::Good);
/// ```
pub fn calculate_timer_statistics(
    id: &str,
    durations: &[f64],
    config: &StatsConfig,
) -> Result<TimerStatistics> {
    if let Some((index, &value)) = durations
        .iter()
        .enumerate()
        .find(|&(_, &d)| !d.is_finite() || d < 0.0)
    {
        return Err(BenchError::InvalidDuration {
            timer: id.to_string(),
            index,
            value,
        });
    }

    let outlier_result = OutlierResult::detect_with_multiplier(durations, config.iqr_multiplier);
    let Some(outlier_result) = outlier_result else {
        return Ok(TimerStatistics::empty(id));
    };

    let clean = outlier_result.clean_samples(durations);
    let outliers = outlier_result.count();

    let Some(summary) = PercentileSummary::from_samples(&clean) else {
        return Ok(TimerStatistics {
            outliers,
            ..TimerStatistics::empty(id)
        });
    };

    let cv = summary.coefficient_of_variation();
    let data_quality = config.classify(summary.count, outliers, summary.mean, cv);

    Ok(TimerStatistics {
        id: id.to_string(),
        mean: summary.mean,
        min: summary.min,
        max: summary.max,
        std_dev: summary.std_dev,
        cv,
        p50: summary.p50,
        p75: summary.p75,
        p95: summary.p95,
        p99: summary.p99,
        samples: summary.count,
        outliers,
        data_quality,
    })
}
