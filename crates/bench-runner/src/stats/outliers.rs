//! Outlier detection for timing samples.
//!
//! Uses the Interquartile Range (IQR) method with a configurable fence
//! multiplier (1.5 by default).

use super::percentiles::{percentile_sorted, sorted_copy};

/// Default multiplier applied to the IQR when building the fences.
pub const DEFAULT_IQR_MULTIPLIER: f64 = 1.5;

/// Minimum number of samples needed before any value is flagged.
const MIN_SAMPLES_FOR_IQR: usize = 4;

/// Outlier detection using the Interquartile Range (IQR) method.
///
/// Outliers are points that fall outside
/// `[Q1 - k*IQR, Q3 + k*IQR]`, where `IQR = Q3 - Q1`.
#[derive(Debug, Clone)]
pub struct OutlierResult {
    /// Indices of detected outliers in the original sample slice
    pub outlier_indices: Vec<usize>,
    /// Lower fence (Q1 - k*IQR)
    pub lower_fence: f64,
    /// Upper fence (Q3 + k*IQR)
    pub upper_fence: f64,
    /// First quartile (25th percentile)
    pub q1: f64,
    /// Third quartile (75th percentile)
    pub q3: f64,
    /// Interquartile range (Q3 - Q1)
    pub iqr: f64,
}

impl OutlierResult {
    /// Detect outliers with the default 1.5x multiplier.
    ///
    /// Returns `None` if `samples` is empty.
    ///
    /// ```
    /// use bench_runner::stats::outliers::OutlierResult;
    ///
    /// let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
    /// let result = OutlierResult::detect(&data).unwrap();
    /// assert_eq!(result.outlier_indices, vec![5]);
    /// ```
    pub fn detect(samples: &[f64]) -> Option<Self> {
        Self::detect_with_multiplier(samples, DEFAULT_IQR_MULTIPLIER)
    }

    /// Detect outliers using `multiplier` as the fence width in IQRs.
    ///
    /// With fewer than four samples the fences are infinite and nothing is
    /// flagged.
    pub fn detect_with_multiplier(samples: &[f64], multiplier: f64) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let sorted = sorted_copy(samples);
        let q1 = percentile_sorted(&sorted, 25.0)?;
        let q3 = percentile_sorted(&sorted, 75.0)?;
        let iqr = q3 - q1;

        if samples.len() < MIN_SAMPLES_FOR_IQR {
            return Some(OutlierResult {
                outlier_indices: Vec::new(),
                lower_fence: f64::NEG_INFINITY,
                upper_fence: f64::INFINITY,
                q1,
                q3,
                iqr,
            });
        }

        let lower_fence = q1 - multiplier * iqr;
        let upper_fence = q3 + multiplier * iqr;

        let outlier_indices = samples
            .iter()
            .enumerate()
            .filter(|&(_, &value)| value < lower_fence || value > upper_fence)
            .map(|(i, _)| i)
            .collect();

        Some(OutlierResult {
            outlier_indices,
            lower_fence,
            upper_fence,
            q1,
            q3,
            iqr,
        })
    }

    /// Samples with outliers removed, in their original order.
    ///
    /// `samples` must be the same slice passed to `detect`.
    pub fn clean_samples(&self, samples: &[f64]) -> Vec<f64> {
        let mut keep = vec![true; samples.len()];
        for &i in &self.outlier_indices {
            if let Some(slot) = keep.get_mut(i) {
                *slot = false;
            }
        }

        samples
            .iter()
            .zip(keep)
            .filter_map(|(&value, keep)| keep.then_some(value))
            .collect()
    }

    /// Number of samples flagged as outliers.
    pub fn count(&self) -> usize {
        self.outlier_indices.len()
    }

    pub fn has_outliers(&self) -> bool {
        !self.outlier_indices.is_empty()
    }
}
