//! Percentile calculations for timing samples.
//!
//! All percentiles use linear interpolation between the closest ranks of the
//! sorted sample set, so `p50 <= p75 <= p95 <= p99` always holds.

use std::cmp::Ordering;

/// Sort a copy of `samples` in ascending order.
pub fn sorted_copy(samples: &[f64]) -> Vec<f64> {
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    sorted
}

/// Calculate percentile value from a slice of samples.
///
/// The slice does not need to be sorted. Uses linear interpolation between
/// nearest ranks.
///
/// # Arguments
///
/// * `samples` - Slice of samples (sorted internally on a copy)
/// * `p` - Percentile to calculate (0.0 to 100.0)
///
/// # Returns
///
/// * `Some(value)` - The percentile value
/// * `None` - If samples is empty or p is outside 0..=100
///
/// # Examples
///
/// ```
/// use bench_runner::stats::percentiles::percentile;
///
/// let data = vec![5.0, 1.0, 3.0, 2.0, 4.0];
/// assert_eq!(percentile(&data, 50.0), Some(3.0));
/// ```
pub fn percentile(samples: &[f64], p: f64) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    percentile_sorted(&sorted_copy(samples), p)
}

/// Same as [`percentile`] but expects `sorted` to already be in ascending order.
pub fn percentile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=100.0).contains(&p) {
        return None;
    }

    if sorted.len() == 1 {
        return Some(sorted[0]);
    }

    let rank = (p / 100.0) * (sorted.len() - 1) as f64;
    let lower_index = rank.floor() as usize;
    let upper_index = rank.ceil() as usize;

    if lower_index == upper_index {
        Some(sorted[lower_index])
    } else {
        let lower_value = sorted[lower_index];
        let upper_value = sorted[upper_index];
        let fraction = rank - lower_index as f64;
        Some((lower_value + fraction * (upper_value - lower_value)).min(upper_value))
    }
}

/// Descriptive statistics over one set of samples.
///
/// `std_dev` is the population standard deviation.
#[derive(Debug, Clone, PartialEq)]
pub struct PercentileSummary {
    pub min: f64,
    pub p50: f64, // median
    pub p75: f64,
    pub p95: f64,
    pub p99: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
    pub count: usize,
}

impl PercentileSummary {
    /// Compute summary statistics from samples.
    ///
    /// Returns `None` if `samples` is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use bench_runner::stats::percentiles::PercentileSummary;
    ///
    /// let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
    /// let summary = PercentileSummary::from_samples(&data).unwrap();
    /// assert_eq!(summary.count, 10);
    /// assert_eq!(summary.mean, 5.5);
    /// assert_eq!(summary.min, 1.0);
    /// assert_eq!(summary.max, 10.0);
    /// ```
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let sorted = sorted_copy(samples);
        let count = sorted.len();
        let min = sorted[0];
        let max = sorted[count - 1];

        let mean = sorted.iter().sum::<f64>() / count as f64;

        let variance = if count > 1 {
            sorted.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / count as f64
        } else {
            0.0
        };

        Some(PercentileSummary {
            min,
            p50: percentile_sorted(&sorted, 50.0)?,
            p75: percentile_sorted(&sorted, 75.0)?,
            p95: percentile_sorted(&sorted, 95.0)?,
            p99: percentile_sorted(&sorted, 99.0)?,
            max,
            // Summation order can push the mean an ulp outside [min, max].
            mean: mean.max(min).min(max),
            std_dev: variance.sqrt(),
            count,
        })
    }

    /// Coefficient of variation (std_dev / mean).
    ///
    /// Returns `0.0` when the mean is zero; callers treat that case as
    /// unusable data rather than as zero variance.
    ///
    /// ```
    /// use bench_runner::stats::percentiles::PercentileSummary;
    ///
    /// let data = vec![10.0, 12.0, 14.0, 16.0, 18.0];
    /// let summary = PercentileSummary::from_samples(&data).unwrap();
    /// let cv = summary.coefficient_of_variation();
    /// assert!(cv > 0.0 && cv < 1.0);
    /// ```
    pub fn coefficient_of_variation(&self) -> f64 {
        if self.mean == 0.0 {
            0.0
        } else {
            self.std_dev / self.mean
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentile_empty_samples() {
        assert_eq!(percentile(&[], 50.0), None);
    }

    #[test]
    fn test_percentile_single_sample() {
        let samples = vec![42.0];
        assert_eq!(percentile(&samples, 0.0), Some(42.0));
        assert_eq!(percentile(&samples, 99.0), Some(42.0));
        assert_eq!(percentile(&samples, 100.0), Some(42.0));
    }

    #[test]
    fn test_percentile_invalid_p() {
        let samples = vec![1.0, 2.0, 3.0];
        assert_eq!(percentile(&samples, -1.0), None);
        assert_eq!(percentile(&samples, 101.0), None);
        assert_eq!(percentile(&samples, f64::NAN), None);
    }

    #[test]
    fn test_percentile_with_interpolation() {
        let samples = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];

        let p25 = percentile(&samples, 25.0).unwrap();
        assert!((p25 - 3.25).abs() < 1e-10);

        let p75 = percentile(&samples, 75.0).unwrap();
        assert!((p75 - 7.75).abs() < 1e-10);

        let p95 = percentile(&samples, 95.0).unwrap();
        assert!((p95 - 9.55).abs() < 1e-10);
    }

    #[test]
    fn test_percentile_sorted_matches_unsorted() {
        let unsorted = vec![9.0, 3.0, 7.0, 1.0, 5.0];
        let sorted = sorted_copy(&unsorted);
        assert_eq!(sorted, vec![1.0, 3.0, 5.0, 7.0, 9.0]);
        for p in [0.0, 10.0, 50.0, 75.0, 99.0, 100.0] {
            assert_eq!(percentile(&unsorted, p), percentile_sorted(&sorted, p));
        }
    }

    #[test]
    fn test_percentile_summary_empty() {
        assert!(PercentileSummary::from_samples(&[]).is_none());
    }

    #[test]
    fn test_percentile_summary_single_sample() {
        let summary = PercentileSummary::from_samples(&[42.0]).unwrap();

        assert_eq!(summary.count, 1);
        assert_eq!(summary.min, 42.0);
        assert_eq!(summary.max, 42.0);
        assert_eq!(summary.mean, 42.0);
        assert_eq!(summary.std_dev, 0.0);
        assert_eq!(summary.p50, 42.0);
        assert_eq!(summary.p99, 42.0);
    }

    #[test]
    fn test_percentile_summary_population_std_dev() {
        // Population variance = (9+1+1+1+0+0+4+16)/8 = 4.0
        let samples = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let summary = PercentileSummary::from_samples(&samples).unwrap();

        assert_eq!(summary.mean, 5.0);
        assert!((summary.std_dev - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_percentile_summary_is_ordered() {
        let samples = vec![10.0, 1.0, 5.0, 3.0, 8.0, 2.0, 9.0, 4.0, 7.0, 6.0];
        let summary = PercentileSummary::from_samples(&samples).unwrap();

        assert!(summary.min <= summary.p50);
        assert!(summary.p50 <= summary.p75);
        assert!(summary.p75 <= summary.p95);
        assert!(summary.p95 <= summary.p99);
        assert!(summary.p99 <= summary.max);
    }

    #[test]
    fn test_coefficient_of_variation_zero_mean() {
        let summary = PercentileSummary::from_samples(&[0.0, 0.0, 0.0]).unwrap();
        assert_eq!(summary.mean, 0.0);
        assert_eq!(summary.coefficient_of_variation(), 0.0);
    }

    #[test]
    fn test_coefficient_of_variation_constant_samples() {
        let summary = PercentileSummary::from_samples(&[100.0; 5]).unwrap();
        assert_eq!(summary.coefficient_of_variation(), 0.0);
    }
}
