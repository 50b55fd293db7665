//! Exclusion-rate gate.
//!
//! Decides whether the share of discarded work is acceptable. The runner
//! applies it per timer (outliers over raw samples) and per benchmark
//! (failed iterations over requested iterations).

use serde::{Deserialize, Serialize};

/// Default ceiling on the share of excluded samples or iterations.
pub const MAX_EXCLUSION_RATE: f64 = 0.2;

/// Result of an exclusion-rate check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExclusionCheck {
    /// Whether `rate <= max_rate`
    pub passed: bool,
    /// `excluded / total`, 0 when `total` is 0
    pub rate: f64,
}

/// Check `excluded` out of `total` against `max_rate` (0..=1).
///
/// A zero total has nothing to exclude and always passes.
///
/// ```
/// use bench_runner::exclusion::check_exclusion_rate;
///
/// let check = check_exclusion_rate(10, 3, 0.2);
/// assert!(!check.passed);
/// assert!((check.rate - 0.3).abs() < 1e-12);
/// ```
pub fn check_exclusion_rate(total: usize, excluded: usize, max_rate: f64) -> ExclusionCheck {
    if total == 0 {
        return ExclusionCheck {
            passed: true,
            rate: 0.0,
        };
    }

    let rate = excluded as f64 / total as f64;
    ExclusionCheck {
        passed: rate <= max_rate,
        rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_total_passes() {
        assert_eq!(
            check_exclusion_rate(0, 0, MAX_EXCLUSION_RATE),
            ExclusionCheck {
                passed: true,
                rate: 0.0
            }
        );
    }

    #[test]
    fn test_rate_above_ceiling_fails() {
        let check = check_exclusion_rate(10, 3, 0.2);
        assert!(!check.passed);
        assert_eq!(check.rate, 0.3);
    }

    #[test]
    fn test_rate_at_ceiling_passes() {
        let check = check_exclusion_rate(10, 2, 0.2);
        assert!(check.passed);
        assert_eq!(check.rate, 0.2);
    }

    #[test]
    fn test_nothing_excluded() {
        let check = check_exclusion_rate(25, 0, 0.0);
        assert!(check.passed);
        assert_eq!(check.rate, 0.0);
    }

    #[test]
    fn test_everything_excluded() {
        let check = check_exclusion_rate(3, 3, MAX_EXCLUSION_RATE);
        assert!(!check.passed);
        assert_eq!(check.rate, 1.0);
    }
}
