//! Property-based tests for the statistics engine and exclusion gate.

use bench_runner::{calculate_timer_statistics, check_exclusion_rate, DataQuality, StatsConfig};
use proptest::prelude::*;

fn durations_strategy() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.0f64..10_000.0, 0..60)
}

proptest! {
    /// Every input sample is either used or counted as an outlier.
    #[test]
    fn prop_samples_plus_outliers_is_input_len(durations in durations_strategy()) {
        let stats = calculate_timer_statistics("t", &durations, &StatsConfig::default()).unwrap();
        prop_assert_eq!(stats.samples + stats.outliers, durations.len());
    }

    #[test]
    fn prop_percentiles_are_ordered(durations in durations_strategy()) {
        let stats = calculate_timer_statistics("t", &durations, &StatsConfig::default()).unwrap();
        prop_assert!(stats.p50 <= stats.p75);
        prop_assert!(stats.p75 <= stats.p95);
        prop_assert!(stats.p95 <= stats.p99);
    }

    #[test]
    fn prop_mean_within_range(durations in prop::collection::vec(0.0f64..10_000.0, 1..60)) {
        let stats = calculate_timer_statistics("t", &durations, &StatsConfig::default()).unwrap();
        prop_assert!(stats.samples > 0);
        prop_assert!(stats.min <= stats.mean);
        prop_assert!(stats.mean <= stats.max);
    }

    #[test]
    fn prop_calculation_is_idempotent(durations in durations_strategy()) {
        let config = StatsConfig::default();
        let before = durations.clone();
        let first = calculate_timer_statistics("t", &durations, &config).unwrap();
        let second = calculate_timer_statistics("t", &durations, &config).unwrap();
        prop_assert_eq!(first, second);
        prop_assert_eq!(durations, before);
    }

    #[test]
    fn prop_zero_mean_is_never_trusted(len in 1usize..30) {
        let config = StatsConfig::default();
        let stats = calculate_timer_statistics("t", &vec![0.0; len], &config).unwrap();
        prop_assert_eq!(stats.cv, 0.0);
        prop_assert_eq!(stats.data_quality, DataQuality::Unreliable);
    }

    #[test]
    fn prop_exclusion_rate_bounds(
        total in 1usize..1000,
        excluded_pct in 0usize..=100,
        max_rate in 0.0f64..=1.0
    ) {
        let excluded = total * excluded_pct / 100;
        let check = check_exclusion_rate(total, excluded, max_rate);
        prop_assert!((0.0..=1.0).contains(&check.rate));
        prop_assert_eq!(check.passed, check.rate <= max_rate);
    }
}

#[test]
fn test_empty_durations_are_unreliable() {
    let stats = calculate_timer_statistics("t", &[], &StatsConfig::default()).unwrap();
    assert_eq!(stats.samples, 0);
    assert_eq!(stats.data_quality, DataQuality::Unreliable);
}

#[test]
fn test_exclusion_examples() {
    let empty = check_exclusion_rate(0, 0, 0.2);
    assert!(empty.passed);
    assert_eq!(empty.rate, 0.0);

    let over = check_exclusion_rate(10, 3, 0.2);
    assert!(!over.passed);
    assert!((over.rate - 0.3).abs() < 1e-12);
}

#[test]
fn test_extreme_outlier_among_twenty() {
    let mut durations: Vec<f64> = (0..19).map(|i| 250.0 + (i % 7) as f64).collect();
    durations.push(2500.0);

    let stats = calculate_timer_statistics("send", &durations, &StatsConfig::default()).unwrap();
    let kept = &durations[..19];
    let mean = kept.iter().sum::<f64>() / 19.0;

    assert_eq!(stats.outliers, 1);
    assert_eq!(stats.samples, 19);
    assert!((stats.mean - mean).abs() < 1e-9);
    assert!(stats.max < 2500.0);
}
