//! Configuration parsing for benchmark runs
//!
//! This module provides TOML-based configuration for the iteration runner,
//! the statistics engine, and the per-metric thresholds consumed by
//! downstream reporting.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::BenchError;
use crate::exclusion::MAX_EXCLUSION_RATE;
use crate::runner::RunnerConfig;
use crate::stats::StatsConfig;

/// Upper bound on `runner.iterations`
pub const MAX_ITERATIONS: u32 = 100_000;

/// Main configuration structure loaded from TOML files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Iteration and retry settings
    #[serde(default)]
    pub runner: RunnerSettings,
    /// Outlier filtering and data quality settings
    #[serde(default)]
    pub quality: StatsConfig,
    /// Multiplier applied to every threshold when running in CI (default: 1.0)
    #[serde(default = "default_ci_multiplier")]
    pub ci_multiplier: f64,
    /// Warn/fail thresholds keyed by metric name
    #[serde(default)]
    pub thresholds: BTreeMap<String, ThresholdConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            runner: RunnerSettings::default(),
            quality: StatsConfig::default(),
            ci_multiplier: default_ci_multiplier(),
            thresholds: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Load and validate configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML is malformed
    /// - A value is out of range (see [`Config::validate`])
    ///
    /// # Example
    ///
    /// ```no_run
    /// use bench_runner::config::Config;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let config = Config::from_file("benchmark.toml")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
    }

    /// Parse and validate configuration from a TOML string
    ///
    /// # Example
    ///
    /// ```
    /// use bench_runner::config::Config;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let toml = r#"
    ///     [runner]
    ///     iterations = 20
    ///     retries = 3
    ///
    ///     [thresholds.loadNewAccount]
    ///     warn_p75 = 500.0
    ///     fail_p95 = 1500.0
    /// "#;
    /// let config = Config::from_str(toml)?;
    /// assert_eq!(config.runner.iterations, 20);
    /// # Ok(())
    /// # }
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(s).context("Failed to parse TOML configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the runner cannot work with.
    pub fn validate(&self) -> Result<(), BenchError> {
        if self.runner.iterations > MAX_ITERATIONS {
            return Err(BenchError::InvalidConfig(format!(
                "runner.iterations must be at most {}, got {}",
                MAX_ITERATIONS, self.runner.iterations
            )));
        }

        let rate = self.runner.max_exclusion_rate;
        if !(0.0..=1.0).contains(&rate) {
            return Err(BenchError::InvalidConfig(format!(
                "runner.max_exclusion_rate must be within 0..=1, got {}",
                rate
            )));
        }

        let q = &self.quality;
        if q.iqr_multiplier.is_nan() || q.iqr_multiplier <= 0.0 {
            return Err(BenchError::InvalidConfig(format!(
                "quality.iqr_multiplier must be positive, got {}",
                q.iqr_multiplier
            )));
        }
        for (key, value) in [("good_cv", q.good_cv), ("unreliable_cv", q.unreliable_cv)] {
            if !value.is_finite() || value < 0.0 {
                return Err(BenchError::InvalidConfig(format!(
                    "quality.{} must be a finite non-negative number, got {}",
                    key, value
                )));
            }
        }
        if q.good_cv > q.unreliable_cv {
            return Err(BenchError::InvalidConfig(format!(
                "quality.good_cv ({}) must not exceed quality.unreliable_cv ({})",
                q.good_cv, q.unreliable_cv
            )));
        }
        if !(0.0..=1.0).contains(&q.max_outlier_fraction) {
            return Err(BenchError::InvalidConfig(format!(
                "quality.max_outlier_fraction must be within 0..=1, got {}",
                q.max_outlier_fraction
            )));
        }

        if self.ci_multiplier.is_nan() || self.ci_multiplier <= 0.0 {
            return Err(BenchError::InvalidConfig(format!(
                "ci_multiplier must be positive, got {}",
                self.ci_multiplier
            )));
        }

        Ok(())
    }

    /// Build the runner settings described by this configuration
    pub fn runner_config(&self) -> RunnerConfig {
        RunnerConfig {
            retry_delay: self.runner.retry_delay,
            max_exclusion_rate: self.runner.max_exclusion_rate,
            stats: self.quality.clone(),
        }
    }
}

/// Iteration and retry parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerSettings {
    /// Number of iterations per benchmark (default: 10)
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    /// Extra attempts allowed per iteration (default: 2)
    #[serde(default = "default_retries")]
    pub retries: u32,
    /// Delay between attempts in milliseconds (default: 1000)
    #[serde(
        default = "default_retry_delay",
        rename = "retry_delay_ms",
        with = "duration_ms"
    )]
    pub retry_delay: Duration,
    /// Ceiling on failed iterations and per-timer outliers (default: 0.2)
    #[serde(default = "default_max_exclusion_rate")]
    pub max_exclusion_rate: f64,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            retries: default_retries(),
            retry_delay: default_retry_delay(),
            max_exclusion_rate: default_max_exclusion_rate(),
        }
    }
}

fn default_iterations() -> u32 {
    10
}

fn default_retries() -> u32 {
    2
}

fn default_retry_delay() -> Duration {
    crate::runner::DEFAULT_RETRY_DELAY
}

fn default_max_exclusion_rate() -> f64 {
    MAX_EXCLUSION_RATE
}

fn default_ci_multiplier() -> f64 {
    1.0
}

/// Warn/fail bounds for one metric, in milliseconds.
///
/// Reporting compares these against a timer's p75 and p95, scaled by
/// [`Config::ci_multiplier`] in CI. Unset bounds are not checked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    pub warn_p75: Option<f64>,
    pub fail_p75: Option<f64>,
    pub warn_p95: Option<f64>,
    pub fail_p95: Option<f64>,
}

/// Serde module for serializing/deserializing Duration as milliseconds
mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let ms = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(ms))
    }
}
