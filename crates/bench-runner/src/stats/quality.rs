//! Data quality classification for a timer's sample set.

use serde::{Deserialize, Serialize};

use super::outliers::DEFAULT_IQR_MULTIPLIER;

/// How much a timer's statistics can be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataQuality {
    Good,
    Poor,
    Unreliable,
}

impl DataQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataQuality::Good => "good",
            DataQuality::Poor => "poor",
            DataQuality::Unreliable => "unreliable",
        }
    }
}

impl std::fmt::Display for DataQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tuning for outlier filtering and quality classification.
///
/// Loaded from the `[quality]` table of the TOML configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Fence width in IQRs for outlier filtering (default: 1.5)
    #[serde(default = "default_iqr_multiplier")]
    pub iqr_multiplier: f64,
    /// cv strictly below this is low variance (default: 0.15)
    #[serde(default = "default_good_cv")]
    pub good_cv: f64,
    /// cv strictly above this is unreliable (default: 0.5)
    #[serde(default = "default_unreliable_cv")]
    pub unreliable_cv: f64,
    /// Samples needed after filtering to rate a timer `good` (default: 5)
    #[serde(default = "default_min_samples")]
    pub min_samples: usize,
    /// Outlier share above which a timer is unreliable (default: 0.3)
    #[serde(default = "default_max_outlier_fraction")]
    pub max_outlier_fraction: f64,
}

fn default_iqr_multiplier() -> f64 {
    DEFAULT_IQR_MULTIPLIER
}

fn default_good_cv() -> f64 {
    0.15
}

fn default_unreliable_cv() -> f64 {
    0.5
}

fn default_min_samples() -> usize {
    5
}

fn default_max_outlier_fraction() -> f64 {
    0.3
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            iqr_multiplier: default_iqr_multiplier(),
            good_cv: default_good_cv(),
            unreliable_cv: default_unreliable_cv(),
            min_samples: default_min_samples(),
            max_outlier_fraction: default_max_outlier_fraction(),
        }
    }
}

impl StatsConfig {
    /// Classify a filtered sample set.
    ///
    /// `samples` is the count kept after filtering and `outliers` the count
    /// removed. A zero mean always yields `Unreliable` since cv is undefined.
    pub fn classify(&self, samples: usize, outliers: usize, mean: f64, cv: f64) -> DataQuality {
        if samples == 0 || mean == 0.0 {
            return DataQuality::Unreliable;
        }

        let outlier_fraction = outliers as f64 / (samples + outliers) as f64;
        if outlier_fraction > self.max_outlier_fraction || cv > self.unreliable_cv {
            return DataQuality::Unreliable;
        }

        if cv < self.good_cv && samples >= self.min_samples {
            DataQuality::Good
        } else {
            DataQuality::Poor
        }
    }
}
