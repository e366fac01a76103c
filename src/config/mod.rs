//! # Configuration
//!
//! Tunable parameters for acquisition and estimation. Every threshold used by
//! the estimator is a named field here so that empirically tuned values can be
//! overridden without touching the algorithm.
//!
//! Two presets mirror the two scalar extraction methods:
//!
//! * [`MonitorConfig::brightness`] - centre-region brightness at 5 Hz (the default)
//! * [`MonitorConfig::optical_flow`] - vertical motion magnitude at 10 Hz
//!
//! ## Example
//!
//! ```rust
//! use respiration_monitor::config::MonitorConfig;
//!
//! let config = MonitorConfig::from_json_str(r#"{ "estimator": { "warmup_secs": 0.0 } }"#).unwrap();
//! assert_eq!(config.estimator.warmup_secs, 0.0);
//! assert_eq!(config.acquisition.max_points, 1000);
//! ```

pub mod constants;

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use self::constants::*;
use crate::error::{Error, Result};

/// Top-level configuration for a monitoring session
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Acquisition loop and buffer settings
    pub acquisition: AcquisitionConfig,
    /// Rate estimator thresholds
    pub estimator: EstimatorConfig,
}

impl MonitorConfig {
    /// Centre-region brightness preset (same as `Default`)
    pub fn brightness() -> Self {
        Self::default()
    }

    /// Vertical-motion preset with the thresholds tuned for displacement magnitudes
    pub fn optical_flow() -> Self {
        Self {
            acquisition: AcquisitionConfig {
                sample_rate_hz: MOTION_SAMPLE_RATE_HZ,
                max_points: MOTION_MAX_POINTS,
                ..AcquisitionConfig::default()
            },
            estimator: EstimatorConfig {
                min_samples: MOTION_MIN_SAMPLES,
                warmup_secs: 0.0,
                variation_epsilon: MOTION_VARIATION_EPSILON,
                smoothing_sigma: MOTION_SMOOTHING_SIGMA,
                height_std_factor: MOTION_HEIGHT_STD_FACTOR,
                prominence_std_factor: MOTION_PROMINENCE_STD_FACTOR,
                min_prominence: MOTION_MIN_PROMINENCE,
                min_peak_distance_secs: MOTION_MIN_PEAK_DISTANCE_SECS,
                relaxed_min_prominence: MOTION_RELAXED_MIN_PROMINENCE,
                relaxed_min_peak_distance_secs: MOTION_RELAXED_MIN_PEAK_DISTANCE_SECS,
                min_interval_secs: MOTION_MIN_INTERVAL_SECS,
                max_interval_secs: MOTION_MAX_INTERVAL_SECS,
                ..EstimatorConfig::default()
            },
        }
    }

    /// Parses a JSON document; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Applies a JSON document on top of this configuration.
    ///
    /// Fields the document leaves out keep their current values, so overrides
    /// can be layered onto either preset.
    pub fn with_json_overrides(self, json: &str) -> Result<Self> {
        let mut merged = serde_json::to_value(&self)?;
        merge_json(&mut merged, serde_json::from_str(json)?);
        let config: Self = serde_json::from_value(merged)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a JSON file and applies it with [`with_json_overrides`](Self::with_json_overrides).
    pub fn with_json_file_overrides<P: AsRef<Path>>(self, path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        self.with_json_overrides(&contents)
    }

    /// Checks that every parameter is usable.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The configuration is consistent
    /// * `Err(Error::InvalidConfig)` - Naming the first offending field
    pub fn validate(&self) -> Result<()> {
        self.acquisition.validate()?;
        self.estimator.validate()
    }
}

fn merge_json(base: &mut serde_json::Value, overrides: serde_json::Value) {
    match (base, overrides) {
        (serde_json::Value::Object(base), serde_json::Value::Object(overrides)) => {
            for (key, value) in overrides {
                merge_json(base.entry(key).or_insert(serde_json::Value::Null), value);
            }
        },
        (base, value) => *base = value,
    }
}

/// Acquisition loop and buffer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquisitionConfig {
    /// Target sampling rate in Hz
    pub sample_rate_hz: f64,
    /// Capacity of the series buffer; the oldest sample is evicted beyond this
    pub max_points: usize,
    /// Consecutive failed reads before pausing
    pub max_consecutive_failures: u32,
    /// Length of that pause in milliseconds
    pub failure_backoff_ms: u64,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: DEFAULT_SAMPLE_RATE_HZ,
            max_points: DEFAULT_MAX_POINTS,
            max_consecutive_failures: DEFAULT_MAX_CONSECUTIVE_FAILURES,
            failure_backoff_ms: DEFAULT_FAILURE_BACKOFF_MS,
        }
    }
}

impl AcquisitionConfig {
    /// Time between two samples at the target rate
    pub fn sample_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.sample_rate_hz)
    }

    /// Pause applied after `max_consecutive_failures` failed reads
    pub fn failure_backoff(&self) -> Duration {
        Duration::from_millis(self.failure_backoff_ms)
    }

    fn validate(&self) -> Result<()> {
        if !(self.sample_rate_hz.is_finite() && self.sample_rate_hz > 0.0) {
            return Err(Error::invalid_config(format!(
                "sample_rate_hz must be positive, got {}",
                self.sample_rate_hz
            )));
        }
        if self.max_points == 0 {
            return Err(Error::invalid_config("max_points must be non-zero"));
        }
        if self.max_consecutive_failures == 0 {
            return Err(Error::invalid_config("max_consecutive_failures must be non-zero"));
        }
        Ok(())
    }
}

/// Thresholds for the staged rate estimator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    pub min_samples: usize,
    /// Seconds discarded from the start of the session; `0.0` keeps everything
    pub warmup_secs: f64,
    /// The warm-up is kept when trimming it would leave a shorter span than this
    pub min_analysis_secs: f64,
    pub variation_epsilon: f64,
    pub smoothing_sigma: f64,
    pub height_std_factor: f64,
    pub prominence_std_factor: f64,
    pub min_prominence: f64,
    pub min_peak_distance_secs: f64,
    pub relaxed_min_prominence: f64,
    pub relaxed_min_peak_distance_secs: f64,
    pub min_reliable_peaks: usize,
    pub max_interval_cv: f64,
    pub outlier_std_factor: f64,
    pub max_outlier_fraction: f64,
    pub min_interval_secs: f64,
    pub max_interval_secs: f64,
    pub min_bpm: f64,
    pub max_bpm: f64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            min_samples: DEFAULT_MIN_SAMPLES,
            warmup_secs: DEFAULT_WARMUP_SECS,
            min_analysis_secs: DEFAULT_MIN_ANALYSIS_SECS,
            variation_epsilon: DEFAULT_VARIATION_EPSILON,
            smoothing_sigma: DEFAULT_SMOOTHING_SIGMA,
            height_std_factor: DEFAULT_HEIGHT_STD_FACTOR,
            prominence_std_factor: DEFAULT_PROMINENCE_STD_FACTOR,
            min_prominence: DEFAULT_MIN_PROMINENCE,
            min_peak_distance_secs: DEFAULT_MIN_PEAK_DISTANCE_SECS,
            relaxed_min_prominence: DEFAULT_RELAXED_MIN_PROMINENCE,
            relaxed_min_peak_distance_secs: DEFAULT_RELAXED_MIN_PEAK_DISTANCE_SECS,
            min_reliable_peaks: DEFAULT_MIN_RELIABLE_PEAKS,
            max_interval_cv: DEFAULT_MAX_INTERVAL_CV,
            outlier_std_factor: DEFAULT_OUTLIER_STD_FACTOR,
            max_outlier_fraction: DEFAULT_MAX_OUTLIER_FRACTION,
            min_interval_secs: DEFAULT_MIN_INTERVAL_SECS,
            max_interval_secs: DEFAULT_MAX_INTERVAL_SECS,
            min_bpm: DEFAULT_MIN_BPM,
            max_bpm: DEFAULT_MAX_BPM,
        }
    }
}

impl EstimatorConfig {
    fn validate(&self) -> Result<()> {
        let non_negative = [
            ("warmup_secs", self.warmup_secs),
            ("min_analysis_secs", self.min_analysis_secs),
            ("variation_epsilon", self.variation_epsilon),
            ("smoothing_sigma", self.smoothing_sigma),
            ("height_std_factor", self.height_std_factor),
            ("prominence_std_factor", self.prominence_std_factor),
            ("min_prominence", self.min_prominence),
            ("min_peak_distance_secs", self.min_peak_distance_secs),
            ("relaxed_min_prominence", self.relaxed_min_prominence),
            ("relaxed_min_peak_distance_secs", self.relaxed_min_peak_distance_secs),
            ("max_interval_cv", self.max_interval_cv),
            ("outlier_std_factor", self.outlier_std_factor),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(Error::invalid_config(format!("{name} must be a non-negative number, got {value}")));
            }
        }
        if !(0.0..=1.0).contains(&self.max_outlier_fraction) {
            return Err(Error::invalid_config("max_outlier_fraction must lie within [0, 1]"));
        }
        if self.min_reliable_peaks < 2 {
            return Err(Error::invalid_config("min_reliable_peaks must be at least 2"));
        }
        if !(self.min_interval_secs > 0.0 && self.min_interval_secs < self.max_interval_secs) {
            return Err(Error::invalid_config(format!(
                "interval bounds must satisfy 0 < min < max, got {}..{}",
                self.min_interval_secs, self.max_interval_secs
            )));
        }
        if !(self.min_bpm > 0.0 && self.min_bpm < self.max_bpm) {
            return Err(Error::invalid_config(format!(
                "bpm bounds must satisfy 0 < min < max, got {}..{}",
                self.min_bpm, self.max_bpm
            )));
        }
        Ok(())
    }
}
