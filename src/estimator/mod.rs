//! # Rate Estimator
//!
//! Turns a finished [`Series`] into an [`EstimationResult`] through a chain of
//! gates. Each gate checks one assumption and, when it fails, ends the run
//! with a verdict naming that assumption:
//!
//! 1. **Sufficiency** - enough samples, before and after the warm-up trim;
//!    the trim only applies to sessions long enough to spare it
//! 2. **Variation** - the signal is not flat
//! 3. **Smoothing** - Gaussian low-pass over the values
//! 4. **Peak detection** - adaptive height/prominence/distance thresholds,
//!    retried once with relaxed thresholds
//! 5. **Reliability** - enough peaks to average over
//! 6. **Regularity** - interval CV and outlier share
//! 7. **Physiological bounds** - intervals of a plausible breathing cycle
//! 8. **Sanity bound** - the final rate itself is plausible
//!
//! The estimator is pure: it holds no state and can be run on a recorded
//! series as well as on a live session's snapshot.
//!
//! ## Example
//!
//! ```rust
//! use respiration_monitor::config::EstimatorConfig;
//! use respiration_monitor::estimator::{estimate, EstimationResult};
//! use respiration_monitor::series::{Sample, Series};
//!
//! let series: Series = (0..10).map(|i| Sample::new(i as f64 * 0.2, 1.0)).collect();
//! let result = estimate(&series, &EstimatorConfig::default());
//! assert!(matches!(result, EstimationResult::InsufficientData { .. }));
//! ```

mod peaks;
mod smoothing;
mod types;


use tracing::{debug, info};

pub use self::peaks::{find_peaks, local_maxima, prominence, PeakCriteria};
pub use self::smoothing::gaussian_smooth;
pub use self::types::{Analysis, EstimationResult, IndeterminateReason, InsufficientReason};
use crate::config::EstimatorConfig;
use crate::series::Series;

/// Absorbs float noise in timestamps when comparing intervals with their bounds
const BOUND_TOLERANCE: f64 = 1e-9;

/// Estimates the breathing rate of `series`.
pub fn estimate(series: &Series, config: &EstimatorConfig) -> EstimationResult {
    analyze(series, config).result
}

/// Runs the estimator and keeps every intermediate value.
///
/// # Arguments
///
/// * `series` - Samples in time order, timestamps in seconds since session start
/// * `config` - Gate thresholds
///
/// # Returns
///
/// An [`Analysis`] whose `result` is the verdict; the remaining fields are
/// filled up to the stage that produced it.
pub fn analyze(series: &Series, config: &EstimatorConfig) -> Analysis {
    let mut analysis = Analysis::new(series.len());
    let result = run_stages(series, config, &mut analysis);
    analysis.result = result;

    match &analysis.result {
        EstimationResult::Rate { bpm } => {
            info!(bpm = *bpm, peaks = analysis.peak_indices.len(), "Breathing rate estimated")
        },
        other => info!(status = other.label(), reason = %other, "No breathing rate determined"),
    }
    analysis
}

fn run_stages(series: &Series, config: &EstimatorConfig, analysis: &mut Analysis) -> EstimationResult {
    // Stage 1: sufficiency
    if series.len() < config.min_samples {
        debug!(sample_count = series.len(), required = config.min_samples, "Too few samples");
        return insufficient(InsufficientReason::TooFewSamples {
            count: series.len(),
            required: config.min_samples,
        });
    }

    let retained = trim_warmup(series, config);
    analysis.retained_samples = retained.len();
    if retained.len() < config.min_samples {
        debug!(sample_count = retained.len(), warmup_secs = config.warmup_secs, "Too few samples after warm-up");
        return insufficient(InsufficientReason::TooFewAfterWarmup {
            count: retained.len(),
            required: config.min_samples,
        });
    }

    // Stage 2: variation
    let values = retained.values();
    let timestamps = retained.timestamps();
    let range = max(&values) - min(&values);
    analysis.range = Some(range);
    if range < config.variation_epsilon {
        debug!(range, epsilon = config.variation_epsilon, "Signal is flat");
        return insufficient(InsufficientReason::FlatSignal { range });
    }

    // Stage 3: smoothing
    let smoothed = gaussian_smooth(&values, config.smoothing_sigma);

    // Stage 4: adaptive peak detection
    let sample_rate = effective_sample_rate(&retained);
    analysis.sample_rate_hz = sample_rate;

    let (mean, std) = mean_std(&smoothed);
    let strict = PeakCriteria {
        min_height: mean + config.height_std_factor * std,
        min_prominence: config.min_prominence.max(config.prominence_std_factor * std),
        min_distance: distance_in_samples(config.min_peak_distance_secs, sample_rate),
    };
    let mut peaks = find_peaks(&smoothed, &strict);
    debug!(peaks = peaks.len(), ?strict, "Peak search");

    if peaks.len() < 2 {
        let relaxed = PeakCriteria {
            min_height: mean,
            min_prominence: config.relaxed_min_prominence,
            min_distance: distance_in_samples(config.relaxed_min_peak_distance_secs, sample_rate),
        };
        peaks = find_peaks(&smoothed, &relaxed);
        analysis.relaxed = true;
        debug!(peaks = peaks.len(), ?relaxed, "Relaxed peak search");
    }

    analysis.peak_times = peaks.iter().map(|&p| timestamps[p]).collect();
    analysis.peak_indices = peaks;
    let peak_count = analysis.peak_indices.len();
    if peak_count < 2 {
        return indeterminate(IndeterminateReason::NoPeriodicity { peaks: peak_count });
    }

    // Stage 5: reliability
    if peak_count < config.min_reliable_peaks {
        debug!(peaks = peak_count, required = config.min_reliable_peaks, "Too few peaks to trust");
        return indeterminate(IndeterminateReason::TooFewPeaks {
            peaks: peak_count,
            required: config.min_reliable_peaks,
        });
    }

    // Stage 6: regularity
    analysis.intervals = analysis.peak_times.windows(2).map(|w| w[1] - w[0]).collect();
    let intervals = &analysis.intervals;
    if intervals.len() >= 3 {
        let (mean, std) = mean_std(intervals);
        let cv = if mean > 0.0 { std / mean } else { 0.0 };
        analysis.interval_cv = Some(cv);
        if cv > config.max_interval_cv {
            debug!(cv, max_cv = config.max_interval_cv, "Irregular cadence");
            return indeterminate(IndeterminateReason::IrregularCadence { cv });
        }

        let outliers = intervals
            .iter()
            .filter(|&&x| (x - mean).abs() > config.outlier_std_factor * std)
            .count();
        analysis.outliers = outliers;
        if outliers as f64 / intervals.len() as f64 > config.max_outlier_fraction {
            debug!(outliers, intervals = intervals.len(), "Too many outlier intervals");
            return indeterminate(IndeterminateReason::TooManyOutliers {
                outliers,
                intervals: intervals.len(),
            });
        }
    }

    // Stage 7: physiological bounds
    let bounds = (config.min_interval_secs - BOUND_TOLERANCE)..=(config.max_interval_secs + BOUND_TOLERANCE);
    analysis.valid_intervals = analysis
        .intervals
        .iter()
        .copied()
        .filter(|x| bounds.contains(x))
        .collect();
    if analysis.valid_intervals.is_empty() {
        debug!(intervals = analysis.intervals.len(), "No interval within breathing bounds");
        return insufficient(InsufficientReason::NoValidIntervals { intervals: analysis.intervals.len() });
    }
    let (avg_interval, _) = mean_std(&analysis.valid_intervals);
    let bpm = 60.0 / avg_interval;

    // Stage 8: sanity bound
    if !(config.min_bpm..=config.max_bpm).contains(&bpm) {
        debug!(bpm, min = config.min_bpm, max = config.max_bpm, "Rate outside plausible range");
        return indeterminate(IndeterminateReason::RateOutOfBounds { bpm });
    }

    EstimationResult::Rate { bpm }
}

/// Drops the warm-up window unless that would leave less than `min_analysis_secs`
fn trim_warmup(series: &Series, config: &EstimatorConfig) -> Series {
    if config.warmup_secs <= 0.0 {
        return series.clone();
    }
    let trimmed = series.since(config.warmup_secs);
    if trimmed.len() < series.len() && trimmed.duration() + BOUND_TOLERANCE < config.min_analysis_secs {
        debug!(
            span = trimmed.duration(),
            min_analysis_secs = config.min_analysis_secs,
            "Session too short to discard warm-up, keeping it"
        );
        return series.clone();
    }
    trimmed
}

fn insufficient(reason: InsufficientReason) -> EstimationResult {
    EstimationResult::InsufficientData { reason }
}

fn indeterminate(reason: IndeterminateReason) -> EstimationResult {
    EstimationResult::Indeterminate { reason }
}

/// Samples per second observed across the series
fn effective_sample_rate(series: &Series) -> Option<f64> {
    let span = series.duration();
    (series.len() > 1 && span > 0.0).then(|| (series.len() - 1) as f64 / span)
}

/// Converts a separation in seconds to samples, never below one
fn distance_in_samples(secs: f64, sample_rate: Option<f64>) -> usize {
    match sample_rate {
        Some(rate) => ((secs * rate).round() as usize).max(1),
        None => 1,
    }
}

/// Mean and population standard deviation
fn mean_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

fn max(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

fn min(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::INFINITY, f64::min)
}
