/// Default acquisition rate (samples per second)
pub const DEFAULT_SAMPLE_RATE_HZ: f64 = 5.0;

/// Default capacity of the series buffer
pub const DEFAULT_MAX_POINTS: usize = 1000;

/// Consecutive read failures that trigger a backoff pause
pub const DEFAULT_MAX_CONSECUTIVE_FAILURES: u32 = 3;

/// Pause after a run of failed reads (milliseconds)
pub const DEFAULT_FAILURE_BACKOFF_MS: u64 = 2000;

/// Minimum number of samples required for an estimate
pub const DEFAULT_MIN_SAMPLES: usize = 20;

/// Startup window discarded before analysis (seconds)
pub const DEFAULT_WARMUP_SECS: f64 = 20.0;

/// Span that must remain after the warm-up trim for the trim to apply (seconds)
pub const DEFAULT_MIN_ANALYSIS_SECS: f64 = 60.0;

/// Minimum max-min range of a usable signal
pub const DEFAULT_VARIATION_EPSILON: f64 = 0.1;

/// Gaussian smoothing kernel width (samples)
pub const DEFAULT_SMOOTHING_SIGMA: f64 = 0.5;

/// Peak height threshold as a multiple of std above the mean
pub const DEFAULT_HEIGHT_STD_FACTOR: f64 = 0.1;

/// Peak prominence threshold as a multiple of std
pub const DEFAULT_PROMINENCE_STD_FACTOR: f64 = 0.3;

/// Floor for the adaptive prominence threshold
pub const DEFAULT_MIN_PROMINENCE: f64 = 0.02;

/// Minimum separation between accepted peaks (seconds)
pub const DEFAULT_MIN_PEAK_DISTANCE_SECS: f64 = 0.4;

/// Prominence used by the relaxed second pass
pub const DEFAULT_RELAXED_MIN_PROMINENCE: f64 = 0.01;

/// Peak separation used by the relaxed second pass (seconds, 0 = adjacent allowed)
pub const DEFAULT_RELAXED_MIN_PEAK_DISTANCE_SECS: f64 = 0.0;

/// Peaks needed before an average interval is trusted
pub const DEFAULT_MIN_RELIABLE_PEAKS: usize = 5;

/// Coefficient of variation above which the cadence is irregular
pub const DEFAULT_MAX_INTERVAL_CV: f64 = 0.35;

/// Interval outlier cutoff in standard deviations
pub const DEFAULT_OUTLIER_STD_FACTOR: f64 = 3.0;

/// Largest tolerated share of outlier intervals
pub const DEFAULT_MAX_OUTLIER_FRACTION: f64 = 0.30;

/// Shortest plausible breathing cycle (seconds)
pub const DEFAULT_MIN_INTERVAL_SECS: f64 = 2.0;

/// Longest plausible breathing cycle (seconds)
pub const DEFAULT_MAX_INTERVAL_SECS: f64 = 8.0;

/// Lowest accepted rate (breaths per minute)
pub const DEFAULT_MIN_BPM: f64 = 6.0;

/// Highest accepted rate (breaths per minute)
pub const DEFAULT_MAX_BPM: f64 = 40.0;

// Motion (optical-flow style) variant

/// Acquisition rate for the motion variant
pub const MOTION_SAMPLE_RATE_HZ: f64 = 10.0;

/// Buffer capacity for the motion variant
pub const MOTION_MAX_POINTS: usize = 2000;

/// Minimum sample count for the motion variant
pub const MOTION_MIN_SAMPLES: usize = 50;

/// Minimum range of displacement magnitudes
pub const MOTION_VARIATION_EPSILON: f64 = 0.001;

/// Smoothing width for the motion variant
pub const MOTION_SMOOTHING_SIGMA: f64 = 1.0;

/// Height factor for the motion variant
pub const MOTION_HEIGHT_STD_FACTOR: f64 = 0.2;

/// Prominence factor for the motion variant
pub const MOTION_PROMINENCE_STD_FACTOR: f64 = 0.5;

/// Prominence floor for the motion variant
pub const MOTION_MIN_PROMINENCE: f64 = 0.001;

/// Peak separation for the motion variant (seconds)
pub const MOTION_MIN_PEAK_DISTANCE_SECS: f64 = 0.5;

/// Relaxed prominence for the motion variant
pub const MOTION_RELAXED_MIN_PROMINENCE: f64 = 0.0005;

/// Relaxed peak separation for the motion variant (seconds)
pub const MOTION_RELAXED_MIN_PEAK_DISTANCE_SECS: f64 = 0.3;

/// Shortest interval accepted by the motion variant (seconds)
pub const MOTION_MIN_INTERVAL_SECS: f64 = 0.5;

/// Longest interval accepted by the motion variant (seconds)
pub const MOTION_MAX_INTERVAL_SECS: f64 = 4.0;
