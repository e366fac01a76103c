use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of one rate estimation
///
/// `Indeterminate` and `InsufficientData` both mean "no reliable result yet"
/// to an end user; the reason is carried for diagnosis only. Neither is ever
/// reported as a numeric zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EstimationResult {
    /// A trusted breathing rate in breaths per minute
    Rate { bpm: f64 },
    /// Enough varying data, but no periodicity that can be trusted
    Indeterminate { reason: IndeterminateReason },
    /// Too little data or too little variation to try
    InsufficientData { reason: InsufficientReason },
}

impl EstimationResult {
    /// The rate when one was determined
    pub fn bpm(&self) -> Option<f64> {
        match self {
            Self::Rate { bpm } => Some(*bpm),
            _ => None,
        }
    }

    pub fn is_rate(&self) -> bool {
        matches!(self, Self::Rate { .. })
    }

    /// Stable lowercase tag, identical to the serialized `status` field
    pub fn label(&self) -> &'static str {
        match self {
            Self::Rate { .. } => "rate",
            Self::Indeterminate { .. } => "indeterminate",
            Self::InsufficientData { .. } => "insufficient_data",
        }
    }
}

impl fmt::Display for EstimationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rate { bpm } => write!(f, "{bpm:.1} breaths/min"),
            Self::Indeterminate { reason } => write!(f, "indeterminate ({reason})"),
            Self::InsufficientData { reason } => write!(f, "insufficient data ({reason})"),
        }
    }
}

/// Why there was not enough evidence to attempt an estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InsufficientReason {
    TooFewSamples { count: usize, required: usize },
    TooFewAfterWarmup { count: usize, required: usize },
    FlatSignal { range: f64 },
    NoValidIntervals { intervals: usize },
}

impl fmt::Display for InsufficientReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewSamples { count, required } => write!(f, "{count} samples, {required} required"),
            Self::TooFewAfterWarmup { count, required } => {
                write!(f, "{count} samples after warm-up, {required} required")
            },
            Self::FlatSignal { range } => write!(f, "signal range {range:.4} too small"),
            Self::NoValidIntervals { intervals } => {
                write!(f, "none of {intervals} intervals within breathing bounds")
            },
        }
    }
}

/// Why the evidence did not support a trusted rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IndeterminateReason {
    NoPeriodicity { peaks: usize },
    TooFewPeaks { peaks: usize, required: usize },
    IrregularCadence { cv: f64 },
    TooManyOutliers { outliers: usize, intervals: usize },
    RateOutOfBounds { bpm: f64 },
}

impl fmt::Display for IndeterminateReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoPeriodicity { peaks } => write!(f, "{peaks} peaks after relaxed search"),
            Self::TooFewPeaks { peaks, required } => write!(f, "{peaks} peaks, {required} required"),
            Self::IrregularCadence { cv } => write!(f, "interval CV {cv:.2} too high"),
            Self::TooManyOutliers { outliers, intervals } => {
                write!(f, "{outliers} of {intervals} intervals are outliers")
            },
            Self::RateOutOfBounds { bpm } => write!(f, "{bpm:.1} breaths/min outside plausible range"),
        }
    }
}

/// Intermediate values of one estimator run
///
/// Fields past the stage that produced the verdict keep their empty defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub result: EstimationResult,
    /// Samples in the input series
    pub total_samples: usize,
    /// Samples left after the warm-up trim
    pub retained_samples: usize,
    /// Observed rate of the retained samples, `None` when their span is zero
    pub sample_rate_hz: Option<f64>,
    /// `max - min` of the retained values
    pub range: Option<f64>,
    /// Whether the relaxed second peak search was needed
    pub relaxed: bool,
    /// Peak positions in the retained series
    pub peak_indices: Vec<usize>,
    pub peak_times: Vec<f64>,
    /// Successive peak-to-peak intervals in seconds
    pub intervals: Vec<f64>,
    pub interval_cv: Option<f64>,
    pub outliers: usize,
    /// Intervals inside the breathing-cycle bounds
    pub valid_intervals: Vec<f64>,
}

impl Analysis {
    pub(super) fn new(total_samples: usize) -> Self {
        Self {
            result: EstimationResult::InsufficientData {
                reason: InsufficientReason::TooFewSamples { count: total_samples, required: 0 },
            },
            total_samples,
            retained_samples: 0,
            sample_rate_hz: None,
            range: None,
            relaxed: false,
            peak_indices: Vec::new(),
            peak_times: Vec::new(),
            intervals: Vec::new(),
            interval_cv: None,
            outliers: 0,
            valid_intervals: Vec::new(),
        }
    }
}
