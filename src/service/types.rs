use serde::{Deserialize, Serialize};

use crate::acquisition::AcquisitionSnapshot;
use crate::estimator::EstimationResult;

/// Reply to a start request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartResponse {
    pub success: bool,
}

/// Reply to a stop request
///
/// `respiration_rate` is only set for a trusted rate; `result` carries the
/// full verdict whenever a session was actually stopped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopResponse {
    pub success: bool,
    pub respiration_rate: Option<f64>,
    pub result: Option<EstimationResult>,
}

impl StopResponse {
    pub(crate) fn from_result(result: EstimationResult) -> Self {
        Self { success: true, respiration_rate: result.bpm(), result: Some(result) }
    }

    pub(crate) fn failed() -> Self {
        Self { success: false, respiration_rate: None, result: None }
    }
}

/// Where the rate stands for polling callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateStatus {
    /// Monitoring, or nothing stopped yet
    Pending,
    Rate,
    Indeterminate,
    InsufficientData,
}

impl From<Option<&EstimationResult>> for RateStatus {
    fn from(result: Option<&EstimationResult>) -> Self {
        match result {
            None => Self::Pending,
            Some(EstimationResult::Rate { .. }) => Self::Rate,
            Some(EstimationResult::Indeterminate { .. }) => Self::Indeterminate,
            Some(EstimationResult::InsufficientData { .. }) => Self::InsufficientData,
        }
    }
}

/// Lightweight status for frequent polling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    /// Samples currently buffered
    pub count: usize,
    pub monitoring: bool,
    /// Index of the current or last session, `0` before the first start
    pub session: u64,
    /// Last stopped session's rate, `null` unless it was a trusted rate
    pub rate: Option<f64>,
    pub status: RateStatus,
}

/// Buffer contents and acquisition health
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataResponse {
    pub values: Vec<f64>,
    pub timestamps: Vec<f64>,
    pub monitoring: bool,
    pub count: usize,
    pub stats: AcquisitionSnapshot,
}
