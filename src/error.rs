/// Error type for session, configuration and I/O failures.
///
/// Estimation outcomes such as "not enough data" are not errors; they are
/// reported through [`EstimationResult`](crate::estimator::EstimationResult).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Monitoring session already active")]
    AlreadyMonitoring,

    #[error("No monitoring session is active")]
    NotMonitoring,

    #[error("Scalar source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Background task failed: {0}")]
    TaskFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    pub(crate) fn source_unavailable<S: Into<String>>(msg: S) -> Self {
        Error::SourceUnavailable(msg.into())
    }

    pub(crate) fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Error::InvalidConfig(msg.into())
    }

    pub(crate) fn invalid_data<S: Into<String>>(msg: S) -> Self {
        Error::InvalidData(msg.into())
    }

    pub(crate) fn task_failed<S: Into<String>>(msg: S) -> Self {
        Error::TaskFailed(msg.into())
    }
}

/// Transient failure to produce one scalar from the frame source.
///
/// The acquisition loop skips the tick and retries; these never end a session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AcquisitionError {
    #[error("No frame available")]
    FrameUnavailable,

    #[error("Frame produced no scalar")]
    NoScalar,

    #[error("Device error: {0}")]
    Device(String),
}

/// Result type for respiration-monitor operations
pub type Result<T> = std::result::Result<T, Error>;
