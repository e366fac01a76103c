//! Respiration Monitor - breathing-rate estimation from a noisy scalar signal
//!
//! This crate turns a low-amplitude periodic scalar, sampled from video frames
//! at a few hertz, into a breaths-per-minute estimate, or into a reasoned
//! refusal when the evidence does not support one.
//!
//! # Features
//!
//! - **Bounded series buffer**: FIFO sample storage with consistent snapshots
//! - **Acquisition loop**: drift-free periodic sampling with retry and backoff
//! - **Session state machine**: single active session, idempotent source release
//! - **Rate estimator**: Gaussian smoothing, adaptive peak detection and staged
//!   quality gates
//! - **Query surface**: lock-free polling of count, state and raw data
//! - **Scalar extraction**: centre-region brightness and vertical motion
//!   extractors over grayscale frames
//!
//! # Examples
//!
//! ```rust
//! use respiration_monitor::prelude::*;
//!
//! // A recorded series with a 5 s breathing cycle, sampled at 5 Hz
//! let series: Series = (0..300)
//!     .map(|i| {
//!         let t = i as f64 / 5.0;
//!         Sample::new(t, 25.0 + (2.0 * std::f64::consts::PI * t / 5.0).sin())
//!     })
//!     .collect();
//!
//! let result = estimate(&series, &EstimatorConfig::default());
//! assert!((result.bpm().unwrap() - 12.0).abs() < 0.5);
//! ```
//!
//! # Results are values, not errors
//!
//! "Not enough data" and "no trustworthy periodicity" are ordinary outcomes and
//! come back as [`EstimationResult::InsufficientData`] and
//! [`EstimationResult::Indeterminate`]. [`Error`] is reserved for session
//! misuse, unavailable sources, bad configuration and I/O.
//!
//! # Thread Safety
//!
//! The buffer is shared between the acquisition task and any number of
//! readers. Every read goes through [`SeriesBuffer::snapshot`], which copies
//! the contents under a short lock, so readers never observe a half-applied
//! append or eviction.

#![doc(html_root_url = "https://docs.rs/respiration-monitor/0.1.0")]

pub mod acquisition;
pub mod config;
pub mod error;
pub mod estimator;
pub mod logging;
pub mod series;
pub mod service;
pub mod session;
pub mod source;

pub use acquisition::{AcquisitionSnapshot, AcquisitionStats};
pub use config::{AcquisitionConfig, EstimatorConfig, MonitorConfig};
pub use error::{AcquisitionError, Error, Result};
pub use estimator::{analyze, estimate, Analysis, EstimationResult, IndeterminateReason, InsufficientReason};
pub use series::{Sample, Series, SeriesBuffer};
pub use service::{MonitorService, RespirationMonitoring};
pub use session::{QueryHandle, Session, SessionState};

/// Common imports for embedding the monitor
pub mod prelude {
    pub use crate::config::{AcquisitionConfig, EstimatorConfig, MonitorConfig};
    pub use crate::estimator::{analyze, estimate, EstimationResult};
    pub use crate::series::{Sample, Series, SeriesBuffer};
    pub use crate::service::{MonitorService, RespirationMonitoring};
    pub use crate::session::{QueryHandle, Session, SessionState};
    pub use crate::source::{FrameScalarSource, SampleSink};
    pub use crate::{Error, Result};
}
