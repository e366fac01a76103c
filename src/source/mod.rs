//! # Scalar Sources
//!
//! The acquisition loop only ever sees a [`FrameScalarSource`]: something that
//! can be acquired, asked for one scalar per tick, and released. How that
//! scalar is produced is a separate concern:
//!
//! * [`FrameSource`] - a camera-like device handing out [`GrayFrame`]s
//! * [`ScalarExtractor`] - reduces one frame to one number
//!   ([`BrightnessExtractor`] or [`MotionExtractor`])
//! * [`ExtractingSource`] - glues the two together
//!
//! Raw samples can additionally be mirrored to a [`SampleSink`], for example a
//! [`CsvSampleLog`] that [`read_sample_log`] can load again for offline replay.
//!
//! ## Example
//!
//! ```rust,no_run
//! use respiration_monitor::source::{BrightnessExtractor, ExtractingSource, FrameSource};
//!
//! fn build<F: FrameSource + 'static>(camera: F) -> ExtractingSource<F, BrightnessExtractor> {
//!     ExtractingSource::new(camera, BrightnessExtractor::new())
//! }
//! ```

mod brightness;
mod frame;
mod motion;
mod sink;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use tracing::debug;

pub use self::brightness::BrightnessExtractor;
pub use self::frame::{GrayFrame, Region};
pub use self::motion::MotionExtractor;
pub use self::sink::{read_sample_log, CsvSampleLog, SampleSink};
use crate::error::{AcquisitionError, Result};

/// Produces one scalar per call from an external signal
///
/// `release` must be idempotent: releasing a source that was never acquired,
/// or was already released, does nothing.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FrameScalarSource: Send {
    /// Claims the underlying device; fails when it cannot be opened
    async fn acquire(&mut self) -> Result<()>;

    /// Reads the next scalar; errors are transient and the caller retries
    async fn next_scalar(&mut self) -> std::result::Result<f64, AcquisitionError>;

    /// Gives the device back
    async fn release(&mut self);
}

/// A device that yields luma frames, such as a webcam adapter
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FrameSource: Send {
    async fn open(&mut self) -> Result<()>;

    async fn read_frame(&mut self) -> std::result::Result<GrayFrame, AcquisitionError>;

    async fn close(&mut self);
}

/// Reduces a frame to a single scalar
pub trait ScalarExtractor: Send {
    /// `None` when the frame carries no usable signal
    fn extract(&mut self, frame: &GrayFrame) -> Option<f64>;

    /// Drops any state carried between frames
    fn reset(&mut self) {}
}

/// [`FrameScalarSource`] built from a frame device and an extractor
#[derive(Debug)]
pub struct ExtractingSource<F, E> {
    frames: F,
    extractor: E,
    acquired: bool,
}

impl<F: FrameSource, E: ScalarExtractor> ExtractingSource<F, E> {
    pub fn new(frames: F, extractor: E) -> Self {
        Self { frames, extractor, acquired: false }
    }

    pub fn is_acquired(&self) -> bool {
        self.acquired
    }

    pub fn into_parts(self) -> (F, E) {
        (self.frames, self.extractor)
    }
}

#[async_trait]
impl<F: FrameSource, E: ScalarExtractor> FrameScalarSource for ExtractingSource<F, E> {
    async fn acquire(&mut self) -> Result<()> {
        if self.acquired {
            return Ok(());
        }
        self.frames.open().await?;
        self.extractor.reset();
        self.acquired = true;
        Ok(())
    }

    async fn next_scalar(&mut self) -> std::result::Result<f64, AcquisitionError> {
        if !self.acquired {
            return Err(AcquisitionError::Device("source not acquired".to_string()));
        }
        let frame = self.frames.read_frame().await?;
        self.extractor.extract(&frame).ok_or(AcquisitionError::NoScalar)
    }

    async fn release(&mut self) {
        if !self.acquired {
            debug!("Release on an idle source ignored");
            return;
        }
        self.frames.close().await;
        self.acquired = false;
    }
}
