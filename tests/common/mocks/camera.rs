use std::f64::consts::PI;

use async_trait::async_trait;
use respiration_monitor::error::{AcquisitionError, Result};
use respiration_monitor::source::{FrameSource, GrayFrame};

/// Camera whose centre brightness breathes sinusoidally
///
/// Frame `n` is uniformly filled with `base + swing * sin(2π n / frames_per_cycle)`,
/// rounded to the nearest luma level.
#[derive(Debug)]
pub struct SyntheticCamera {
    width: usize,
    height: usize,
    base: f64,
    swing: f64,
    frames_per_cycle: f64,
    frame: u64,
    open: bool,
}

impl SyntheticCamera {
    pub fn new(frames_per_cycle: f64) -> Self {
        Self { width: 16, height: 12, base: 128.0, swing: 20.0, frames_per_cycle, frame: 0, open: false }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }
}

#[async_trait]
impl FrameSource for SyntheticCamera {
    async fn open(&mut self) -> Result<()> {
        self.open = true;
        Ok(())
    }

    async fn read_frame(&mut self) -> std::result::Result<GrayFrame, AcquisitionError> {
        if !self.open {
            return Err(AcquisitionError::FrameUnavailable);
        }
        let phase = 2.0 * PI * self.frame as f64 / self.frames_per_cycle;
        self.frame += 1;
        let luma = (self.base + self.swing * phase.sin()).round().clamp(0.0, 255.0) as u8;
        Ok(GrayFrame::filled(self.width, self.height, luma))
    }

    async fn close(&mut self) {
        self.open = false;
    }
}
