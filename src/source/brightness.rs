use super::frame::GrayFrame;
use super::ScalarExtractor;

/// Full scale of the normalised brightness value
const BRIGHTNESS_SCALE: f64 = 10.0;

/// Default gain applied to make subtle brightness changes visible
const DEFAULT_AMPLIFICATION: f64 = 5.0;

/// Mean brightness of the centre region, normalised to `0..=10` and amplified.
///
/// With the default gain a mid-grey frame (luma 128) yields roughly 25.1.
#[derive(Debug, Clone)]
pub struct BrightnessExtractor {
    amplification: f64,
}

impl Default for BrightnessExtractor {
    fn default() -> Self {
        Self { amplification: DEFAULT_AMPLIFICATION }
    }
}

impl BrightnessExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_amplification(amplification: f64) -> Self {
        Self { amplification }
    }
}

impl ScalarExtractor for BrightnessExtractor {
    fn extract(&mut self, frame: &GrayFrame) -> Option<f64> {
        let mean = frame.mean_luma(frame.center_region())?;
        Some(mean / 255.0 * BRIGHTNESS_SCALE * self.amplification)
    }
}
