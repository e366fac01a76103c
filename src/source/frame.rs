use crate::error::{Error, Result};

/// Half-open pixel rectangle `[left, right) x [top, bottom)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub left: usize,
    pub top: usize,
    pub right: usize,
    pub bottom: usize,
}

impl Region {
    pub fn width(&self) -> usize {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> usize {
        self.bottom.saturating_sub(self.top)
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

/// An 8-bit single-channel (luma) video frame, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayFrame {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl GrayFrame {
    /// Wraps `pixels`, which must hold exactly `width * height` bytes.
    pub fn new(width: usize, height: usize, pixels: Vec<u8>) -> Result<Self> {
        if pixels.len() != width * height {
            return Err(Error::invalid_data(format!(
                "frame of {width}x{height} needs {} pixels, got {}",
                width * height,
                pixels.len()
            )));
        }
        Ok(Self { width, height, pixels })
    }

    /// A frame where every pixel has the same luma
    pub fn filled(width: usize, height: usize, luma: u8) -> Self {
        Self { width, height, pixels: vec![luma; width * height] }
    }

    /// Converts interleaved BGR bytes using BT.601 luma weights.
    pub fn from_bgr8(width: usize, height: usize, bgr: &[u8]) -> Result<Self> {
        if bgr.len() != width * height * 3 {
            return Err(Error::invalid_data(format!(
                "BGR frame of {width}x{height} needs {} bytes, got {}",
                width * height * 3,
                bgr.len()
            )));
        }
        let pixels = bgr
            .chunks_exact(3)
            .map(|px| {
                let luma = 0.114 * f64::from(px[0]) + 0.587 * f64::from(px[1]) + 0.299 * f64::from(px[2]);
                luma.round().clamp(0.0, 255.0) as u8
            })
            .collect();
        Ok(Self { width, height, pixels })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn row(&self, y: usize) -> &[u8] {
        &self.pixels[y * self.width..(y + 1) * self.width]
    }

    /// The central half of the frame in each dimension, where the chest is expected
    pub fn center_region(&self) -> Region {
        Region {
            left: self.width / 4,
            top: self.height / 4,
            right: 3 * self.width / 4,
            bottom: 3 * self.height / 4,
        }
    }

    /// Mean luma over `region`, `None` when the region is empty.
    pub fn mean_luma(&self, region: Region) -> Option<f64> {
        if region.is_empty() {
            return None;
        }
        let sum: u64 = (region.top..region.bottom)
            .map(|y| {
                self.row(y)[region.left..region.right]
                    .iter()
                    .map(|&p| u64::from(p))
                    .sum::<u64>()
            })
            .sum();
        Some(sum as f64 / (region.width() * region.height()) as f64)
    }
}
