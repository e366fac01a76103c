use super::frame::{GrayFrame, Region};
use super::ScalarExtractor;

/// Default search range for the vertical shift, in rows
const DEFAULT_MAX_SHIFT: usize = 4;

/// Vertical motion magnitude of the centre region between consecutive frames.
///
/// Each frame is compared with the previous one by block matching: the centre
/// region is shifted vertically over `-max_shift..=max_shift` rows, the shift
/// with the lowest mean absolute difference wins, and a parabola through the
/// neighbouring costs refines it to sub-pixel precision. The scalar is the
/// absolute displacement in pixels, so chest motion produces a pulse per
/// inhale and exhale.
///
/// The first frame after construction or [`reset`](ScalarExtractor::reset)
/// only primes the reference and yields `None`.
#[derive(Debug, Clone)]
pub struct MotionExtractor {
    max_shift: usize,
    previous: Option<GrayFrame>,
}

impl Default for MotionExtractor {
    fn default() -> Self {
        Self { max_shift: DEFAULT_MAX_SHIFT, previous: None }
    }
}

impl MotionExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_shift(max_shift: usize) -> Self {
        Self { max_shift: max_shift.max(1), previous: None }
    }

    /// Signed vertical displacement of `current` relative to `previous`.
    fn vertical_shift(&self, previous: &GrayFrame, current: &GrayFrame) -> Option<f64> {
        let region = previous.center_region();
        if region.is_empty() {
            return None;
        }

        let max_shift = self.max_shift as isize;
        let costs: Vec<Option<f64>> = (-max_shift..=max_shift)
            .map(|shift| block_cost(previous, current, region, shift))
            .collect();

        // Lowest cost wins; ties go to the smaller displacement
        let mut best: Option<(usize, f64)> = None;
        for (idx, cost) in costs.iter().enumerate() {
            let Some(cost) = *cost else { continue };
            let shift = idx as isize - max_shift;
            best = match best {
                None => Some((idx, cost)),
                Some((best_idx, best_cost)) => {
                    let best_shift = best_idx as isize - max_shift;
                    if cost < best_cost || (cost == best_cost && shift.abs() < best_shift.abs()) {
                        Some((idx, cost))
                    } else {
                        Some((best_idx, best_cost))
                    }
                },
            };
        }
        let (best_idx, best_cost) = best?;

        let below = best_idx.checked_sub(1).and_then(|i| costs[i]);
        let above = costs.get(best_idx + 1).copied().flatten();
        let offset = match (below, above) {
            // An exact match needs no refinement
            _ if best_cost <= f64::EPSILON => 0.0,
            (Some(below), Some(above)) => {
                let curvature = below - 2.0 * best_cost + above;
                if curvature > f64::EPSILON {
                    ((below - above) / (2.0 * curvature)).clamp(-0.5, 0.5)
                } else {
                    0.0
                }
            },
            _ => 0.0,
        };

        Some(best_idx as f64 - max_shift as f64 + offset)
    }
}

/// Mean absolute difference between `previous` in `region` and `current`
/// displaced by `shift` rows. `None` when the shifted block leaves the frame.
fn block_cost(previous: &GrayFrame, current: &GrayFrame, region: Region, shift: isize) -> Option<f64> {
    let mut total: u64 = 0;
    let mut count: u64 = 0;
    for y in region.top..region.bottom {
        let target = y as isize + shift;
        if target < 0 || target >= current.height() as isize {
            continue;
        }
        let prev_row = &previous.row(y)[region.left..region.right];
        let cur_row = &current.row(target as usize)[region.left..region.right];
        total += prev_row
            .iter()
            .zip(cur_row)
            .map(|(&a, &b)| u64::from(a.abs_diff(b)))
            .sum::<u64>();
        count += prev_row.len() as u64;
    }
    (count > 0).then(|| total as f64 / count as f64)
}

impl ScalarExtractor for MotionExtractor {
    fn extract(&mut self, frame: &GrayFrame) -> Option<f64> {
        let displacement = match self.previous.as_ref() {
            Some(previous) if previous.width() == frame.width() && previous.height() == frame.height() => {
                self.vertical_shift(previous, frame)
            },
            _ => None,
        };
        self.previous = Some(frame.clone());
        displacement.map(f64::abs)
    }

    fn reset(&mut self) {
        self.previous = None;
    }
}
