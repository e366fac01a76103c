//! Local-maximum detection with height, distance and prominence constraints.
//!
//! The filters run in the same order as the usual scientific-Python peak
//! finder (height, then distance, then prominence), so thresholds tuned there
//! carry over unchanged.

/// Constraints a local maximum has to meet to count as a peak
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakCriteria {
    /// Minimum value of the peak sample
    pub min_height: f64,
    /// Minimum prominence above the surrounding baseline
    pub min_prominence: f64,
    /// Minimum index separation between accepted peaks; `1` disables the filter
    pub min_distance: usize,
}

/// Indices of the peaks in `x` meeting `criteria`, in ascending order.
pub fn find_peaks(x: &[f64], criteria: &PeakCriteria) -> Vec<usize> {
    let mut peaks: Vec<usize> = local_maxima(x)
        .into_iter()
        .filter(|&p| x[p] >= criteria.min_height)
        .collect();

    if criteria.min_distance > 1 && peaks.len() > 1 {
        peaks = select_by_distance(x, &peaks, criteria.min_distance);
    }

    peaks.retain(|&p| prominence(x, p) >= criteria.min_prominence);
    peaks
}

/// All strict local maxima. A flat top counts once, at its middle sample
/// (rounded down); the first and last samples never count.
pub fn local_maxima(x: &[f64]) -> Vec<usize> {
    let mut maxima = Vec::new();
    if x.len() < 3 {
        return maxima;
    }

    let last = x.len() - 1;
    let mut i = 1;
    while i < last {
        if x[i - 1] < x[i] {
            let mut ahead = i + 1;
            while ahead < last && x[ahead] == x[i] {
                ahead += 1;
            }
            if x[ahead] < x[i] {
                maxima.push((i + ahead - 1) / 2);
                i = ahead;
            }
        }
        i += 1;
    }
    maxima
}

/// Height of `x[peak]` above the higher of its two bases.
///
/// Each base is the lowest sample between the peak and the nearest higher
/// sample on that side (or the end of the signal).
pub fn prominence(x: &[f64], peak: usize) -> f64 {
    let height = x[peak];

    let left_min = x[..=peak]
        .iter()
        .rev()
        .take_while(|&&v| v <= height)
        .fold(height, |min, &v| min.min(v));
    let right_min = x[peak..]
        .iter()
        .take_while(|&&v| v <= height)
        .fold(height, |min, &v| min.min(v));

    height - left_min.max(right_min)
}

/// Drops peaks closer than `distance` samples to a higher one, visiting the
/// highest peaks first.
fn select_by_distance(x: &[f64], peaks: &[usize], distance: usize) -> Vec<usize> {
    let mut keep = vec![true; peaks.len()];

    let mut by_height: Vec<usize> = (0..peaks.len()).collect();
    by_height.sort_by(|&a, &b| x[peaks[a]].total_cmp(&x[peaks[b]]));

    for &j in by_height.iter().rev() {
        if !keep[j] {
            continue;
        }
        for k in (0..j).rev() {
            if peaks[j] - peaks[k] >= distance {
                break;
            }
            keep[k] = false;
        }
        for k in j + 1..peaks.len() {
            if peaks[k] - peaks[j] >= distance {
                break;
            }
            keep[k] = false;
        }
    }

    peaks
        .iter()
        .zip(keep)
        .filter_map(|(&p, kept)| kept.then_some(p))
        .collect()
}
