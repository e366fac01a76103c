//! Gaussian low-pass smoothing.

/// Kernel half-width in standard deviations
const TRUNCATE: f64 = 4.0;

/// Convolves `data` with a normalised Gaussian of width `sigma` samples.
///
/// Edges are extended by half-sample symmetric reflection (`d c b a | a b c d | d c b a`),
/// so the output has the same length and no phase shift. A non-positive
/// `sigma` returns the input unchanged.
pub fn gaussian_smooth(data: &[f64], sigma: f64) -> Vec<f64> {
    if sigma <= 0.0 || data.len() < 2 {
        return data.to_vec();
    }

    let kernel = gaussian_kernel(sigma);
    let radius = (kernel.len() / 2) as isize;
    let n = data.len() as isize;

    (0..n)
        .map(|i| {
            kernel
                .iter()
                .enumerate()
                .map(|(k, weight)| weight * data[reflect(i + k as isize - radius, n)])
                .sum()
        })
        .collect()
}

fn gaussian_kernel(sigma: f64) -> Vec<f64> {
    let radius = (TRUNCATE * sigma + 0.5) as isize;
    let weights: Vec<f64> = (-radius..=radius)
        .map(|x| (-0.5 * (x * x) as f64 / (sigma * sigma)).exp())
        .collect();
    let total: f64 = weights.iter().sum();
    weights.into_iter().map(|w| w / total).collect()
}

fn reflect(index: isize, len: isize) -> usize {
    let period = 2 * len;
    let m = index.rem_euclid(period);
    (if m >= len { period - 1 - m } else { m }) as usize
}
