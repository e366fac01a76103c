use std::f64::consts::PI;

use respiration_monitor::series::{Sample, Series};

/// Builder for synthetic breathing signals
///
/// Produces `offset + amplitude * sin(2π t / period) + noise`, with uniform
/// noise from a fixed-seed generator so every run sees the same series.
#[derive(Debug, Clone)]
pub struct TestSignalBuilder {
    sample_rate_hz: f64,
    duration_secs: f64,
    period_secs: f64,
    amplitude: f64,
    offset: f64,
    noise: f64,
    seed: u64,
}

impl TestSignalBuilder {
    /// 5 Hz for 60 s, 6 s period, unit amplitude around 25, no noise
    pub fn new() -> Self {
        Self {
            sample_rate_hz: 5.0,
            duration_secs: 60.0,
            period_secs: 6.0,
            amplitude: 1.0,
            offset: 25.0,
            noise: 0.0,
            seed: 0x5eed,
        }
    }

    pub fn sample_rate(mut self, hz: f64) -> Self {
        self.sample_rate_hz = hz;
        self
    }

    pub fn duration(mut self, secs: f64) -> Self {
        self.duration_secs = secs;
        self
    }

    pub fn period(mut self, secs: f64) -> Self {
        self.period_secs = secs;
        self
    }

    pub fn amplitude(mut self, amplitude: f64) -> Self {
        self.amplitude = amplitude;
        self
    }

    pub fn offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    /// Half-width of the uniform noise band
    pub fn noise(mut self, noise: f64) -> Self {
        self.noise = noise;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Clean signal value at `t` seconds
    pub fn value_at(&self, t: f64) -> f64 {
        self.offset + self.amplitude * (2.0 * PI * t / self.period_secs).sin()
    }

    /// Value generator indexed by sample number, for scripted sources
    pub fn generator(&self) -> impl FnMut(u64) -> f64 + Send + 'static {
        let builder = self.clone();
        let mut noise = Xorshift::new(self.seed);
        move |n| builder.value_at(n as f64 / builder.sample_rate_hz) + noise.next_symmetric() * builder.noise
    }

    pub fn build(&self) -> Series {
        let count = (self.duration_secs * self.sample_rate_hz).round() as u64;
        let mut generator = self.generator();
        (0..count)
            .map(|n| Sample::new(n as f64 / self.sample_rate_hz, generator(n)))
            .collect()
    }
}

impl Default for TestSignalBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
struct Xorshift(u64);

impl Xorshift {
    fn new(seed: u64) -> Self {
        Self(seed.max(1))
    }

    /// Uniform in `[-1, 1)`
    fn next_symmetric(&mut self) -> f64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        (self.0 >> 11) as f64 / (1u64 << 53) as f64 * 2.0 - 1.0
    }
}
