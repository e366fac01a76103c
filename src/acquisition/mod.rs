//! # Acquisition Loop
//!
//! The producer side of a session: a background task that pulls one scalar per
//! tick from a [`FrameScalarSource`], timestamps it relative to the session
//! start and appends it to the shared [`SeriesBuffer`].
//!
//! ## Timing
//!
//! Each tick sleeps only for what is left of the sampling interval after the
//! read, so a slow read does not push every later sample back.
//!
//! ## Failure handling
//!
//! The stop channel is watched during the read as well as during the sleep,
//! so a source that stalls cannot hold up a stop.
//!
//! A failed read skips the tick. After `max_consecutive_failures` failures in
//! a row the loop pauses for `failure_backoff` before trying again. The loop
//! itself never gives up; it ends only when the stop channel fires or its
//! sender is dropped, and then hands the source and sink back to the caller so
//! the session can release them.


use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, trace, warn};

use crate::config::AcquisitionConfig;
use crate::series::{Sample, SeriesBuffer};
use crate::source::{FrameScalarSource, SampleSink};

/// Counters describing the health of the running acquisition
#[derive(Debug, Default)]
pub struct AcquisitionStats {
    samples: AtomicU64,
    read_failures: AtomicU64,
    backoffs: AtomicU64,
    sink_failures: AtomicU64,
}

/// Point-in-time copy of [`AcquisitionStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcquisitionSnapshot {
    pub samples: u64,
    pub read_failures: u64,
    pub backoffs: u64,
    pub sink_failures: u64,
}

impl AcquisitionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> AcquisitionSnapshot {
        AcquisitionSnapshot {
            samples: self.samples.load(Ordering::Relaxed),
            read_failures: self.read_failures.load(Ordering::Relaxed),
            backoffs: self.backoffs.load(Ordering::Relaxed),
            sink_failures: self.sink_failures.load(Ordering::Relaxed),
        }
    }

    pub fn reset(&self) {
        self.samples.store(0, Ordering::Relaxed);
        self.read_failures.store(0, Ordering::Relaxed);
        self.backoffs.store(0, Ordering::Relaxed);
        self.sink_failures.store(0, Ordering::Relaxed);
    }

    fn record_sample(&self) {
        self.samples.fetch_add(1, Ordering::Relaxed);
    }

    fn record_read_failure(&self) {
        self.read_failures.fetch_add(1, Ordering::Relaxed);
    }

    fn record_backoff(&self) {
        self.backoffs.fetch_add(1, Ordering::Relaxed);
    }

    fn record_sink_failure(&self) {
        self.sink_failures.fetch_add(1, Ordering::Relaxed);
    }
}

/// When to pause after failed reads, and for how long
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_consecutive_failures: u32,
    pub backoff: Duration,
}

impl From<&AcquisitionConfig> for RetryPolicy {
    fn from(config: &AcquisitionConfig) -> Self {
        Self {
            max_consecutive_failures: config.max_consecutive_failures.max(1),
            backoff: config.failure_backoff(),
        }
    }
}

/// Resources owned by the loop while it runs, returned when it ends
pub struct LoopParts {
    pub source: Box<dyn FrameScalarSource>,
    pub sink: Option<Box<dyn SampleSink>>,
}

/// The periodic producer feeding a [`SeriesBuffer`]
pub struct AcquisitionLoop {
    source: Box<dyn FrameScalarSource>,
    sink: Option<Box<dyn SampleSink>>,
    buffer: Arc<SeriesBuffer>,
    stats: Arc<AcquisitionStats>,
    interval: Duration,
    policy: RetryPolicy,
    started_at: Instant,
}

impl AcquisitionLoop {
    /// Prepares a loop whose timestamps count from `started_at`.
    ///
    /// The source must already be acquired.
    pub fn new(
        parts: LoopParts,
        buffer: Arc<SeriesBuffer>,
        stats: Arc<AcquisitionStats>,
        config: &AcquisitionConfig,
        started_at: Instant,
    ) -> Self {
        Self {
            source: parts.source,
            sink: parts.sink,
            buffer,
            stats,
            interval: config.sample_interval(),
            policy: RetryPolicy::from(config),
            started_at,
        }
    }

    /// Runs until `stop_rx` receives a signal or is closed.
    pub async fn run(mut self, mut stop_rx: mpsc::Receiver<()>) -> LoopParts {
        let mut consecutive_failures: u32 = 0;

        loop {
            let tick_started = Instant::now();

            let read = tokio::select! {
                biased;
                _ = stop_rx.recv() => break,
                read = self.source.next_scalar() => read,
            };

            let pause = match read {
                Ok(value) => {
                    consecutive_failures = 0;
                    self.record(value);
                    self.interval.saturating_sub(tick_started.elapsed())
                },
                Err(e) => {
                    consecutive_failures += 1;
                    self.stats.record_read_failure();
                    debug!(error = %e, consecutive_failures, "Scalar read failed, skipping tick");

                    if consecutive_failures >= self.policy.max_consecutive_failures {
                        warn!(
                            consecutive_failures,
                            backoff_ms = self.policy.backoff.as_millis() as u64,
                            "Repeated read failures, backing off"
                        );
                        self.stats.record_backoff();
                        consecutive_failures = 0;
                        self.policy.backoff
                    } else {
                        self.interval.saturating_sub(tick_started.elapsed())
                    }
                },
            };

            tokio::select! {
                biased;
                _ = stop_rx.recv() => break,
                _ = tokio::time::sleep(pause) => {},
            }
        }

        debug!(samples = self.stats.snapshot().samples, "Acquisition loop stopped");
        LoopParts { source: self.source, sink: self.sink }
    }

    fn record(&mut self, value: f64) {
        let sample = Sample::new(self.started_at.elapsed().as_secs_f64(), value);
        self.buffer.append(sample);
        self.stats.record_sample();
        trace!(t = sample.t, v = sample.v, "Sample");

        if let Some(sink) = self.sink.as_mut() {
            if let Err(e) = sink.append(&sample) {
                self.stats.record_sink_failure();
                warn!(error = %e, "Failed to write sample to log");
            }
        }
    }
}
