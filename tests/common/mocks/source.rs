use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use respiration_monitor::error::{AcquisitionError, Error, Result};
use respiration_monitor::source::FrameScalarSource;

type Script = Box<dyn FnMut(u64) -> std::result::Result<f64, AcquisitionError> + Send>;

/// Call counts shared between a [`ScriptedSource`] and the test
#[derive(Debug, Clone, Default)]
pub struct SourceCounters {
    acquired: Arc<AtomicUsize>,
    released: Arc<AtomicUsize>,
    reads: Arc<AtomicUsize>,
}

impl SourceCounters {
    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

/// Scalar source driven by a closure over the read index
///
/// Tracks whether it is held, so a release of an idle source is counted as a
/// no-op rather than a second release.
pub struct ScriptedSource {
    script: Script,
    reads: u64,
    held: bool,
    unavailable: bool,
    counters: SourceCounters,
}

impl ScriptedSource {
    pub fn new<F>(script: F) -> Self
    where
        F: FnMut(u64) -> std::result::Result<f64, AcquisitionError> + Send + 'static,
    {
        Self {
            script: Box::new(script),
            reads: 0,
            held: false,
            unavailable: false,
            counters: SourceCounters::default(),
        }
    }

    /// Infallible source returning `values(n)` for the n-th read
    pub fn from_values<F>(mut values: F) -> Self
    where
        F: FnMut(u64) -> f64 + Send + 'static,
    {
        Self::new(move |n| Ok(values(n)))
    }

    /// A source whose device can never be opened
    pub fn unavailable() -> Self {
        let mut source = Self::from_values(|_| 0.0);
        source.unavailable = true;
        source
    }

    pub fn counters(&self) -> SourceCounters {
        self.counters.clone()
    }
}

#[async_trait]
impl FrameScalarSource for ScriptedSource {
    async fn acquire(&mut self) -> Result<()> {
        if self.unavailable {
            return Err(Error::SourceUnavailable("device not found".to_string()));
        }
        self.held = true;
        self.counters.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn next_scalar(&mut self) -> std::result::Result<f64, AcquisitionError> {
        let n = self.reads;
        self.reads += 1;
        self.counters.reads.fetch_add(1, Ordering::SeqCst);
        (self.script)(n)
    }

    async fn release(&mut self) {
        if self.held {
            self.held = false;
            self.counters.released.fetch_add(1, Ordering::SeqCst);
        }
    }
}
