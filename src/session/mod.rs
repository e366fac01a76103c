//! # Session State Machine
//!
//! A [`Session`] is either `Idle` or `Monitoring`. Starting spawns the
//! acquisition loop on a fresh buffer; stopping halts it cooperatively, gives
//! the source back, and runs the estimator once on what was collected.
//!
//! Misuse is reported, never acted on: a second `start` while monitoring
//! returns [`Error::AlreadyMonitoring`] and leaves the running session alone,
//! and `stop` while idle returns [`Error::NotMonitoring`].
//!
//! Readers that must not wait for `start`/`stop` use a [`QueryHandle`], which
//! only touches the buffer's snapshot and a few atomics.


use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::acquisition::{AcquisitionLoop, AcquisitionSnapshot, AcquisitionStats, LoopParts};
use crate::config::MonitorConfig;
use crate::error::{Error, Result};
use crate::estimator::{self, EstimationResult};
use crate::series::{Series, SeriesBuffer};
use crate::source::{FrameScalarSource, SampleSink};

/// Lifecycle state of a [`Session`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Monitoring,
}

/// State readable without holding the session
#[derive(Debug)]
struct Shared {
    buffer: Arc<SeriesBuffer>,
    stats: Arc<AcquisitionStats>,
    monitoring: AtomicBool,
    session_index: AtomicU64,
    last_result: RwLock<Option<EstimationResult>>,
}

/// Cheap, cloneable read access to a session's live data
#[derive(Debug, Clone)]
pub struct QueryHandle {
    shared: Arc<Shared>,
}

impl QueryHandle {
    pub fn state(&self) -> SessionState {
        if self.is_monitoring() {
            SessionState::Monitoring
        } else {
            SessionState::Idle
        }
    }

    pub fn is_monitoring(&self) -> bool {
        self.shared.monitoring.load(Ordering::Acquire)
    }

    /// Samples currently held by the buffer
    pub fn sample_count(&self) -> usize {
        self.shared.buffer.len()
    }

    /// Consistent copy of the buffer contents
    pub fn series(&self) -> Series {
        self.shared.buffer.snapshot()
    }

    pub fn stats(&self) -> AcquisitionSnapshot {
        self.shared.stats.snapshot()
    }

    /// Number of sessions started so far; `0` before the first start
    pub fn session_index(&self) -> u64 {
        self.shared.session_index.load(Ordering::Acquire)
    }

    /// Verdict of the most recent stop, cleared by the next start
    pub fn last_result(&self) -> Option<EstimationResult> {
        self.shared.last_result.read().clone()
    }
}

struct ActiveAcquisition {
    stop_tx: mpsc::Sender<()>,
    task: JoinHandle<LoopParts>,
}

/// Owner of one scalar source, its buffer and the acquisition lifecycle
pub struct Session {
    config: MonitorConfig,
    shared: Arc<Shared>,
    source: Option<Box<dyn FrameScalarSource>>,
    sink: Option<Box<dyn SampleSink>>,
    active: Option<ActiveAcquisition>,
}

impl Session {
    /// Creates an idle session.
    ///
    /// # Arguments
    ///
    /// * `config` - Validated before use
    /// * `source` - Acquired on every `start`, released on every `stop`
    /// * `sink` - Optional durable copy of every sample
    ///
    /// # Returns
    ///
    /// * `Err(Error::InvalidConfig)` - When `config` fails validation
    pub fn new(
        config: MonitorConfig,
        source: Box<dyn FrameScalarSource>,
        sink: Option<Box<dyn SampleSink>>,
    ) -> Result<Self> {
        config.validate()?;
        let shared = Arc::new(Shared {
            buffer: Arc::new(SeriesBuffer::new(config.acquisition.max_points)),
            stats: Arc::new(AcquisitionStats::new()),
            monitoring: AtomicBool::new(false),
            session_index: AtomicU64::new(0),
            last_result: RwLock::new(None),
        });
        Ok(Self { config, shared, source: Some(source), sink, active: None })
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        if self.active.is_some() {
            SessionState::Monitoring
        } else {
            SessionState::Idle
        }
    }

    pub fn query_handle(&self) -> QueryHandle {
        QueryHandle { shared: Arc::clone(&self.shared) }
    }

    /// Acquires the source and starts sampling into a cleared buffer.
    ///
    /// Nothing changes when this fails: the previous buffer and result stay
    /// readable and the session stays idle.
    pub async fn start(&mut self) -> Result<()> {
        if self.active.is_some() {
            debug!("Start ignored, already monitoring");
            return Err(Error::AlreadyMonitoring);
        }

        let mut source = self
            .source
            .take()
            .ok_or_else(|| Error::task_failed("scalar source was lost with a failed acquisition task"))?;
        if let Err(e) = source.acquire().await {
            self.source = Some(source);
            warn!(error = %e, "Could not acquire scalar source");
            return Err(match e {
                Error::SourceUnavailable(_) => e,
                other => Error::source_unavailable(other.to_string()),
            });
        }

        self.shared.buffer.clear();
        self.shared.stats.reset();
        *self.shared.last_result.write() = None;

        let (stop_tx, stop_rx) = mpsc::channel(1);
        let parts = LoopParts { source, sink: self.sink.take() };
        let acquisition = AcquisitionLoop::new(
            parts,
            Arc::clone(&self.shared.buffer),
            Arc::clone(&self.shared.stats),
            &self.config.acquisition,
            Instant::now(),
        );
        let task = tokio::spawn(acquisition.run(stop_rx));
        self.active = Some(ActiveAcquisition { stop_tx, task });

        self.shared.monitoring.store(true, Ordering::Release);
        let session = self.shared.session_index.fetch_add(1, Ordering::AcqRel) + 1;
        info!(session, sample_rate_hz = self.config.acquisition.sample_rate_hz, "Monitoring started");
        Ok(())
    }

    /// Halts acquisition, releases the source and estimates the rate.
    ///
    /// Waits for the loop to acknowledge the stop signal, which takes at most
    /// one sampling interval (or one backoff pause).
    pub async fn stop(&mut self) -> Result<EstimationResult> {
        let Some(active) = self.active.take() else {
            debug!("Stop ignored, not monitoring");
            return Err(Error::NotMonitoring);
        };

        // A closed channel means the loop is already gone; joining covers both cases
        let _ = active.stop_tx.send(()).await;
        match active.task.await {
            Ok(mut parts) => {
                parts.source.release().await;
                self.source = Some(parts.source);
                self.sink = parts.sink;
            },
            Err(e) => error!(error = %e, "Acquisition task failed, scalar source dropped"),
        }

        let series = self.shared.buffer.snapshot();
        let result = estimator::estimate(&series, &self.config.estimator);
        *self.shared.last_result.write() = Some(result.clone());
        self.shared.monitoring.store(false, Ordering::Release);

        info!(
            session = self.shared.session_index.load(Ordering::Acquire),
            sample_count = series.len(),
            status = result.label(),
            "Monitoring stopped"
        );
        Ok(result)
    }

    /// Releases the source again while idle; a no-op for a released source.
    pub async fn release(&mut self) -> Result<()> {
        if self.active.is_some() {
            return Err(Error::AlreadyMonitoring);
        }
        if let Some(source) = self.source.as_mut() {
            source.release().await;
        }
        Ok(())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(active) = self.active.take() {
            // The loop exits on its next tick and drops the source with it
            let _ = active.stop_tx.try_send(());
        }
    }
}
