//! # Query and control boundary
//!
//! [`MonitorService`] is what a server layer holds: it owns the [`Session`]
//! and answers start, stop and polling requests with serializable responses.
//!
//! Start and stop go through an async mutex so they never interleave. Polling
//! ([`MonitorService::snapshot`], [`MonitorService::data`]) bypasses that
//! mutex entirely and reads through the session's [`QueryHandle`], so a poll
//! never waits behind a stop that is draining the acquisition loop.
//!
//! ## Example
//!
//! ```rust,no_run
//! use respiration_monitor::config::MonitorConfig;
//! use respiration_monitor::service::MonitorService;
//! use respiration_monitor::source::FrameScalarSource;
//!
//! async fn serve(source: Box<dyn FrameScalarSource>) -> respiration_monitor::Result<()> {
//!     let service = MonitorService::new(MonitorConfig::default(), source, None)?;
//!     assert!(service.start().await.success);
//!     println!("{}", serde_json::to_string(&service.snapshot())?);
//!     let stopped = service.stop().await;
//!     println!("rate: {:?}", stopped.respiration_rate);
//!     Ok(())
//! }
//! ```

mod types;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::warn;

pub use self::types::{DataResponse, RateStatus, StartResponse, StatusSnapshot, StopResponse};
use crate::config::MonitorConfig;
use crate::error::Result;
use crate::session::{QueryHandle, Session};
use crate::source::{FrameScalarSource, SampleSink};

/// Operations a server layer needs from a respiration monitor
#[async_trait]
pub trait RespirationMonitoring: Send + Sync {
    /// Begin a session; `success: false` when one is running or the source is unavailable
    async fn start(&self) -> StartResponse;

    /// End the session and estimate its rate
    async fn stop(&self) -> StopResponse;

    /// Current count, state and last rate
    async fn snapshot(&self) -> StatusSnapshot;

    /// Raw buffer contents
    async fn data(&self) -> DataResponse;
}

/// Owner of the single monitoring session
pub struct MonitorService {
    session: Mutex<Session>,
    query: QueryHandle,
}

impl MonitorService {
    pub fn new(
        config: MonitorConfig,
        source: Box<dyn FrameScalarSource>,
        sink: Option<Box<dyn SampleSink>>,
    ) -> Result<Self> {
        Ok(Self::from_session(Session::new(config, source, sink)?))
    }

    pub fn from_session(session: Session) -> Self {
        let query = session.query_handle();
        Self { session: Mutex::new(session), query }
    }

    pub fn query_handle(&self) -> QueryHandle {
        self.query.clone()
    }

    pub async fn start(&self) -> StartResponse {
        let mut session = self.session.lock().await;
        match session.start().await {
            Ok(()) => StartResponse { success: true },
            Err(e) => {
                warn!(error = %e, "Start request refused");
                StartResponse { success: false }
            },
        }
    }

    pub async fn stop(&self) -> StopResponse {
        let mut session = self.session.lock().await;
        match session.stop().await {
            Ok(result) => StopResponse::from_result(result),
            Err(e) => {
                warn!(error = %e, "Stop request refused");
                StopResponse::failed()
            },
        }
    }

    /// Releases the source while idle; safe to repeat.
    pub async fn release(&self) -> Result<()> {
        self.session.lock().await.release().await
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        let monitoring = self.query.is_monitoring();
        let last = if monitoring { None } else { self.query.last_result() };
        StatusSnapshot {
            count: self.query.sample_count(),
            monitoring,
            session: self.query.session_index(),
            rate: last.as_ref().and_then(|r| r.bpm()),
            status: RateStatus::from(last.as_ref()),
        }
    }

    pub fn data(&self) -> DataResponse {
        let series = self.query.series();
        DataResponse {
            count: series.len(),
            values: series.values(),
            timestamps: series.timestamps(),
            monitoring: self.query.is_monitoring(),
            stats: self.query.stats(),
        }
    }
}

#[async_trait]
impl RespirationMonitoring for MonitorService {
    async fn start(&self) -> StartResponse {
        MonitorService::start(self).await
    }

    async fn stop(&self) -> StopResponse {
        MonitorService::stop(self).await
    }

    async fn snapshot(&self) -> StatusSnapshot {
        MonitorService::snapshot(self)
    }

    async fn data(&self) -> DataResponse {
        MonitorService::data(self)
    }
}
