//! Engine facade: the control-plane surface.
//!
//! [`AnalysisEngine`] ties the registry, the admission gate, and the
//! per-job workers together behind the four operations external callers
//! use: submit, status, switch_state, and cancel. Submission is
//! fire-and-forget; completion is observed by polling `status`.

use super::config::EngineConfig;
use super::error::EngineError;
use super::gate::AdmissionGate;
use super::job::{JobId, JobRecord};
use super::registry::JobRegistry;
use super::worker::JobWorker;
use crate::analyzer::FrameAnalyzer;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// The job orchestration engine.
///
/// Generic over the [`FrameAnalyzer`] that does the per-frame work; one
/// analyzer instance serves every submitted job. Creating an engine spawns
/// its registry writer task, so construction must happen inside a tokio
/// runtime.
pub struct AnalysisEngine<A: FrameAnalyzer> {
    analyzer: Arc<A>,
    registry: Arc<JobRegistry>,
    gate: AdmissionGate,

    /// Live jobs' cancellation tokens; entries are removed on worker exit.
    cancellations: Arc<Mutex<HashMap<JobId, CancellationToken>>>,

    /// Parent of every job token; `shutdown` cancels all at once.
    shutdown: CancellationToken,
}

impl<A: FrameAnalyzer> AnalysisEngine<A> {
    /// Creates an engine and spawns its registry writer.
    pub fn new(config: EngineConfig, analyzer: A) -> Self {
        let (registry, writer) = JobRegistry::new();
        tokio::spawn(writer.run());

        info!(capacity = config.capacity, "analysis engine started");

        Self {
            analyzer: Arc::new(analyzer),
            registry: Arc::new(registry),
            gate: AdmissionGate::new(config.capacity),
            cancellations: Arc::new(Mutex::new(HashMap::new())),
            shutdown: CancellationToken::new(),
        }
    }

    /// Submits a source for analysis and returns its job id immediately.
    ///
    /// The job starts `Queued` and is driven by its own task; multiple
    /// submissions run concurrently, bounded only by the admission gate.
    pub async fn submit(&self, source: impl Into<PathBuf>, name: impl Into<String>) -> JobId {
        let source = source.into();
        let name = name.into();

        let (id, channels) = self.registry.allocate(name.clone()).await;
        let cancellation = self.shutdown.child_token();
        self.cancellations
            .lock()
            .await
            .insert(id, cancellation.clone());

        info!(job_id = %id, job_name = %name, "job submitted");

        let worker = JobWorker {
            id,
            name,
            source,
            analyzer: Arc::clone(&self.analyzer),
            gate: self.gate.clone(),
            progress: channels.progress,
            pause_rx: channels.pause_rx,
            cancellation,
        };

        let cancellations = Arc::clone(&self.cancellations);
        tokio::spawn(async move {
            worker.run().await;
            cancellations.lock().await.remove(&id);
        });

        id
    }

    /// Returns the current record for a job. Safe for frequent polling.
    pub async fn status(&self, id: JobId) -> Result<JobRecord, EngineError> {
        self.registry.get(id).await
    }

    /// Returns all job records, ordered by id.
    pub async fn jobs(&self) -> Vec<JobRecord> {
        self.registry.snapshot().await
    }

    /// Toggles a job between `Processing` and `Paused`.
    ///
    /// This is a toggle, not an idempotent pause: sending it twice returns
    /// the job to its prior state. Addressing a `Queued` or terminal job
    /// succeeds as a no-op; only unknown ids fail.
    pub async fn switch_state(&self, id: JobId) -> Result<(), EngineError> {
        self.registry.toggle(id).await
    }

    /// Requests cancellation of one job.
    ///
    /// Best-effort: the worker observes the token within one frame-read or
    /// signal-check cycle, including while paused. Cancelling a job that
    /// already finished is a no-op.
    pub async fn cancel(&self, id: JobId) -> Result<(), EngineError> {
        // Unknown ids surface NotFound before any signalling.
        self.registry.get(id).await?;
        if let Some(token) = self.cancellations.lock().await.get(&id) {
            info!(job_id = %id, "cancellation requested");
            token.cancel();
        }
        Ok(())
    }

    /// Cancels every live job. Records remain readable afterwards.
    pub fn shutdown(&self) {
        info!("engine shutdown, cancelling live jobs");
        self.shutdown.cancel();
    }

    /// Returns the admission gate capacity.
    pub fn capacity(&self) -> usize {
        self.gate.capacity()
    }
}

impl<A: FrameAnalyzer> std::fmt::Debug for AnalysisEngine<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisEngine")
            .field("capacity", &self.gate.capacity())
            .field("available_slots", &self.gate.available())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::SimulatedAnalyzer;
    use crate::engine::status::JobStatus;
    use std::time::Duration;

    #[tokio::test]
    async fn test_submit_returns_distinct_ids() {
        let engine = AnalysisEngine::new(EngineConfig::with_capacity(2), SimulatedAnalyzer::new(1));
        let a = engine.submit("a.mp4", "a.mp4").await;
        let b = engine.submit("b.mp4", "b.mp4").await;
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_status_unknown_id_is_not_found() {
        let engine = AnalysisEngine::new(EngineConfig::with_capacity(1), SimulatedAnalyzer::new(1));
        let err = engine.status(JobId::new(123)).await.unwrap_err();
        assert_eq!(err, EngineError::NotFound(JobId::new(123)));
    }

    #[tokio::test]
    async fn test_shutdown_cancels_live_jobs() {
        let analyzer =
            SimulatedAnalyzer::new(1_000).with_frame_delay(Duration::from_millis(20));
        let engine = AnalysisEngine::new(EngineConfig::with_capacity(2), analyzer);

        let a = engine.submit("a.mp4", "a.mp4").await;
        let b = engine.submit("b.mp4", "b.mp4").await;
        tokio::time::sleep(Duration::from_millis(50)).await;

        engine.shutdown();

        let canceled = tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                let status_a = engine.status(a).await.unwrap().status;
                let status_b = engine.status(b).await.unwrap().status;
                if status_a == JobStatus::Canceled && status_b == JobStatus::Canceled {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await;
        assert!(canceled.is_ok(), "jobs should cancel after shutdown");
    }
}
