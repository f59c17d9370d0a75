//! Single-writer job registry.
//!
//! The registry owns the authoritative `JobId -> JobRecord` map. Every
//! mutation flows through one long-lived writer task draining an unbounded
//! event channel; readers go through the lock's read half only. Because
//! exactly one task takes the write lock for updates, workers never touch
//! the map and update ordering per sender is the channel's FIFO order.
//!
//! The writer also owns each live job's pause boolean (a `watch` sender),
//! so a toggle's resulting status is computed in exactly one place instead
//! of being distributed into the workers.

use super::error::EngineError;
use super::job::{JobId, JobRecord};
use super::status::JobStatus;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, watch, RwLock};
use tracing::{debug, warn};

/// Events consumed by the registry writer.
#[derive(Debug)]
pub(crate) enum RegistryEvent {
    /// A freshly allocated job's pause flag, handed to the writer.
    ///
    /// Sent from `allocate` before the id escapes to any caller, so it is
    /// ordered before every toggle addressed to that id.
    Register {
        id: JobId,
        pause_tx: watch::Sender<bool>,
    },

    /// A worker reporting a status/percentage change for its own job.
    Progress {
        id: JobId,
        status: JobStatus,
        percentage: f64,
    },

    /// A pause/resume toggle addressed to a job.
    Toggle { id: JobId },
}

/// Handle a worker uses to report progress for its job.
///
/// Sends are non-blocking (the event channel is unbounded) and preserve
/// emission order for this worker.
#[derive(Clone)]
pub(crate) struct ProgressReporter {
    tx: mpsc::UnboundedSender<RegistryEvent>,
    id: JobId,
}

impl ProgressReporter {
    pub(crate) fn send(&self, status: JobStatus, percentage: f64) {
        // Fails only if the writer is gone, i.e. the registry itself was
        // dropped during teardown; nothing left to record then.
        let _ = self.tx.send(RegistryEvent::Progress {
            id: self.id,
            status,
            percentage,
        });
    }
}

/// Per-job channel endpoints produced by `allocate`.
pub(crate) struct JobChannels {
    /// Worker-side view of the writer-owned pause flag.
    pub pause_rx: watch::Receiver<bool>,

    /// Progress path back to the writer.
    pub progress: ProgressReporter,
}

// =============================================================================
// Registry (reader/allocator half)
// =============================================================================

/// Authoritative store of job status, reachable for reads from anywhere.
pub(crate) struct JobRegistry {
    jobs: Arc<RwLock<HashMap<JobId, JobRecord>>>,
    events_tx: mpsc::UnboundedSender<RegistryEvent>,
    next_id: AtomicU64,
}

impl JobRegistry {
    /// Creates the registry and its writer half. The caller must spawn
    /// [`RegistryWriter::run`] for updates to be applied.
    pub(crate) fn new() -> (Self, RegistryWriter) {
        let jobs = Arc::new(RwLock::new(HashMap::new()));
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let registry = Self {
            jobs: Arc::clone(&jobs),
            events_tx,
            next_id: AtomicU64::new(0),
        };
        let writer = RegistryWriter {
            jobs,
            events_rx,
            pause_flags: HashMap::new(),
        };
        (registry, writer)
    }

    /// Allocates the next id and inserts its `Queued` record. Never fails.
    ///
    /// The record is visible to `get` before this returns; the job's pause
    /// flag is registered with the writer through the event channel.
    pub(crate) async fn allocate(&self, name: impl Into<String>) -> (JobId, JobChannels) {
        let id = JobId::new(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let record = JobRecord::queued(id, name.into());
        self.jobs.write().await.insert(id, record);

        let (pause_tx, pause_rx) = watch::channel(false);
        let _ = self.events_tx.send(RegistryEvent::Register { id, pause_tx });

        let channels = JobChannels {
            pause_rx,
            progress: ProgressReporter {
                tx: self.events_tx.clone(),
                id,
            },
        };
        (id, channels)
    }

    /// Returns the current record for a job.
    pub(crate) async fn get(&self, id: JobId) -> Result<JobRecord, EngineError> {
        self.jobs
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(EngineError::NotFound(id))
    }

    /// Returns all records, ordered by id.
    pub(crate) async fn snapshot(&self) -> Vec<JobRecord> {
        let mut records: Vec<JobRecord> = self.jobs.read().await.values().cloned().collect();
        records.sort_by_key(|record| record.id);
        records
    }

    /// Forwards a pause/resume toggle for an existing job.
    ///
    /// Toggling a job that is `Queued` or already terminal is accepted and
    /// has no effect; only unknown ids are an error.
    pub(crate) async fn toggle(&self, id: JobId) -> Result<(), EngineError> {
        if !self.jobs.read().await.contains_key(&id) {
            return Err(EngineError::NotFound(id));
        }
        let _ = self.events_tx.send(RegistryEvent::Toggle { id });
        Ok(())
    }
}

// =============================================================================
// Registry Writer
// =============================================================================

/// The single task that applies every registry mutation.
pub(crate) struct RegistryWriter {
    jobs: Arc<RwLock<HashMap<JobId, JobRecord>>>,
    events_rx: mpsc::UnboundedReceiver<RegistryEvent>,

    /// Pause flags for live jobs. Dropped at terminal transition.
    pause_flags: HashMap<JobId, watch::Sender<bool>>,
}

impl RegistryWriter {
    /// Drains events until every sender (the registry and all reporters)
    /// is gone.
    pub(crate) async fn run(mut self) {
        while let Some(event) = self.events_rx.recv().await {
            match event {
                RegistryEvent::Register { id, pause_tx } => {
                    self.pause_flags.insert(id, pause_tx);
                }
                RegistryEvent::Progress {
                    id,
                    status,
                    percentage,
                } => self.apply_progress(id, status, percentage).await,
                RegistryEvent::Toggle { id } => self.apply_toggle(id).await,
            }
        }
    }

    fn is_paused(&self, id: &JobId) -> bool {
        self.pause_flags
            .get(id)
            .map(|flag| *flag.borrow())
            .unwrap_or(false)
    }

    async fn apply_progress(&mut self, id: JobId, status: JobStatus, percentage: f64) {
        // A frame that finished while a pause toggle was in flight must not
        // flip the job back to Processing; the writer-owned flag wins.
        let status = if status == JobStatus::Processing && self.is_paused(&id) {
            JobStatus::Paused
        } else {
            status
        };

        let mut jobs = self.jobs.write().await;
        let Some(record) = jobs.get_mut(&id) else {
            warn!(job_id = %id, "progress for unknown job dropped");
            return;
        };
        if record.status.is_terminal() {
            debug!(job_id = %id, "progress after terminal state dropped");
            return;
        }

        record.status = status;
        record.percentage = percentage;

        if status.is_terminal() {
            // The worker has exited; nothing is left to toggle.
            self.pause_flags.remove(&id);
        }
    }

    async fn apply_toggle(&mut self, id: JobId) {
        let mut jobs = self.jobs.write().await;
        let Some(record) = jobs.get_mut(&id) else {
            return;
        };

        match record.status {
            JobStatus::Processing => {
                record.status = JobStatus::Paused;
                if let Some(flag) = self.pause_flags.get(&id) {
                    let _ = flag.send(true);
                }
                debug!(job_id = %id, percentage = record.percentage, "job paused");
            }
            JobStatus::Paused => {
                record.status = JobStatus::Processing;
                if let Some(flag) = self.pause_flags.get(&id) {
                    let _ = flag.send(false);
                }
                debug!(job_id = %id, percentage = record.percentage, "job resumed");
            }
            // Queued jobs have nothing to pause yet; terminal jobs are a no-op.
            _ => {
                debug!(job_id = %id, status = %record.status, "toggle ignored");
            }
        }
    }
}
