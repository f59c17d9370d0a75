//! Per-job worker: drives one submission through its lifecycle.
//!
//! One worker task exists per submitted job. It blocks on the admission
//! gate, pulls frames through the analyzer, reports progress to the
//! registry, and observes the pause flag and its cancellation token at
//! every suspension point. The admission permit is a scoped value, so the
//! slot is returned on every exit path.

use super::gate::AdmissionGate;
use super::job::JobId;
use super::registry::ProgressReporter;
use super::status::JobStatus;
use crate::analyzer::{FrameAnalyzer, FrameStream};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Everything a worker needs to run one job.
pub(crate) struct JobWorker<A: FrameAnalyzer> {
    pub id: JobId,
    pub name: String,
    pub source: PathBuf,
    pub analyzer: Arc<A>,
    pub gate: AdmissionGate,
    pub progress: ProgressReporter,
    pub pause_rx: watch::Receiver<bool>,
    pub cancellation: CancellationToken,
}

impl<A: FrameAnalyzer> JobWorker<A> {
    /// Runs the job to a terminal state.
    pub(crate) async fn run(mut self) {
        // The Queued record exists since allocation; admission comes first.
        // Cancellation while queued never claims a slot.
        let _permit = tokio::select! {
            biased;

            _ = self.cancellation.cancelled() => {
                info!(job_id = %self.id, job_name = %self.name, "job canceled while queued");
                self.progress.send(JobStatus::Canceled, 0.0);
                return;
            }

            permit = self.gate.acquire() => permit,
        };

        self.progress.send(JobStatus::Processing, 0.0);
        info!(
            job_id = %self.id,
            job_name = %self.name,
            source = %self.source.display(),
            "job admitted, opening source"
        );

        let mut stream = match self.analyzer.open(&self.source).await {
            Ok(stream) => stream,
            Err(err) => {
                error!(job_id = %self.id, job_name = %self.name, error = %err, "analyzer init failed");
                self.progress.send(JobStatus::Error, 0.0);
                return;
            }
        };

        // May be approximate; progress derived from it is clamped and the
        // final record is forced to exactly 100.
        let total = stream.total_frames().max(1);
        let mut frame_count: u64 = 0;
        let mut percentage = 0.0_f64;

        loop {
            // Cancellation wins over pause and over further reads.
            if self.cancellation.is_cancelled() {
                info!(job_id = %self.id, job_name = %self.name, percentage, "job canceled");
                self.progress.send(JobStatus::Canceled, percentage);
                return;
            }

            if *self.pause_rx.borrow() {
                // Parked: no reads, no percentage advance. Cancellation
                // stays observable while waiting for the flag to flip.
                tokio::select! {
                    _ = self.cancellation.cancelled() => continue,
                    changed = self.pause_rx.changed() => {
                        if changed.is_err() {
                            // Registry gone mid-run; only teardown does this.
                            self.progress.send(JobStatus::Canceled, percentage);
                            return;
                        }
                        continue;
                    }
                }
            }

            let read = tokio::select! {
                biased;
                _ = self.cancellation.cancelled() => continue,
                read = stream.next_frame() => read,
            };

            match read {
                Ok(Some(frame)) => {
                    frame_count += 1;
                    // Recomputed per frame, never accumulated, so skipped
                    // updates self-correct.
                    percentage = (frame_count as f64 / total as f64 * 100.0).min(100.0);

                    let result = self.analyzer.analyze(&frame);
                    for detection in &result.detections {
                        debug!(
                            job_id = %self.id,
                            job_name = %self.name,
                            frame = frame.index,
                            label = %detection.label,
                            distance = detection.distance,
                            "subject matched in frame"
                        );
                    }

                    self.progress.send(JobStatus::Processing, percentage);
                }
                Ok(None) => {
                    info!(job_id = %self.id, job_name = %self.name, frames = frame_count, "job finished");
                    self.progress.send(JobStatus::Successful, 100.0);
                    return;
                }
                Err(err) => {
                    error!(job_id = %self.id, job_name = %self.name, error = %err, "stream read failed");
                    self.progress.send(JobStatus::Error, percentage);
                    return;
                }
            }
        }
    }
}
