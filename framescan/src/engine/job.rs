//! Job identity and the registry record.

use super::status::JobStatus;
use serde::Serialize;
use std::fmt;

/// Unique identifier for a submitted job.
///
/// Ids are allocated by the registry, monotonically increasing, and never
/// reused within a process lifetime. They carry no meaning beyond identity.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct JobId(u64);

impl JobId {
    /// Wraps a raw id value. Only registry-allocated ids designate jobs;
    /// arbitrary values are useful for addressing errors in tests.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the numeric value of this job id.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Point-in-time view of a job, as held by the registry.
///
/// `percentage` is 0.0 until the job leaves `Queued`, recomputed per frame
/// while `Processing`, frozen while `Paused`, and exactly 100.0 on
/// `Successful`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct JobRecord {
    /// The job's unique id.
    pub id: JobId,

    /// Display name (typically the uploaded file name). Not unique.
    pub name: String,

    /// Current lifecycle state.
    pub status: JobStatus,

    /// Progress in percent, 0.0 to 100.0.
    pub percentage: f64,
}

impl JobRecord {
    pub(crate) fn queued(id: JobId, name: String) -> Self {
        Self {
            id,
            name,
            status: JobStatus::Queued,
            percentage: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_id_display_and_value() {
        let id = JobId::new(7);
        assert_eq!(format!("{}", id), "7");
        assert_eq!(id.as_u64(), 7);
    }

    #[test]
    fn test_job_id_equality_and_ordering() {
        assert_eq!(JobId::new(1), JobId::new(1));
        assert_ne!(JobId::new(1), JobId::new(2));
        assert!(JobId::new(1) < JobId::new(2));
    }

    #[test]
    fn test_queued_record_initial_fields() {
        let record = JobRecord::queued(JobId::new(3), "clip.mp4".to_string());
        assert_eq!(record.id, JobId::new(3));
        assert_eq!(record.name, "clip.mp4");
        assert_eq!(record.status, JobStatus::Queued);
        assert_eq!(record.percentage, 0.0);
    }

    #[test]
    fn test_record_serializes_for_polling() {
        let record = JobRecord::queued(JobId::new(1), "clip.mp4".to_string());
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"id\":1"));
        assert!(json.contains("\"status\":\"queued\""));
    }
}
