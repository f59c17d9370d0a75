//! Job lifecycle status.

use serde::Serialize;

/// Lifecycle state of a submitted job.
///
/// Every job starts `Queued`. `Error`, `Canceled`, and `Successful` are
/// terminal: once reached, the job's record never changes again and its
/// admission slot is released.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Waiting for an admission slot.
    #[default]
    Queued,

    /// Consuming frames.
    Processing,

    /// Suspended by a toggle; holds its admission slot, reads no frames.
    Paused,

    /// Analyzer init or stream read failed.
    Error,

    /// Canceled by the caller.
    Canceled,

    /// Stream exhausted normally; percentage is exactly 100.
    Successful,
}

impl JobStatus {
    /// Returns true if this is a terminal state (job is complete).
    ///
    /// Terminal states are: Error, Canceled, Successful.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Error | Self::Canceled | Self::Successful)
    }

    /// Returns true if the job holds an admission slot (Processing or Paused).
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Processing | Self::Paused)
    }

    /// Returns true if the job is currently paused.
    pub fn is_paused(&self) -> bool {
        matches!(self, Self::Paused)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Queued => write!(f, "Queued"),
            Self::Processing => write!(f, "Processing"),
            Self::Paused => write!(f, "Paused"),
            Self::Error => write!(f, "Error"),
            Self::Canceled => write!(f, "Canceled"),
            Self::Successful => write!(f, "Successful"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_is_terminal() {
        assert!(!JobStatus::Queued.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
        assert!(!JobStatus::Paused.is_terminal());
        assert!(JobStatus::Error.is_terminal());
        assert!(JobStatus::Canceled.is_terminal());
        assert!(JobStatus::Successful.is_terminal());
    }

    #[test]
    fn test_status_is_active() {
        assert!(!JobStatus::Queued.is_active());
        assert!(JobStatus::Processing.is_active());
        assert!(JobStatus::Paused.is_active());
        assert!(!JobStatus::Successful.is_active());
        assert!(!JobStatus::Canceled.is_active());
        assert!(!JobStatus::Error.is_active());
    }

    #[test]
    fn test_status_is_paused() {
        assert!(JobStatus::Paused.is_paused());
        assert!(!JobStatus::Processing.is_paused());
        assert!(!JobStatus::Queued.is_paused());
    }

    #[test]
    fn test_status_default_is_queued() {
        assert_eq!(JobStatus::default(), JobStatus::Queued);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(format!("{}", JobStatus::Queued), "Queued");
        assert_eq!(format!("{}", JobStatus::Processing), "Processing");
        assert_eq!(format!("{}", JobStatus::Successful), "Successful");
    }
}
