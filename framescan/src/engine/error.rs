//! Error types for the engine control plane.

use super::job::JobId;
use thiserror::Error;

/// Errors surfaced by control-plane operations.
///
/// Per-job processing failures (analyzer init, stream reads) are not
/// errors at this level; they end the affected job with status `Error`
/// and are observed through `status`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Operation addressed a job id the registry has never allocated.
    ///
    /// Ids are only valid after `submit` returns; this never means
    /// "not yet started".
    #[error("no job with id {0}")]
    NotFound(JobId),
}
