//! Frame analyzer boundary.
//!
//! The engine drives per-frame computer vision through the traits in this
//! module and treats the results as opaque: it logs detections and derives
//! progress from frame counts, nothing more. The heavy lifting (face
//! detection, descriptor extraction, gallery matching) lives behind
//! [`FrameAnalyzer`] so the orchestration core never depends on a specific
//! vision stack.
//!
//! # Example
//!
//! ```ignore
//! use framescan::analyzer::{FrameAnalyzer, FrameStream};
//!
//! async fn consume<A: FrameAnalyzer>(analyzer: &A, source: &std::path::Path) {
//!     let mut stream = analyzer.open(source).await?;
//!     while let Some(frame) = stream.next_frame().await? {
//!         let result = analyzer.analyze(&frame);
//!         println!("frame {}: {} detections", frame.index, result.detections.len());
//!     }
//! }
//! ```

pub mod simulated;

pub use simulated::{SimulatedAnalyzer, SourceScript};

use std::future::Future;
use std::path::{Path, PathBuf};
use thiserror::Error;

// =============================================================================
// Frame Data
// =============================================================================

/// A single decoded frame handed to the analyzer.
#[derive(Clone, Debug)]
pub struct Frame {
    /// Zero-based index within the source stream.
    pub index: u64,

    /// Raw frame payload. Contents are opaque to the engine.
    pub data: Vec<u8>,
}

/// One recognized subject within a frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    /// Display label of the closest known subject.
    pub label: String,

    /// Euclidean distance to that subject's descriptor. Lower is closer.
    pub distance: f64,
}

/// Per-frame analysis outcome.
///
/// The engine only logs these; their content never influences scheduling.
#[derive(Clone, Debug, Default)]
pub struct AnalysisResult {
    /// Index of the frame this result belongs to.
    pub frame_index: u64,

    /// Subjects recognized in the frame, if any.
    pub detections: Vec<Detection>,
}

// =============================================================================
// Errors
// =============================================================================

/// The analyzer failed to initialize for a source.
///
/// Typically a missing or invalid model file, or an unreadable source.
/// Fatal to that job only; never retried.
#[derive(Debug, Error)]
#[error("analyzer init failed for {path}: {message}", path = .path.display())]
pub struct AnalyzerInitError {
    /// Source the analyzer was asked to open.
    pub path: PathBuf,

    /// Human-readable failure description.
    pub message: String,
}

impl AnalyzerInitError {
    /// Creates a new init error for the given source.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// The underlying source could not be read mid-stream.
///
/// Terminal for the job; never retried.
#[derive(Debug, Error)]
#[error("stream read failed at frame {frame_index}: {message}")]
pub struct StreamReadError {
    /// Index of the frame whose read failed.
    pub frame_index: u64,

    /// Human-readable failure description.
    pub message: String,
}

impl StreamReadError {
    /// Creates a new read error at the given frame.
    pub fn new(frame_index: u64, message: impl Into<String>) -> Self {
        Self {
            frame_index,
            message: message.into(),
        }
    }
}

// =============================================================================
// Traits
// =============================================================================

/// Sequential access to a source's frames.
///
/// Dropping the stream releases any underlying capture resources, so there
/// is no explicit close operation.
pub trait FrameStream: Send {
    /// Total number of frames in the source.
    ///
    /// May be approximate; the engine clamps any progress derived from it
    /// and forces 100% on stream exhaustion.
    fn total_frames(&self) -> u64;

    /// Reads the next frame, or `None` once the stream is exhausted.
    fn next_frame(
        &mut self,
    ) -> impl Future<Output = Result<Option<Frame>, StreamReadError>> + Send;
}

/// Per-frame computer vision capability consumed by the engine.
///
/// One analyzer instance serves every job submitted to an engine; `open`
/// produces an independent stream per job.
pub trait FrameAnalyzer: Send + Sync + 'static {
    /// Stream type produced by [`open`](Self::open).
    type Stream: FrameStream;

    /// Opens a source for frame-by-frame reading.
    fn open(
        &self,
        source: &Path,
    ) -> impl Future<Output = Result<Self::Stream, AnalyzerInitError>> + Send;

    /// Analyzes one frame.
    fn analyze(&self, frame: &Frame) -> AnalysisResult;
}
