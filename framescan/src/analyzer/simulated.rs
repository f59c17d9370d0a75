//! Deterministic frame analyzer for demos and tests.
//!
//! The real deployment reads video files through a native capture stack;
//! that dependency is replaced here by a scripted analyzer that yields a
//! configurable number of synthetic frames, optionally pacing them and
//! injecting the failure modes the engine must handle (init failure,
//! mid-stream read failure).
//!
//! Behavior is keyed by source path, so one analyzer instance can serve
//! several jobs with different scripts:
//!
//! ```ignore
//! use framescan::analyzer::{SimulatedAnalyzer, SourceScript};
//!
//! let analyzer = SimulatedAnalyzer::new(120)
//!     .with_source("broken.mp4", SourceScript { fail_open: true, ..SourceScript::new(0) });
//! ```

use super::{AnalysisResult, AnalyzerInitError, Detection, Frame, FrameAnalyzer, FrameStream};
use super::StreamReadError;
use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Frames carry a small fixed payload; the engine never inspects it.
const FRAME_PAYLOAD_LEN: usize = 16;

/// Every Nth frame reports a gallery match.
const MATCH_EVERY_N_FRAMES: u64 = 4;

/// Per-source behavior script.
#[derive(Clone, Debug)]
pub struct SourceScript {
    /// Number of frames the stream yields before exhaustion.
    pub frames: u64,

    /// Artificial per-frame read latency.
    pub frame_delay: Duration,

    /// Fail `open` instead of producing a stream.
    pub fail_open: bool,

    /// Fail the read of this one-based frame number, if set.
    pub fail_read_at: Option<u64>,
}

impl SourceScript {
    /// Creates a script that yields `frames` frames and never fails.
    pub fn new(frames: u64) -> Self {
        Self {
            frames,
            frame_delay: Duration::ZERO,
            fail_open: false,
            fail_read_at: None,
        }
    }
}

/// Scripted [`FrameAnalyzer`] implementation.
#[derive(Clone, Debug)]
pub struct SimulatedAnalyzer {
    default: SourceScript,
    overrides: HashMap<PathBuf, SourceScript>,
    gallery: Vec<String>,
}

impl SimulatedAnalyzer {
    /// Creates an analyzer whose streams yield `frames` frames by default.
    pub fn new(frames: u64) -> Self {
        Self {
            default: SourceScript::new(frames),
            overrides: HashMap::new(),
            gallery: vec!["alice".to_string(), "bob".to_string()],
        }
    }

    /// Sets the default per-frame read latency.
    pub fn with_frame_delay(mut self, delay: Duration) -> Self {
        self.default.frame_delay = delay;
        self
    }

    /// Overrides the script for one source path.
    pub fn with_source(mut self, source: impl Into<PathBuf>, script: SourceScript) -> Self {
        self.overrides.insert(source.into(), script);
        self
    }

    /// Replaces the gallery labels reported in fake detections.
    pub fn with_gallery(mut self, labels: Vec<String>) -> Self {
        self.gallery = labels;
        self
    }

    fn script_for(&self, source: &Path) -> &SourceScript {
        self.overrides.get(source).unwrap_or(&self.default)
    }
}

impl FrameAnalyzer for SimulatedAnalyzer {
    type Stream = SimulatedStream;

    fn open(
        &self,
        source: &Path,
    ) -> impl Future<Output = Result<Self::Stream, AnalyzerInitError>> + Send {
        let script = self.script_for(source).clone();
        let path = source.to_path_buf();
        async move {
            if script.fail_open {
                return Err(AnalyzerInitError::new(path, "model files missing"));
            }
            Ok(SimulatedStream { script, next: 0 })
        }
    }

    fn analyze(&self, frame: &Frame) -> AnalysisResult {
        let mut detections = Vec::new();
        let frame_number = frame.index + 1;
        if !self.gallery.is_empty() && frame_number % MATCH_EVERY_N_FRAMES == 0 {
            let label = &self.gallery[(frame.index / MATCH_EVERY_N_FRAMES) as usize % self.gallery.len()];
            detections.push(Detection {
                label: label.clone(),
                // Well inside the usual 0.5 match threshold.
                distance: 0.31,
            });
        }
        AnalysisResult {
            frame_index: frame.index,
            detections,
        }
    }
}

/// Stream produced by [`SimulatedAnalyzer::open`].
#[derive(Debug)]
pub struct SimulatedStream {
    script: SourceScript,
    next: u64,
}

impl FrameStream for SimulatedStream {
    fn total_frames(&self) -> u64 {
        self.script.frames
    }

    fn next_frame(
        &mut self,
    ) -> impl Future<Output = Result<Option<Frame>, StreamReadError>> + Send {
        async move {
            if self.next >= self.script.frames {
                return Ok(None);
            }
            let frame_number = self.next + 1;
            if self.script.fail_read_at == Some(frame_number) {
                return Err(StreamReadError::new(frame_number, "scripted read failure"));
            }
            if !self.script.frame_delay.is_zero() {
                tokio::time::sleep(self.script.frame_delay).await;
            }
            let index = self.next;
            self.next += 1;
            Ok(Some(Frame {
                index,
                data: vec![0; FRAME_PAYLOAD_LEN],
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stream_yields_exact_frame_count() {
        let analyzer = SimulatedAnalyzer::new(5);
        let mut stream = analyzer.open(Path::new("a.mp4")).await.unwrap();
        assert_eq!(stream.total_frames(), 5);

        let mut count = 0;
        while let Some(frame) = stream.next_frame().await.unwrap() {
            assert_eq!(frame.index, count);
            count += 1;
        }
        assert_eq!(count, 5);

        // Exhausted streams stay exhausted.
        assert!(stream.next_frame().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_open_failure_script() {
        let analyzer = SimulatedAnalyzer::new(5).with_source(
            "broken.mp4",
            SourceScript {
                fail_open: true,
                ..SourceScript::new(0)
            },
        );

        let err = analyzer.open(Path::new("broken.mp4")).await.unwrap_err();
        assert!(err.message.contains("model"));

        // Other sources still open fine.
        assert!(analyzer.open(Path::new("ok.mp4")).await.is_ok());
    }

    #[tokio::test]
    async fn test_read_failure_at_scripted_frame() {
        let analyzer = SimulatedAnalyzer::new(10).with_source(
            "flaky.mp4",
            SourceScript {
                fail_read_at: Some(3),
                ..SourceScript::new(10)
            },
        );

        let mut stream = analyzer.open(Path::new("flaky.mp4")).await.unwrap();
        assert!(stream.next_frame().await.is_ok());
        assert!(stream.next_frame().await.is_ok());
        let err = stream.next_frame().await.unwrap_err();
        assert_eq!(err.frame_index, 3);
    }

    #[tokio::test]
    async fn test_analyze_matches_every_fourth_frame() {
        let analyzer = SimulatedAnalyzer::new(8);
        let mut stream = analyzer.open(Path::new("a.mp4")).await.unwrap();

        let mut matched = Vec::new();
        while let Some(frame) = stream.next_frame().await.unwrap() {
            let result = analyzer.analyze(&frame);
            assert_eq!(result.frame_index, frame.index);
            if !result.detections.is_empty() {
                matched.push(frame.index);
            }
        }
        // One-based frames 4 and 8.
        assert_eq!(matched, vec![3, 7]);
    }

    #[test]
    fn test_source_script_defaults() {
        let script = SourceScript::new(42);
        assert_eq!(script.frames, 42);
        assert!(script.frame_delay.is_zero());
        assert!(!script.fail_open);
        assert!(script.fail_read_at.is_none());
    }
}
