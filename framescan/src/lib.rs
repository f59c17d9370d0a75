//! Framescan - concurrent per-file frame analysis jobs
//!
//! This library runs long-running, per-file analysis jobs (typically
//! frame-by-frame face detection over a video) under a fixed concurrency
//! budget, while callers poll progress and pause, resume, or cancel
//! individual jobs.
//!
//! # High-Level API
//!
//! The [`engine`] module provides the control-plane facade:
//!
//! ```ignore
//! use framescan::analyzer::simulated::SimulatedAnalyzer;
//! use framescan::engine::{AnalysisEngine, EngineConfig};
//!
//! let engine = AnalysisEngine::new(EngineConfig::default(), SimulatedAnalyzer::new(120));
//!
//! let id = engine.submit("clips/interview.mp4", "interview.mp4").await;
//! let record = engine.status(id).await?;
//! engine.switch_state(id).await?; // pause / resume toggle
//! engine.cancel(id).await?;
//! ```

pub mod analyzer;
pub mod engine;
pub mod logging;

/// Version of the framescan library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
