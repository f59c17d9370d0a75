//! Analysis Job Engine
//!
//! This module orchestrates concurrent per-file analysis jobs under a fixed
//! admission budget, with per-job pause/resume and cancellation.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      AnalysisEngine                          │
//! │  submit / status / switch_state / cancel                    │
//! ├─────────────────────────────────────────────────────────────┤
//! │                       JobRegistry                            │
//! │  Single-writer map of JobId -> JobRecord; owns toggles      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────┐  │
//! │  │ Admission   │  │ Job Worker  │  │ Frame Analyzer      │  │
//! │  │ Gate        │  │ (per job)   │  │ (trait boundary)    │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Core Concepts
//!
//! - **Job**: one submitted source file with its own id, lifecycle state,
//!   and progress percentage. One tokio task drives each job.
//!
//! - **Admission Gate**: counting permit capping how many jobs may be
//!   `Processing` or `Paused` at once (default: one per processing unit).
//!   Queued jobs wait on it without any timeout.
//!
//! - **Job Registry**: the only writer of job records. Workers and the
//!   control plane reach it through one event channel; a single writer
//!   task applies every mutation, including pause/resume toggles.
//!
//! - **Cancellation**: a per-job token, checked by the worker at every
//!   suspension point, including while paused.
//!
//! # Lifecycle
//!
//! ```text
//! Queued --(permit acquired)--> Processing
//! Processing --(toggle)--> Paused --(toggle)--> Processing
//! Processing --(stream exhausted)--> Successful
//! Processing --(init/read error)--> Error
//! {Queued, Processing, Paused} --(cancel)--> Canceled
//! ```

pub mod config;
pub mod error;
pub mod gate;
pub mod job;
pub mod service;
pub mod status;

mod registry;
mod worker;

pub use config::EngineConfig;
pub use error::EngineError;
pub use gate::{AdmissionGate, AdmissionPermit};
pub use job::{JobId, JobRecord};
pub use service::AnalysisEngine;
pub use status::JobStatus;
