//! Engine configuration.
//!
//! This module contains the [`EngineConfig`] struct and the default
//! admission capacity calculation.

// =============================================================================
// Configuration Constants
// =============================================================================

/// Fallback admission capacity when CPU detection fails.
pub const FALLBACK_CAPACITY: usize = 1;

// =============================================================================
// Default Capacity Calculation
// =============================================================================

/// Computes the default admission capacity: one active job per available
/// processing unit, minimum 1.
///
/// Active means `Processing` or `Paused`; paused jobs keep their slot.
pub fn default_capacity() -> usize {
    std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(FALLBACK_CAPACITY)
        .max(1)
}

// =============================================================================
// Engine Configuration
// =============================================================================

/// Configuration for the analysis engine.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Maximum simultaneously active (Processing or Paused) jobs.
    pub capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

impl EngineConfig {
    /// Creates a config with an explicit capacity, clamped to at least one slot.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
        }
    }
}
