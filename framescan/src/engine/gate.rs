//! Admission gate bounding simultaneously active jobs.
//!
//! The gate is a counting permit with a fixed capacity. A worker acquires
//! exactly one permit after its `Queued` record exists and before it reads
//! any frame, and the permit is released exactly once when the job reaches
//! a terminal state. Release is tied to [`AdmissionPermit`]'s `Drop`, so
//! every exit path (success, error, cancellation) returns the slot.
//!
//! Paused jobs keep their permit: pausing does not hand the slot to a
//! queued job.
//!
//! # Example
//!
//! ```ignore
//! use framescan::engine::AdmissionGate;
//!
//! let gate = AdmissionGate::new(2);
//! let permit = gate.acquire().await;
//! // ... job is active while the permit lives ...
//! drop(permit);
//! ```

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Bounded-concurrency permit system limiting active jobs.
///
/// Cloneable; all clones share the same permit pool.
#[derive(Clone)]
pub struct AdmissionGate {
    permits: Arc<Semaphore>,
    capacity: usize,
}

impl AdmissionGate {
    /// Creates a gate with the given capacity, clamped to at least one slot.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            permits: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Returns the configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of currently free slots.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Waits until an admission slot is free and claims it.
    ///
    /// There is no timeout: a saturated gate is backpressure, and queued
    /// jobs wait indefinitely.
    pub async fn acquire(&self) -> AdmissionPermit {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            // The gate owns its semaphore and never closes it.
            .expect("admission semaphore closed");
        AdmissionPermit { _permit: permit }
    }
}

impl std::fmt::Debug for AdmissionGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdmissionGate")
            .field("capacity", &self.capacity)
            .field("available", &self.available())
            .finish()
    }
}

/// An acquired admission slot.
///
/// Dropping the permit returns the slot, exactly once. Workers hold it for
/// the entire `Processing`/`Paused` span of their job.
#[derive(Debug)]
pub struct AdmissionPermit {
    _permit: OwnedSemaphorePermit,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_capacity_clamped_to_one() {
        let gate = AdmissionGate::new(0);
        assert_eq!(gate.capacity(), 1);
        assert_eq!(gate.available(), 1);
    }

    #[tokio::test]
    async fn test_acquire_and_release_accounting() {
        let gate = AdmissionGate::new(2);
        assert_eq!(gate.available(), 2);

        let permit1 = gate.acquire().await;
        assert_eq!(gate.available(), 1);

        let permit2 = gate.acquire().await;
        assert_eq!(gate.available(), 0);

        drop(permit1);
        assert_eq!(gate.available(), 1);

        drop(permit2);
        assert_eq!(gate.available(), 2);
    }

    #[tokio::test]
    async fn test_acquire_waits_for_free_slot() {
        let gate = AdmissionGate::new(1);
        let permit = gate.acquire().await;

        let gate_clone = gate.clone();
        let waiter = tokio::spawn(async move {
            let _permit = gate_clone.acquire().await;
            "admitted"
        });

        // Give the waiter time to park on the gate.
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!waiter.is_finished());

        drop(permit);

        let result = tokio::time::timeout(Duration::from_millis(100), waiter)
            .await
            .expect("waiter should be admitted")
            .expect("waiter should not panic");
        assert_eq!(result, "admitted");
    }

    #[tokio::test]
    async fn test_clones_share_the_pool() {
        let gate = AdmissionGate::new(1);
        let clone = gate.clone();

        let _permit = gate.acquire().await;
        assert_eq!(clone.available(), 0);
    }
}
