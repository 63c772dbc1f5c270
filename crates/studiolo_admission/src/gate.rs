//! Concurrency gate implemented over a Tokio Semaphore.
//!
//! A generation on a local backend monopolizes the GPU, and overlapping
//! requests make every caller slower or crash the server outright. The gate
//! admits a fixed number of generations at a time (one, by default) and
//! queues the rest.

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Counting gate for in-flight generation calls.
///
/// # Example
///
/// ```rust,ignore
/// use studiolo_admission::AdmissionGate;
///
/// let gate = AdmissionGate::single();
///
/// let permit = gate.acquire().await;
/// // Make the backend call...
/// drop(permit); // Frees the slot
/// ```
#[derive(Debug)]
pub struct AdmissionGate {
    capacity: usize,
    semaphore: Arc<Semaphore>,
}

impl AdmissionGate {
    /// Creates a gate admitting up to `capacity` concurrent calls.
    ///
    /// A capacity of zero would deadlock every caller, so it is bumped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            semaphore: Arc::new(Semaphore::new(capacity)),
        }
    }

    /// Creates the standard single-slot gate.
    pub fn single() -> Self {
        Self::new(1)
    }

    /// Waits for a free slot and occupies it.
    ///
    /// Returns a guard that frees the slot when dropped, so the slot is
    /// released on every exit path including panics.
    pub async fn acquire(&self) -> AdmissionPermit {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .expect("Semaphore should not be closed");

        AdmissionPermit { _permit: permit }
    }

    /// Occupies a slot without waiting.
    ///
    /// Returns `None` if every slot is taken.
    pub fn try_acquire(&self) -> Option<AdmissionPermit> {
        let permit = self.semaphore.clone().try_acquire_owned().ok()?;

        Some(AdmissionPermit { _permit: permit })
    }

    /// Configured number of slots.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots currently free.
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}

impl Default for AdmissionGate {
    fn default() -> Self {
        Self::single()
    }
}

/// RAII guard for an occupied gate slot.
///
/// The slot is returned to the gate when the guard is dropped, even if the
/// call it covered failed or panicked.
#[derive(Debug)]
pub struct AdmissionPermit {
    _permit: OwnedSemaphorePermit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn acquire_releases_on_drop() {
        let gate = AdmissionGate::single();

        let permit = gate.acquire().await;

        // Slot is taken, nothing else gets in.
        assert!(gate.try_acquire().is_none());

        drop(permit);

        let _again = gate.try_acquire().expect("Should acquire after drop");
    }

    #[tokio::test]
    async fn zero_capacity_is_clamped() {
        let gate = AdmissionGate::new(0);
        assert_eq!(gate.capacity(), 1);

        let _permit = gate.acquire().await;
        assert_eq!(gate.available(), 0);
    }

    #[tokio::test]
    async fn wider_gates_admit_up_to_capacity() {
        let gate = AdmissionGate::new(2);

        let _first = gate.try_acquire().expect("First slot");
        let _second = gate.try_acquire().expect("Second slot");
        assert!(gate.try_acquire().is_none(), "Third caller should wait");
    }

    #[tokio::test]
    async fn queued_caller_proceeds_once_freed() {
        let gate = Arc::new(AdmissionGate::single());
        let permit = gate.acquire().await;

        let waiter = {
            let gate = gate.clone();
            tokio::spawn(async move {
                let _permit = gate.acquire().await;
            })
        };

        // The spawned task is parked on the semaphore until we release.
        drop(permit);
        waiter.await.expect("Waiter should finish after release");
    }
}
