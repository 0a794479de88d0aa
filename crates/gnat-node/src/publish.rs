use crate::msg::{EulerRecord, StateEstimateRecord};
use std::sync::Mutex;

// ---------------------------------------------------------------------------
// Publisher interface
// ---------------------------------------------------------------------------

/// Downstream surface for the pipeline's outputs. Implemented by whatever
/// transport carries the records; the pipeline never blocks on it.
pub trait StatePublisher: Send + Sync {
    /// One state estimate per tick, solver status included.
    fn publish_state(&self, record: &StateEstimateRecord);

    /// Normalized euler angles, re-emitted as attitude messages arrive.
    fn publish_euler(&self, record: &EulerRecord);
}

/// Discards everything.
#[derive(Debug, Default)]
pub struct NullPublisher;

impl StatePublisher for NullPublisher {
    fn publish_state(&self, _record: &StateEstimateRecord) {}
    fn publish_euler(&self, _record: &EulerRecord) {}
}

// ---------------------------------------------------------------------------
// Collecting publisher
// ---------------------------------------------------------------------------

/// Buffers published records in memory, for tests and offline replay export.
#[derive(Default)]
pub struct CollectingPublisher {
    states: Mutex<Vec<StateEstimateRecord>>,
    eulers: Mutex<Vec<EulerRecord>>,
}

impl CollectingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn states(&self) -> Vec<StateEstimateRecord> {
        match self.states.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn eulers(&self) -> Vec<EulerRecord> {
        match self.eulers.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl StatePublisher for CollectingPublisher {
    fn publish_state(&self, record: &StateEstimateRecord) {
        match self.states.lock() {
            Ok(mut guard) => guard.push(*record),
            Err(poisoned) => poisoned.into_inner().push(*record),
        }
    }

    fn publish_euler(&self, record: &EulerRecord) {
        match self.eulers.lock() {
            Ok(mut guard) => guard.push(*record),
            Err(poisoned) => poisoned.into_inner().push(*record),
        }
    }
}
