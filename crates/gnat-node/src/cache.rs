use crate::msg::{AttitudeSample, MotorHistory, PositionSample, RateSample};
use gnat_core::{ControlVector, SensorSnapshot};
use nalgebra::Vector3;
use std::sync::Mutex;

// ---------------------------------------------------------------------------
// Latest-value cell
// ---------------------------------------------------------------------------

/// A lock-guarded latest-value slot: handlers overwrite it, the tick reads
/// it. Readers always get the last written value, or the initial one if the
/// source has never reported.
///
/// Handlers may run on any thread, so each cell carries its own mutex; the
/// critical sections are a single copy in or out.
pub struct LatestCell<T: Copy> {
    value: Mutex<T>,
}

impl<T: Copy> LatestCell<T> {
    pub fn new(init: T) -> Self {
        Self {
            value: Mutex::new(init),
        }
    }

    /// Overwrite with a newly received value.
    pub fn update(&self, value: T) {
        match self.value.lock() {
            Ok(mut guard) => *guard = value,
            // A writer panicking mid-copy cannot leave a torn T: Copy value,
            // so a poisoned lock is still safe to write through.
            Err(poisoned) => *poisoned.into_inner() = value,
        }
    }

    /// Read the most recent value.
    pub fn read(&self) -> T {
        match self.value.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

impl<T: Copy + Default> Default for LatestCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

// ---------------------------------------------------------------------------
// Sensor cache
// ---------------------------------------------------------------------------

/// The shared measurement cache: one cell per source, all zero-initialized.
///
/// This is the only mutable state shared between the transport handlers and
/// the timer tick. There is no freshness tracking on purpose: a tick that
/// races ahead of the sensors simply reuses stale values.
#[derive(Default)]
pub struct SensorCache {
    pub position: LatestCell<PositionSample>,
    pub attitude: LatestCell<AttitudeSample>,
    pub rates: LatestCell<RateSample>,
    pub motors: LatestCell<MotorHistory>,
}

impl SensorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the estimator's view of the sensors for one tick.
    pub fn snapshot(&self) -> SensorSnapshot {
        let pos = self.position.read();
        let att = self.attitude.read();
        let rates = self.rates.read();
        SensorSnapshot {
            position: Vector3::new(pos.x, pos.y, pos.z),
            euler_deg: Vector3::new(att.roll_deg, att.pitch_deg, att.yaw_deg),
            rates: Vector3::new(rates.wx, rates.wy, rates.wz),
        }
    }

    /// Latest motor command as the solver control vector.
    pub fn control(&self) -> ControlVector {
        ControlVector::from_array(&self.motors.read().control_array())
    }
}
