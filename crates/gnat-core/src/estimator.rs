use crate::attitude::{euler_to_quaternion, EulerAngles};
use crate::rotation::world_to_body;
use crate::state::StateVector;
use crate::velocity::VelocityEstimator;
use nalgebra::Vector3;

// ---------------------------------------------------------------------------
// Tick input
// ---------------------------------------------------------------------------

/// The raw sensor values one estimation tick works from, as captured from
/// the latest-value cache. Any source that has never reported stays at its
/// zero value; that is deliberate silent degradation, not an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorSnapshot {
    /// Motion-capture position (m, world frame).
    pub position: Vector3<f64>,
    /// Stabilizer euler angles (degrees: roll, pitch, yaw).
    pub euler_deg: Vector3<f64>,
    /// Gyro angular rates (rad/s, body frame).
    pub rates: Vector3<f64>,
}

impl Default for SensorSnapshot {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            euler_deg: Vector3::zeros(),
            rates: Vector3::zeros(),
        }
    }
}

// ---------------------------------------------------------------------------
// State assembly
// ---------------------------------------------------------------------------

/// Fuses one sensor snapshot into the solver state vector.
///
/// Owns the only stateful part of the math, the velocity filter windows;
/// attitude conversion and frame rotation are pure. Values are combined
/// without validation: NaN or out-of-range sensor readings propagate
/// unchanged, by contract with the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct StateEstimator {
    velocity: VelocityEstimator,
}

impl StateEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the state vector for one tick.
    ///
    /// `dt` is the time since the previous tick (0 on the first tick),
    /// `elapsed` the time since pipeline start; both feed the velocity
    /// filter's warmup policy.
    pub fn update(&mut self, snap: &SensorSnapshot, dt: f64, elapsed: f64) -> StateVector {
        let angles = EulerAngles::from_degrees(snap.euler_deg.x, snap.euler_deg.y, snap.euler_deg.z);
        let attitude = euler_to_quaternion(angles);

        let v_world = self.velocity.estimate(snap.position, dt, elapsed);
        let velocity_body = world_to_body(&attitude, v_world);

        StateVector {
            position: snap.position,
            attitude,
            velocity_body,
            rates_body: snap.rates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f64 = 0.02;

    #[test]
    fn test_passthrough_fields() {
        let mut est = StateEstimator::new();
        let snap = SensorSnapshot {
            position: Vector3::new(0.1, -0.2, 1.3),
            euler_deg: Vector3::zeros(),
            rates: Vector3::new(0.01, 0.02, -0.03),
        };
        let sv = est.update(&snap, DT, 0.1);
        assert_eq!(sv.position, snap.position);
        assert_eq!(sv.rates_body, snap.rates);
        assert!((sv.attitude.w - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_step_yields_body_velocity_under_identity_attitude() {
        // Positions (0,0,0) x4 then (1,0,0), (2,0,0) at 20 ms spacing with
        // identity attitude: body x velocity equals (2-1)/0.02 = 50 on the
        // final update, while the pipeline is still in its warmup window.
        let mut est = StateEstimator::new();
        let mut snap = SensorSnapshot::default();

        let mut t = 0.0;
        for _ in 0..4 {
            est.update(&snap, if t == 0.0 { 0.0 } else { DT }, t);
            t += DT;
        }
        snap.position = Vector3::new(1.0, 0.0, 0.0);
        est.update(&snap, DT, t);
        t += DT;
        snap.position = Vector3::new(2.0, 0.0, 0.0);
        let sv = est.update(&snap, DT, t);

        assert!((sv.velocity_body.x - 50.0).abs() < 1e-9);
        assert!(sv.velocity_body.y.abs() < 1e-12);
        assert!(sv.velocity_body.z.abs() < 1e-12);
    }

    #[test]
    fn test_nan_position_propagates() {
        let mut est = StateEstimator::new();
        let snap = SensorSnapshot {
            position: Vector3::new(f64::NAN, 0.0, 0.0),
            euler_deg: Vector3::zeros(),
            rates: Vector3::zeros(),
        };
        let sv = est.update(&snap, DT, 0.1);
        assert!(sv.position.x.is_nan());
    }
}
