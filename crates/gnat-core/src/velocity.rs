use crate::window::SampleWindow;
use nalgebra::Vector3;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Samples retained per axis, for positions and filtered velocities alike.
pub const WINDOW_LEN: usize = 5;

/// Uptime below which the filter memory is still warming up and the plain
/// finite difference is used instead.
const WARMUP_SECS: f64 = 1.0;

// Discrete low-pass differentiator designed for a 15 ms sampling period.
// The coefficients are part of the contract with the prediction model and
// must not be retuned independently.
const LPF_B1: f64 = 0.3306;
const LPF_B2: f64 = -0.02732;
const LPF_A: f64 = 35.7;

// ---------------------------------------------------------------------------
// Per-axis filter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
struct AxisFilter {
    positions: SampleWindow<WINDOW_LEN>,
    velocities: SampleWindow<WINDOW_LEN>,
}

impl AxisFilter {
    /// Push the newest position and derive a filtered velocity for this axis.
    fn estimate(&mut self, position: f64, dt: f64, elapsed: f64) -> f64 {
        self.positions.push(position);

        let dq = if elapsed > WARMUP_SECS {
            LPF_B1 * self.velocities.newest(0) + LPF_B2 * self.velocities.newest(1)
                + LPF_A * self.positions.newest(0)
                - LPF_A * self.positions.newest(1)
        } else if dt > 0.0 {
            (self.positions.newest(0) - self.positions.newest(1)) / dt
        } else {
            // First tick: dt is zero and the windows hold only zeros.
            0.0
        };

        self.velocities.push(dq);
        dq
    }
}

// ---------------------------------------------------------------------------
// Three-axis estimator
// ---------------------------------------------------------------------------

/// Recovers world-frame linear velocity from motion-capture positions.
///
/// Maintains a sliding window of the last [`WINDOW_LEN`] position samples per
/// axis plus the matching window of previously emitted velocities. For the
/// first [`WARMUP_SECS`] of uptime the velocity memory is still
/// zero-initialized, so a backward finite difference is used; afterwards the
/// IIR low-pass differentiator takes over and suppresses mocap jitter.
#[derive(Debug, Clone, Copy, Default)]
pub struct VelocityEstimator {
    x: AxisFilter,
    y: AxisFilter,
    z: AxisFilter,
}

impl VelocityEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// One estimation step.
    ///
    /// `dt` is the time since the previous tick (0 on the very first tick)
    /// and `elapsed` the time since pipeline start.
    pub fn estimate(&mut self, position: Vector3<f64>, dt: f64, elapsed: f64) -> Vector3<f64> {
        Vector3::new(
            self.x.estimate(position.x, dt, elapsed),
            self.y.estimate(position.y, dt, elapsed),
            self.z.estimate(position.z, dt, elapsed),
        )
    }
}
