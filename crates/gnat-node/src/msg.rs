use gnat_core::{StateVector, CONTROL_DIM};

// ---------------------------------------------------------------------------
// Inbound samples
// ---------------------------------------------------------------------------

/// Motion-capture marker position (m, world frame).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PositionSample {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Gyro angular rates (rad/s, body frame).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RateSample {
    pub wx: f64,
    pub wy: f64,
    pub wz: f64,
}

/// Stabilizer euler angles in degrees, stamped at the source.
///
/// Stored post-normalization: the ingest handler flips the pitch sign to the
/// estimator's convention before caching, so consumers never see the raw
/// stabilizer sign.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AttitudeSample {
    pub stamp: f64,
    pub roll_deg: f64,
    pub pitch_deg: f64,
    pub yaw_deg: f64,
}

/// One set of commanded motor speeds (krpm, integer on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotorSpeeds {
    pub w1: i32,
    pub w2: i32,
    pub w3: i32,
    pub w4: i32,
}

/// Two-deep motor-speed history: the latest command plus the one before it,
/// retained for multi-step control input to the solver.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotorHistory {
    pub latest: MotorSpeeds,
    pub previous: MotorSpeeds,
}

// ---------------------------------------------------------------------------
// Outbound records
// ---------------------------------------------------------------------------

/// The per-tick estimate published downstream: the solver's next-state
/// vector in the 13-slot layout plus its status code, verbatim.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateEstimateRecord {
    /// Emission time (seconds since pipeline epoch).
    pub stamp: f64,
    /// Solver status, 0 = success. Forwarded unmapped.
    pub status: i32,
    pub state: StateVector,
}

/// Normalized euler angles re-emitted by the attitude handler.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EulerRecord {
    /// Source timestamp of the attitude message this echoes.
    pub stamp: f64,
    pub roll_deg: f64,
    pub pitch_deg: f64,
    pub yaw_deg: f64,
}

impl MotorHistory {
    /// Shift latest to previous and store a new command.
    pub fn push(&mut self, speeds: MotorSpeeds) {
        self.previous = self.latest;
        self.latest = speeds;
    }

    /// Latest command as the solver control slots.
    pub fn control_array(&self) -> [f64; CONTROL_DIM] {
        [
            self.latest.w1 as f64,
            self.latest.w2 as f64,
            self.latest.w3 as f64,
            self.latest.w4 as f64,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_motor_history_two_deep() {
        let mut h = MotorHistory::default();
        let a = MotorSpeeds {
            w1: 10,
            w2: 11,
            w3: 12,
            w4: 13,
        };
        let b = MotorSpeeds {
            w1: 20,
            w2: 21,
            w3: 22,
            w4: 23,
        };
        h.push(a);
        assert_eq!(h.latest, a);
        assert_eq!(h.previous, MotorSpeeds::default());
        h.push(b);
        assert_eq!(h.latest, b);
        assert_eq!(h.previous, a);
    }

    #[test]
    fn test_control_array_uses_latest() {
        let mut h = MotorHistory::default();
        h.push(MotorSpeeds {
            w1: 1,
            w2: 2,
            w3: 3,
            w4: 4,
        });
        assert_eq!(h.control_array(), [1.0, 2.0, 3.0, 4.0]);
    }
}
