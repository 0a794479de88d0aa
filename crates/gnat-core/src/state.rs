use nalgebra::{Quaternion, UnitQuaternion, Vector3};

// ---------------------------------------------------------------------------
// Solver vector dimensions
// ---------------------------------------------------------------------------

/// States: position(3), quaternion(4, w first), body linear velocity(3),
/// body angular velocity(3).
pub const STATE_DIM: usize = 13;

/// Control inputs: four motor speeds.
pub const CONTROL_DIM: usize = 4;

// ---------------------------------------------------------------------------
// State vector
// ---------------------------------------------------------------------------

/// The 13-element state passed to the prediction solver, kept as named
/// fields so assembly sites cannot transpose slots. [`StateVector::to_array`]
/// and [`StateVector::from_array`] pin the exact layout at the solver
/// boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateVector {
    /// World-frame position (m).
    pub position: Vector3<f64>,
    /// Attitude, world to body.
    pub attitude: UnitQuaternion<f64>,
    /// Body-frame linear velocity (m/s).
    pub velocity_body: Vector3<f64>,
    /// Body-frame angular rates (rad/s).
    pub rates_body: Vector3<f64>,
}

impl StateVector {
    /// Pack into the solver's slot ordering.
    pub fn to_array(&self) -> [f64; STATE_DIM] {
        [
            self.position.x,
            self.position.y,
            self.position.z,
            self.attitude.w,
            self.attitude.i,
            self.attitude.j,
            self.attitude.k,
            self.velocity_body.x,
            self.velocity_body.y,
            self.velocity_body.z,
            self.rates_body.x,
            self.rates_body.y,
            self.rates_body.z,
        ]
    }

    /// Unpack a solver output verbatim; the quaternion slots are taken as-is
    /// without renormalization so the solver result is forwarded unchanged.
    pub fn from_array(x: &[f64; STATE_DIM]) -> Self {
        Self {
            position: Vector3::new(x[0], x[1], x[2]),
            attitude: UnitQuaternion::new_unchecked(Quaternion::new(x[3], x[4], x[5], x[6])),
            velocity_body: Vector3::new(x[7], x[8], x[9]),
            rates_body: Vector3::new(x[10], x[11], x[12]),
        }
    }
}

impl Default for StateVector {
    /// All slots zero except the quaternion w slot, which is 1 (identity
    /// attitude). The reference implementation left this to an ambiguous
    /// initialization loop; here it is explicit.
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            attitude: UnitQuaternion::identity(),
            velocity_body: Vector3::zeros(),
            rates_body: Vector3::zeros(),
        }
    }
}

// ---------------------------------------------------------------------------
// Control vector
// ---------------------------------------------------------------------------

/// The four motor-speed control inputs (krpm).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ControlVector {
    pub w1: f64,
    pub w2: f64,
    pub w3: f64,
    pub w4: f64,
}

impl ControlVector {
    pub fn to_array(&self) -> [f64; CONTROL_DIM] {
        [self.w1, self.w2, self.w3, self.w4]
    }

    pub fn from_array(u: &[f64; CONTROL_DIM]) -> Self {
        Self {
            w1: u[0],
            w2: u[1],
            w3: u[2],
            w4: u[3],
        }
    }
}
