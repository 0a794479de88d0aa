use nalgebra::{Quaternion, UnitQuaternion};

// ---------------------------------------------------------------------------
// Euler angles
// ---------------------------------------------------------------------------

/// Roll/pitch/yaw in radians, ZYX sequence.
///
/// The onboard stabilizer reports angles in degrees; [`EulerAngles::from_degrees`]
/// is the conversion boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EulerAngles {
    pub phi: f64,
    pub theta: f64,
    pub psi: f64,
}

impl EulerAngles {
    pub fn new(phi: f64, theta: f64, psi: f64) -> Self {
        Self { phi, theta, psi }
    }

    pub fn from_degrees(roll_deg: f64, pitch_deg: f64, yaw_deg: f64) -> Self {
        Self {
            phi: roll_deg.to_radians(),
            theta: pitch_deg.to_radians(),
            psi: yaw_deg.to_radians(),
        }
    }
}

// ---------------------------------------------------------------------------
// Conversion
// ---------------------------------------------------------------------------

/// Convert ZYX euler angles to a canonical unit quaternion.
///
/// Half-angle formula with the earth-to-body sign convention on the vector
/// part. The result is normalized and then forced into the w >= 0 hemisphere
/// (negating all four components if needed) so that repeated conversions of
/// slowly varying angles never flip sign between ticks; downstream consumers
/// that difference quaternions rely on this.
pub fn euler_to_quaternion(angle: EulerAngles) -> UnitQuaternion<f64> {
    let cos_phi = (angle.phi * 0.5).cos();
    let sin_phi = (angle.phi * 0.5).sin();
    let cos_theta = (angle.theta * 0.5).cos();
    let sin_theta = (angle.theta * 0.5).sin();
    let cos_psi = (angle.psi * 0.5).cos();
    let sin_psi = (angle.psi * 0.5).sin();

    let w = cos_phi * cos_theta * cos_psi + sin_phi * sin_theta * sin_psi;
    let x = -(cos_psi * cos_theta * sin_phi - sin_psi * sin_theta * cos_phi);
    let y = -(cos_psi * sin_theta * cos_phi + sin_psi * cos_theta * sin_phi);
    let z = -(sin_psi * cos_theta * cos_phi - cos_psi * sin_theta * sin_phi);

    let mut q = Quaternion::new(w, x, y, z).normalize();
    if q.w < 0.0 {
        q = -q;
    }
    UnitQuaternion::new_unchecked(q)
}
