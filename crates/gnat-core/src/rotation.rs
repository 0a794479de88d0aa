use nalgebra::{Matrix3, UnitQuaternion, Vector3};

/// Rotate a world-frame vector into the body frame.
///
/// Builds the earth-to-body direction cosine matrix from the attitude
/// quaternion via the bilinear identity (ZYX convention) and applies it as a
/// plain matrix-vector product. Stateless.
pub fn world_to_body(q: &UnitQuaternion<f64>, v_world: Vector3<f64>) -> Vector3<f64> {
    let (w, x, y, z) = (q.w, q.i, q.j, q.k);

    let dcm = Matrix3::new(
        2.0 * (w * w + x * x) - 1.0,
        2.0 * (x * y + w * z),
        2.0 * (x * z - w * y),
        2.0 * (x * y - w * z),
        2.0 * (w * w + y * y) - 1.0,
        2.0 * (y * z + w * x),
        2.0 * (x * z + w * y),
        2.0 * (y * z - w * x),
        2.0 * (w * w + z * z) - 1.0,
    );

    dcm * v_world
}
