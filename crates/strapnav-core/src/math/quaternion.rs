//! Attitude quaternion conventions and perturbations
//!
//! Quaternions are Hamilton, scalar-first, and compose *passively*: for
//! a frame rotation `q_a2b` the direction cosine matrix maps a-frame
//! coordinates to b-frame coordinates, and a product acts left-to-right
//! on coordinates, `dcm(p * q) = dcm(q) * dcm(p)`. Over nalgebra's
//! active rotations this means `dcm(q)` is the transpose of
//! `q.to_rotation_matrix()`; all frame mapping in the crate goes through
//! [`dcm_of`] so the convention lives in one place.
//!
//! Under this convention a small error quaternion `(1, u)` multiplied on
//! the *left* of `q_a2b` perturbs the DCM on the right:
//! `dcm((1, u) * q) = dcm(q) * (I - 2[u]x)`, with `u` expressed in the
//! a-frame. The vector part `u` is a half-angle quantity (the rotation
//! vector is `2u`), which is where the factors of 1/2 and 2 in the
//! error-state Jacobians come from.

use nalgebra::Quaternion;

use crate::{Mat3, Quat, Scalar, Vec3};

/// Direction cosine matrix of a frame-rotation quaternion.
///
/// For `q_a2b`, maps a-frame coordinates to b-frame coordinates.
pub fn dcm_of(q: &Quat) -> Mat3 {
    q.to_rotation_matrix().matrix().transpose()
}

/// Frame-rotation quaternion whose [`dcm_of`] equals the given DCM.
pub fn quat_from_dcm(dcm: &Mat3) -> Quat {
    Quat::from_rotation_matrix(&nalgebra::Rotation3::from_matrix_unchecked(
        dcm.transpose(),
    ))
}

/// First-order error quaternion with scalar part 1 and the given vector
/// part. Not normalized; feed it through [`perturb_left`] (or normalize
/// at the point of use).
pub fn error_quaternion(vector_part: &Vec3) -> Quaternion<Scalar> {
    Quaternion::new(1.0, vector_part.x, vector_part.y, vector_part.z)
}

/// Left-multiply `q` by the first-order error quaternion `(1, u)` and
/// renormalize.
pub fn perturb_left(q: &Quat, u: &Vec3) -> Quat {
    Quat::from_quaternion(error_quaternion(u) * q.into_inner())
}

/// Advance a frame rotation `q_a2b` by one integration step, given the
/// rotation rate of b relative to a expressed in b-frame coordinates.
pub fn advance(q: &Quat, omega_b: &Vec3, dt: Scalar) -> Quat {
    let theta_a = dcm_of(q).transpose() * (omega_b * dt);
    Quat::from_scaled_axis(theta_a) * q
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::rotation::{latitude_of, skew};
    use approx::assert_relative_eq;

    fn dcm_e2n_at(lat: Scalar) -> Mat3 {
        // Locally-level NED frame at latitude `lat`, zero longitude and
        // azimuth.
        Mat3::new(
            -lat.sin(), 0.0, lat.cos(),
            0.0, 1.0, 0.0,
            -lat.cos(), 0.0, -lat.sin(),
        )
    }

    #[test]
    fn products_compose_dcms_right_to_left() {
        let p = Quat::from_scaled_axis(Vec3::new(0.1, -0.2, 0.3));
        let q = Quat::from_scaled_axis(Vec3::new(-0.4, 0.1, 0.2));
        assert_relative_eq!(dcm_of(&(p * q)), dcm_of(&q) * dcm_of(&p), epsilon = 1e-12);
    }

    #[test]
    fn quat_from_dcm_round_trips() {
        let dcm = dcm_e2n_at(0.7);
        assert_relative_eq!(dcm_of(&quat_from_dcm(&dcm)), dcm, epsilon = 1e-12);
    }

    #[test]
    fn left_error_perturbs_dcm_on_the_right() {
        let q = Quat::from_scaled_axis(Vec3::new(0.3, 0.1, -0.2));
        let u = Vec3::new(1e-4, -2e-4, 3e-4);
        let perturbed = perturb_left(&q, &u);
        let expected = dcm_of(&q) * (Mat3::identity() - 2.0 * skew(&u));
        // First-order identity: residual is O(|u|^2).
        assert_relative_eq!(dcm_of(&perturbed), expected, epsilon = 1e-6);
    }

    #[test]
    fn advancing_with_northward_transport_raises_latitude() {
        let lat: Scalar = 0.5;
        let q_e2n = quat_from_dcm(&dcm_e2n_at(lat));
        let radius = 6.4e6;
        let v_north = 100.0;
        let dt = 1.0;
        // Transport rate for northward motion: -v_N / R about east.
        let omega_en_n = Vec3::new(0.0, -v_north / radius, 0.0);
        let advanced = advance(&q_e2n, &omega_en_n, dt);
        assert_relative_eq!(
            latitude_of(&dcm_of(&advanced)),
            lat + v_north * dt / radius,
            epsilon = 1e-9
        );
    }

    #[test]
    fn perturbation_stays_unit_norm() {
        let q = Quat::from_scaled_axis(Vec3::new(-0.2, 0.5, 0.1));
        let perturbed = perturb_left(&q, &Vec3::new(0.05, -0.02, 0.03));
        assert_relative_eq!(perturbed.norm(), 1.0, epsilon = 1e-12);
    }
}
