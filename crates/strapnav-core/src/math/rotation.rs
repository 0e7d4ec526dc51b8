//! Skew-symmetric and direction-cosine-matrix helpers

use crate::{Mat3, Scalar, Vec3};

/// Skew-symmetric matrix from a vector (hat operator)
///
/// For v = [x, y, z]^T:
/// ```text
/// [v]x = [ 0  -z   y]
///        [ z   0  -x]
///        [-y   x   0]
/// ```
///
/// so that `skew(a) * b == a.cross(&b)`.
pub fn skew(v: &Vec3) -> Mat3 {
    Mat3::new(
        0.0, -v.z, v.y,
        v.z, 0.0, -v.x,
        -v.y, v.x, 0.0,
    )
}

/// Extract column `c` of a DCM as a vector.
pub fn dcm_column(dcm: &Mat3, c: usize) -> Vec3 {
    Vec3::new(dcm[(0, c)], dcm[(1, c)], dcm[(2, c)])
}

/// Geodetic latitude implied by an earth-to-nav DCM.
///
/// The third column of the DCM is the Earth spin axis expressed in
/// navigation coordinates, (cos(lat), *, -sin(lat)) for a locally-level
/// frame, so the (2,2) entry recovers the latitude regardless of the
/// frame's azimuth.
pub fn latitude_of(dcm_e2n: &Mat3) -> Scalar {
    (-dcm_e2n[(2, 2)]).clamp(-1.0, 1.0).asin()
}

/// Longitude implied by an earth-to-nav DCM.
///
/// Reads the down axis (third row), which points at the Earth's center
/// regardless of the frame's azimuth.
pub fn longitude_of(dcm_e2n: &Mat3) -> Scalar {
    (-dcm_e2n[(2, 1)]).atan2(-dcm_e2n[(2, 0)])
}

/// Heading (yaw) of the body x-axis over navigation north, from a
/// nav-to-body DCM. Rows of the DCM are the body axes in navigation
/// coordinates.
pub fn heading_of(dcm_n2b: &Mat3) -> Scalar {
    dcm_n2b[(0, 1)].atan2(dcm_n2b[(0, 0)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn skew_matches_cross_product() {
        let a = Vec3::new(1.0, -2.0, 3.0);
        let b = Vec3::new(0.5, 4.0, -1.0);
        assert_relative_eq!(skew(&a) * b, a.cross(&b), epsilon = 1e-12);
    }

    #[test]
    fn skew_is_antisymmetric() {
        let s = skew(&Vec3::new(0.3, 0.7, -0.2));
        assert_relative_eq!(s, -s.transpose(), epsilon = 1e-12);
    }

    #[test]
    fn geodetic_angles_recovered_from_full_dcm() {
        let (lat, lon): (Scalar, Scalar) = (0.55, -1.2);
        let (sp, cp) = (lat.sin(), lat.cos());
        let (sl, cl) = (lon.sin(), lon.cos());
        let dcm_e2n = Mat3::new(
            -sp * cl, -sp * sl, cp,
            -sl, cl, 0.0,
            -cp * cl, -cp * sl, -sp,
        );
        assert_relative_eq!(latitude_of(&dcm_e2n), lat, epsilon = 1e-12);
        assert_relative_eq!(longitude_of(&dcm_e2n), lon, epsilon = 1e-12);
    }

    #[test]
    fn heading_read_from_body_x_axis() {
        let yaw: Scalar = 0.9;
        let (sy, cy) = (yaw.sin(), yaw.cos());
        let dcm_n2b = Mat3::new(
            cy, sy, 0.0,
            -sy, cy, 0.0,
            0.0, 0.0, 1.0,
        );
        assert_relative_eq!(heading_of(&dcm_n2b), yaw, epsilon = 1e-12);
    }

    #[test]
    fn latitude_recovered_from_spin_axis_column() {
        let lat: Scalar = 0.6;
        // Locally-level frame at `lat`, zero longitude and azimuth: the
        // spin axis in NED coordinates is (cos(lat), 0, -sin(lat)).
        let dcm_e2n = Mat3::new(
            -lat.sin(), 0.0, lat.cos(),
            0.0, 1.0, 0.0,
            -lat.cos(), 0.0, -lat.sin(),
        );
        assert_relative_eq!(latitude_of(&dcm_e2n), lat, epsilon = 1e-12);
    }
}
