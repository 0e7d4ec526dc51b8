//! Reference-ellipsoid geometry
//!
//! WGS84 constants, the two principal radii of curvature used to convert
//! angular position rates to linear velocity, the Earth rotation-rate
//! constant, and Somigliana normal gravity. The linearization engine and
//! the strapdown mechanizer both consume an [`EarthModel`]; constructing
//! them from the same model keeps curvature and rotation terms
//! consistent across the filter.

use serde::{Deserialize, Serialize};

use crate::Scalar;

/// Earth's rotation rate [rad/s]
pub const ROTATION_RATE: Scalar = 7.2921159e-5;
/// Semi-major (equatorial) axis of the WGS84 ellipsoid [m]
pub const SEMI_MAJOR_AXIS: Scalar = 6_378_137.0;
/// Semi-minor (polar) axis of the WGS84 ellipsoid [m]
pub const SEMI_MINOR_AXIS: Scalar = 6_356_752.314_25;
/// Mean Earth radius used by the spherical simplification [m]
pub const MEAN_RADIUS: Scalar = 6_371_000.0;
/// First eccentricity squared of the WGS84 ellipsoid
pub const ECCENTRICITY_SQUARED: Scalar = 6.694_379_990_14e-3;
/// Normal gravity at the equator [m/s^2]
pub const GRAVITY_EQUATOR: Scalar = 9.780_325_335_9;
/// Normal gravity at the poles [m/s^2]
pub const GRAVITY_POLE: Scalar = 9.832_184_937_8;
/// Somigliana constant (k in the normal-gravity formula)
pub const SOMIGLIANA_K: Scalar =
    (SEMI_MINOR_AXIS * GRAVITY_POLE - SEMI_MAJOR_AXIS * GRAVITY_EQUATOR)
        / (SEMI_MAJOR_AXIS * GRAVITY_EQUATOR);

/// Normal (prime-vertical, east-west) radius of curvature at a geodetic
/// latitude [rad].
pub fn radius_normal(latitude: Scalar) -> Scalar {
    let s = latitude.sin();
    SEMI_MAJOR_AXIS / (1.0 - ECCENTRICITY_SQUARED * s * s).sqrt()
}

/// Meridian (north-south) radius of curvature at a geodetic latitude
/// [rad].
pub fn radius_meridian(latitude: Scalar) -> Scalar {
    let s = latitude.sin();
    let d = 1.0 - ECCENTRICITY_SQUARED * s * s;
    SEMI_MAJOR_AXIS * (1.0 - ECCENTRICITY_SQUARED) / (d * d.sqrt())
}

/// Somigliana normal gravity at a geodetic latitude [rad] and altitude
/// [m]. The altitude dependence is the first-order free-air decrease.
pub fn gravity(latitude: Scalar, altitude: Scalar) -> Scalar {
    let s2 = latitude.sin().powi(2);
    let g0 = GRAVITY_EQUATOR * (1.0 + SOMIGLIANA_K * s2)
        / (1.0 - ECCENTRICITY_SQUARED * s2).sqrt();
    g0 * (1.0 - 2.0 * altitude / SEMI_MAJOR_AXIS)
}

/// Shape policy for the curvature radii.
///
/// `MeanSphere` substitutes a single mean radius for both principal
/// radii. This is a construction-time policy, not a runtime branch: pick
/// one when building the [`EarthModel`] and every consumer sees the same
/// geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EarthShape {
    /// WGS84 ellipsoidal radii
    Ellipsoidal,
    /// Single mean radius for both curvature directions
    MeanSphere,
}

/// Earth parameters shared by the mechanizer and the linearization
/// engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EarthModel {
    /// Rotation rate [rad/s]; WGS84 value by default, zero in
    /// reduced-physics regression setups
    pub rotation_rate: Scalar,
    /// Curvature-radius policy
    pub shape: EarthShape,
}

impl Default for EarthModel {
    fn default() -> Self {
        Self {
            rotation_rate: ROTATION_RATE,
            shape: EarthShape::Ellipsoidal,
        }
    }
}

impl EarthModel {
    /// WGS84 ellipsoid with the standard rotation rate
    pub fn wgs84() -> Self {
        Self::default()
    }

    /// Non-rotating spherical Earth (kinematic terms only)
    pub fn non_rotating_sphere() -> Self {
        Self {
            rotation_rate: 0.0,
            shape: EarthShape::MeanSphere,
        }
    }

    /// Normal radius of curvature under the configured shape policy
    pub fn radius_normal(&self, latitude: Scalar) -> Scalar {
        match self.shape {
            EarthShape::Ellipsoidal => radius_normal(latitude),
            EarthShape::MeanSphere => MEAN_RADIUS,
        }
    }

    /// Meridian radius of curvature under the configured shape policy
    pub fn radius_meridian(&self, latitude: Scalar) -> Scalar {
        match self.shape {
            EarthShape::Ellipsoidal => radius_meridian(latitude),
            EarthShape::MeanSphere => MEAN_RADIUS,
        }
    }

    /// Normal gravity magnitude (down-positive in NED)
    pub fn gravity(&self, latitude: Scalar, altitude: Scalar) -> Scalar {
        gravity(latitude, altitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_3;

    #[test]
    fn normal_radius_exceeds_meridian_radius_off_equator() {
        // Oblate ellipsoid: Rn > Rm everywhere except at the poles,
        // where both approach the same polar value.
        for lat_deg in [-80.0, -45.0, -10.0, 10.0, 35.0, 60.0, 89.0] {
            let lat = (lat_deg as Scalar).to_radians();
            assert!(radius_normal(lat) > radius_meridian(lat));
        }
    }

    #[test]
    fn radii_at_equator() {
        assert_relative_eq!(radius_normal(0.0), SEMI_MAJOR_AXIS, epsilon = 1e-6);
        assert_relative_eq!(
            radius_meridian(0.0),
            SEMI_MAJOR_AXIS * (1.0 - ECCENTRICITY_SQUARED),
            epsilon = 1e-6
        );
    }

    #[test]
    fn radii_finite_at_poles() {
        let lat = std::f64::consts::FRAC_PI_2;
        assert!(radius_normal(lat).is_finite());
        assert!(radius_meridian(lat).is_finite());
        // At the poles both radii equal a^2 / b.
        let expected = SEMI_MAJOR_AXIS * SEMI_MAJOR_AXIS / SEMI_MINOR_AXIS;
        assert_relative_eq!(radius_normal(lat), expected, epsilon = 1.0);
        assert_relative_eq!(radius_meridian(lat), expected, epsilon = 1.0);
    }

    #[test]
    fn mean_sphere_substitutes_one_radius_for_both() {
        let earth = EarthModel {
            rotation_rate: ROTATION_RATE,
            shape: EarthShape::MeanSphere,
        };
        assert_eq!(earth.radius_normal(FRAC_PI_3), MEAN_RADIUS);
        assert_eq!(earth.radius_meridian(FRAC_PI_3), MEAN_RADIUS);
    }

    #[test]
    fn gravity_increases_toward_poles_and_decreases_with_altitude() {
        assert_relative_eq!(gravity(0.0, 0.0), GRAVITY_EQUATOR, epsilon = 1e-9);
        assert_relative_eq!(
            gravity(std::f64::consts::FRAC_PI_2, 0.0),
            GRAVITY_POLE,
            epsilon = 1e-6
        );
        assert!(gravity(FRAC_PI_3, 1000.0) < gravity(FRAC_PI_3, 0.0));
    }
}
