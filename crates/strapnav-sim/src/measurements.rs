//! Measurement-tuple builders
//!
//! Each aiding source reduces to a `(H, z, R)` tuple against the
//! 10-dimensional error state: H maps error states to the observed
//! residual, z is the predicted-minus-measured residual, and R is the
//! measurement noise covariance. The estimator subtracts the resulting
//! error estimate, so a positive residual (navigation solution ahead of
//! the measurement) pulls the nominal state back toward the
//! measurement.

use nalgebra::{DMatrix, DVector};

use strapnav_core::earth::EarthModel;
use strapnav_core::estimation::ERROR_STATE_DIM;
use strapnav_core::math::{latitude_of, longitude_of};
use strapnav_core::state::StrapdownMechanizer;
use strapnav_core::{Scalar, Vec3};

use crate::sensors::GnssFix;

/// Measurement tuple consumed by the estimator's correct step.
pub type Measurement = (DMatrix<Scalar>, DVector<Scalar>, DMatrix<Scalar>);

/// Velocity fix: observes the velocity error block directly.
pub fn velocity_fix(predicted: &Vec3, measured: &Vec3, variance: Scalar) -> Measurement {
    let mut h = DMatrix::zeros(3, ERROR_STATE_DIM);
    for i in 0..3 {
        h[(i, i)] = 1.0;
    }
    let residual = predicted - measured;
    let z = DVector::from_vec(vec![residual.x, residual.y, residual.z]);
    let r = DMatrix::identity(3, 3) * variance;
    (h, z, r)
}

/// Altitude fix (barometer or satellite height): observes the altitude
/// error state.
pub fn altitude_fix(predicted: Scalar, measured: Scalar, variance: Scalar) -> Measurement {
    let mut h = DMatrix::zeros(1, ERROR_STATE_DIM);
    h[(0, 6)] = 1.0;
    let z = DVector::from_vec(vec![predicted - measured]);
    let r = DMatrix::identity(1, 1) * variance;
    (h, z, r)
}

/// Heading fix (magnetic compass): observes twice the vertical
/// component of the nav-to-body attitude error (half-angle error
/// states). First-order in the tilt, adequate for near-level flight.
pub fn heading_fix(predicted: Scalar, measured: Scalar, variance: Scalar) -> Measurement {
    let mut h = DMatrix::zeros(1, ERROR_STATE_DIM);
    h[(0, 9)] = 2.0;
    let mut residual = predicted - measured;
    // Wrap to (-pi, pi] so a fix across the north seam stays small.
    while residual > std::f64::consts::PI {
        residual -= 2.0 * std::f64::consts::PI;
    }
    while residual <= -std::f64::consts::PI {
        residual += 2.0 * std::f64::consts::PI;
    }
    let z = DVector::from_vec(vec![residual]);
    let r = DMatrix::identity(1, 1) * variance;
    (h, z, r)
}

/// Horizontal position fix against a geodetic measurement.
///
/// The earth-to-nav tilt error displaces the navigation solution by
/// `2 * radius` per unit error component; the rows of the earth-to-nav
/// DCM map the tilt into north/east displacement. The residual is the
/// navigation solution's offset from the measured position, in meters.
pub fn position_fix<M: StrapdownMechanizer + ?Sized>(
    ins: &M,
    earth: &EarthModel,
    fix: &GnssFix,
    variance: Scalar,
) -> Measurement {
    let dcm = ins.dcm_e2n();
    let lat = latitude_of(&dcm);
    let lon = longitude_of(&dcm);
    let rm = earth.radius_meridian(lat) + ins.altitude();
    let rn = earth.radius_normal(lat) + ins.altitude();

    let mut h = DMatrix::zeros(2, ERROR_STATE_DIM);
    for c in 0..3 {
        h[(0, 3 + c)] = -2.0 * rm * dcm[(1, c)];
        h[(1, 3 + c)] = 2.0 * rn * dcm[(0, c)];
    }

    let z = DVector::from_vec(vec![
        (lat - fix.latitude) * rm,
        (lon - fix.longitude) * rn * lat.cos(),
    ]);
    let r = DMatrix::identity(2, 2) * variance;
    (h, z, r)
}
