//! Continuous-time error-dynamics Jacobians
//!
//! Builds the state-transition matrix A (10x10) and the input-coupling
//! matrix B (10x7) of the error-state dynamics around the current
//! nominal state, including Earth-rotation and curvature effects. Both
//! matrices are rebuilt from scratch on every call; entries with no
//! dependency are exact zeros.
//!
//! Error conventions (see [`crate::math::quaternion`]): attitude-block
//! errors are error-quaternion vector parts, i.e. half-angle rotation
//! vectors, which introduces the factors of 2 on the accelerometer
//! lever and earth-rate terms and the factors of 1/2 on the
//! velocity-to-tilt couplings.

use crate::earth::EarthModel;
use crate::math::{dcm_column, skew};
use crate::state::{ImuSample, StrapdownMechanizer};
use crate::{Mat3, Scalar, Vec3};

use super::{InputMatrix, StateMatrix};

/// Nominal quantities a linearization is evaluated at.
///
/// Captured *before* the mechanizer propagates past the point, so the
/// covariance prediction uses the same linearization point as the
/// nominal integration step it accompanies.
#[derive(Debug, Clone, Copy)]
pub struct LinearizationPoint {
    pub velocity: Vec3,
    pub altitude: Scalar,
    pub latitude: Scalar,
    pub dcm_e2n: Mat3,
    pub dcm_n2b: Mat3,
}

impl LinearizationPoint {
    /// Snapshot the current nominal state of a mechanizer.
    pub fn capture<M: StrapdownMechanizer + ?Sized>(ins: &M) -> Self {
        Self {
            velocity: ins.velocity(),
            altitude: ins.altitude(),
            latitude: ins.latitude(),
            dcm_e2n: ins.dcm_e2n(),
            dcm_n2b: ins.dcm_n2b(),
        }
    }
}

/// Error-dynamics linearization engine.
///
/// Physics variants are construction-time configuration, not runtime
/// branches: the curvature-radius policy rides on the [`EarthModel`]
/// and the centripetal correction is a builder flag, so both variants
/// are testable in one binary.
#[derive(Debug, Clone)]
pub struct LinearizationEngine {
    earth: EarthModel,
    centripetal_correction: bool,
}

impl LinearizationEngine {
    pub fn new(earth: EarthModel) -> Self {
        Self {
            earth,
            centripetal_correction: false,
        }
    }

    /// Enable the centripetal-acceleration sensitivity terms.
    pub fn with_centripetal_correction(mut self, enabled: bool) -> Self {
        self.centripetal_correction = enabled;
        self
    }

    pub fn earth(&self) -> &EarthModel {
        &self.earth
    }

    /// Build the state-transition Jacobian A at the given point.
    pub fn build_a(&self, at: &LinearizationPoint, imu: &ImuSample) -> StateMatrix {
        let v = at.velocity;
        let rn = self.earth.radius_normal(at.latitude) + at.altitude;
        let rm = self.earth.radius_meridian(at.latitude) + at.altitude;
        let rate = self.earth.rotation_rate;

        // Earth spin axis in navigation coordinates is the third column
        // of the earth-to-nav DCM.
        let spin_axis = dcm_column(&at.dcm_e2n, 2);
        let earth_rate = rate * spin_axis;
        let transport = Vec3::new(v.y / rn, -v.x / rm, 0.0);
        let omega_1 = earth_rate * 2.0 + transport;
        let omega_2 = earth_rate + transport;

        // Measured specific force mapped into navigation axes.
        let accel_n = at.dcm_n2b.transpose() * imu.specific_force;

        // Transport-rate sensitivities to velocity and altitude.
        let dtr_dv = Mat3::new(
            0.0, 1.0 / rn, 0.0,
            -1.0 / rm, 0.0, 0.0,
            0.0, 0.0, 0.0,
        );
        let dtr_dh = Vec3::new(-v.y / (rn * rn), v.x / (rm * rm), 0.0);

        let mut a = StateMatrix::zeros();

        // Velocity error rows.
        let vel_vel = -skew(&omega_1) + skew(&v) * dtr_dv;
        a.fixed_view_mut::<3, 3>(0, 0).copy_from(&vel_vel);

        let mut vel_pos = 4.0 * rate * skew(&v) * skew(&spin_axis) * at.dcm_e2n;
        let mut vel_alt = skew(&v) * dtr_dh;
        if self.centripetal_correction {
            let w = earth_rate;
            let r = Vec3::new(0.0, 0.0, -rn);
            let s = w.cross(&r);
            let lever = skew(&s) - Mat3::identity() * w.dot(&r) + r * w.transpose();
            vel_pos += lever * (2.0 * rate * skew(&spin_axis) * at.dcm_e2n);
            vel_alt += rate * rate * (spin_axis * spin_axis.z - Vec3::new(0.0, 0.0, 1.0));
        }
        a.fixed_view_mut::<3, 3>(0, 3).copy_from(&vel_pos);
        a.fixed_view_mut::<3, 1>(0, 6).copy_from(&vel_alt);
        a.fixed_view_mut::<3, 3>(0, 7)
            .copy_from(&(-2.0 * skew(&accel_n)));

        // Position (earth-to-nav tilt) rows.
        let half_e2n_t = 0.5 * at.dcm_e2n.transpose();
        a.fixed_view_mut::<3, 3>(3, 0)
            .copy_from(&(half_e2n_t * dtr_dv));
        a.fixed_view_mut::<3, 1>(3, 6)
            .copy_from(&(half_e2n_t * dtr_dh));

        // Altitude row: down-velocity convention, h' = -v_d.
        a[(6, 2)] = -1.0;

        // Attitude (nav-to-body tilt) rows.
        a.fixed_view_mut::<3, 3>(7, 0).copy_from(&(-0.5 * dtr_dv));
        for i in 0..3 {
            a[(7 + i, 3)] = -rate * at.dcm_e2n[(i, 1)];
            a[(7 + i, 4)] = rate * at.dcm_e2n[(i, 0)];
        }
        a.fixed_view_mut::<3, 1>(7, 6).copy_from(&(-0.5 * dtr_dh));
        a.fixed_view_mut::<3, 3>(7, 7).copy_from(&(-skew(&omega_2)));

        a
    }

    /// Build the input-coupling Jacobian B at the given point.
    pub fn build_b(&self, at: &LinearizationPoint, _imu: &ImuSample) -> InputMatrix {
        let b2n = at.dcm_n2b.transpose();

        let mut b = InputMatrix::zeros();
        // Accelerometer error drives the velocity rows directly.
        b.fixed_view_mut::<3, 3>(0, 0).copy_from(&b2n);
        // Gravity-model error feeds only the down-velocity channel.
        b[(2, 6)] = 1.0;
        // Gyroscope error drives the attitude rows through half the
        // body-to-nav map (half-angle error states).
        b.fixed_view_mut::<3, 3>(7, 3).copy_from(&(0.5 * b2n));
        b
    }

    /// Build both Jacobians at the mechanizer's current nominal state.
    pub fn build_at_nominal<M: StrapdownMechanizer + ?Sized>(
        &self,
        ins: &M,
        imu: &ImuSample,
    ) -> (StateMatrix, InputMatrix) {
        let at = LinearizationPoint::capture(ins);
        (self.build_a(&at, imu), self.build_b(&at, imu))
    }
}
