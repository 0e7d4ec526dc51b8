//! Nominal navigation state and the strapdown mechanizer
//!
//! The nominal state keeps named fields — velocity, the two attitude
//! quaternions, altitude, auxiliary biases — rather than one flat
//! vector; the error-state index arithmetic (the "+1 after the first
//! quaternion, +2 after the second" rule) is confined to the estimation
//! layer's conversion code.
//!
//! Frames and signs: the navigation frame is locally level with NED
//! axes and free azimuth (the transport rate has no z-component, so
//! there is no tan-latitude term anywhere). Velocity is down-positive,
//! altitude is up-positive, so altitude integrates as `h' = -v_d`.

use nalgebra::{DVector, Quaternion};

use crate::earth::EarthModel;
use crate::math::{advance, dcm_column, dcm_of, latitude_of, quat_from_dcm};
use crate::{Mat3, Quat, Scalar, Vec3};

/// One inertial sample: specific force and angular rate measured in the
/// body frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImuSample {
    /// Specific force [m/s^2]
    pub specific_force: Vec3,
    /// Angular rate [rad/s]
    pub angular_rate: Vec3,
}

impl ImuSample {
    pub fn new(specific_force: Vec3, angular_rate: Vec3) -> Self {
        Self {
            specific_force,
            angular_rate,
        }
    }
}

/// Nominal navigation state.
///
/// `q_e2n` maps earth-frame coordinates to navigation-frame coordinates
/// and therefore encodes horizontal position on the rotating Earth;
/// `q_n2b` is the vehicle attitude. `biases` holds any auxiliary
/// slow-drift states appended to the error model (error index 10
/// onward).
#[derive(Debug, Clone, PartialEq)]
pub struct NavState {
    /// Velocity in navigation axes [m/s], NED, down-positive
    pub velocity: Vec3,
    /// Earth-to-navigation attitude quaternion
    pub q_e2n: Quat,
    /// Altitude above the ellipsoid [m], up-positive
    pub altitude: Scalar,
    /// Navigation-to-body attitude quaternion
    pub q_n2b: Quat,
    /// Auxiliary bias states
    pub biases: DVector<Scalar>,
}

impl NavState {
    /// Level, stationary state at a geodetic position with the given
    /// heading [rad] and no auxiliary bias states.
    pub fn level(latitude: Scalar, longitude: Scalar, altitude: Scalar, heading: Scalar) -> Self {
        let (sp, cp) = (latitude.sin(), latitude.cos());
        let (sl, cl) = (longitude.sin(), longitude.cos());
        // Rows of the earth-to-nav DCM are the N/E/D axes in earth
        // coordinates.
        let dcm_e2n = Mat3::new(
            -sp * cl, -sp * sl, cp,
            -sl, cl, 0.0,
            -cp * cl, -cp * sl, -sp,
        );
        let (sy, cy) = (heading.sin(), heading.cos());
        let dcm_n2b = Mat3::new(
            cy, sy, 0.0,
            -sy, cy, 0.0,
            0.0, 0.0, 1.0,
        );
        Self {
            velocity: Vec3::zeros(),
            q_e2n: quat_from_dcm(&dcm_e2n),
            altitude,
            q_n2b: quat_from_dcm(&dcm_n2b),
            biases: DVector::zeros(0),
        }
    }

    /// Same state with `n` zero-initialized auxiliary bias states.
    pub fn with_bias_states(mut self, n: usize) -> Self {
        self.biases = DVector::zeros(n);
        self
    }
}

/// Capability interface of the baseline strapdown mechanization.
///
/// The error-state estimator holds an implementation of this trait and
/// drives it through the accessors and mutators below; it never touches
/// the nominal state by position.
pub trait StrapdownMechanizer {
    /// Integrate the nominal state forward by one inertial sample.
    fn propagate(&mut self, imu: &ImuSample, dt: Scalar);
    /// Recalculate cached derived quantities (DCMs, latitude,
    /// earth-rate and transport-rate vectors) from the current state.
    fn recompute_derived(&mut self);

    fn velocity(&self) -> Vec3;
    fn altitude(&self) -> Scalar;
    /// Geodetic latitude implied by the current earth-to-nav attitude.
    fn latitude(&self) -> Scalar;
    fn q_e2n(&self) -> Quat;
    fn q_n2b(&self) -> Quat;
    fn dcm_e2n(&self) -> Mat3;
    fn dcm_n2b(&self) -> Mat3;
    fn bias_dim(&self) -> usize;
    fn bias(&self, index: usize) -> Scalar;

    fn set_velocity(&mut self, velocity: Vec3);
    fn set_altitude(&mut self, altitude: Scalar);
    /// Left-multiply the earth-to-nav quaternion by `dq`, renormalizing.
    fn premultiply_q_e2n(&mut self, dq: Quaternion<Scalar>);
    /// Left-multiply the nav-to-body quaternion by `dq`, renormalizing.
    fn premultiply_q_n2b(&mut self, dq: Quaternion<Scalar>);
    fn adjust_bias(&mut self, index: usize, delta: Scalar);
}

/// Reference strapdown mechanizer.
///
/// First-order integration of the velocity, attitude, and altitude
/// kinematics over a rotating ellipsoidal Earth, with a cache of derived
/// quantities refreshed by [`StrapdownMechanizer::recompute_derived`].
#[derive(Debug, Clone)]
pub struct StrapdownIns {
    state: NavState,
    earth: EarthModel,
    dcm_e2n: Mat3,
    dcm_n2b: Mat3,
    latitude: Scalar,
    earth_rate_n: Vec3,
    transport_rate_n: Vec3,
    gravity: Scalar,
}

impl StrapdownIns {
    pub fn new(state: NavState, earth: EarthModel) -> Self {
        let mut ins = Self {
            state,
            earth,
            dcm_e2n: Mat3::identity(),
            dcm_n2b: Mat3::identity(),
            latitude: 0.0,
            earth_rate_n: Vec3::zeros(),
            transport_rate_n: Vec3::zeros(),
            gravity: 0.0,
        };
        ins.recompute_derived();
        ins
    }

    pub fn state(&self) -> &NavState {
        &self.state
    }

    pub fn earth(&self) -> &EarthModel {
        &self.earth
    }

    /// Earth rotation rate expressed in navigation axes (cached).
    pub fn earth_rate_nav(&self) -> Vec3 {
        self.earth_rate_n
    }

    /// Transport rate of the navigation frame over the ellipsoid
    /// (cached).
    pub fn transport_rate_nav(&self) -> Vec3 {
        self.transport_rate_n
    }

    /// Normal gravity at the current position (cached).
    pub fn gravity(&self) -> Scalar {
        self.gravity
    }
}

impl StrapdownMechanizer for StrapdownIns {
    fn propagate(&mut self, imu: &ImuSample, dt: Scalar) {
        let v = self.state.velocity;
        let f_n = self.dcm_n2b.transpose() * imu.specific_force;
        let coriolis = self.earth_rate_n * 2.0 + self.transport_rate_n;
        let accel_n = f_n + Vec3::new(0.0, 0.0, self.gravity) - coriolis.cross(&v);

        // Body rate relative to the navigation frame: measured inertial
        // rate minus the frame's own rotation mapped into body axes.
        let omega_nb_b =
            imu.angular_rate - self.dcm_n2b * (self.earth_rate_n + self.transport_rate_n);

        self.state.q_n2b = advance(&self.state.q_n2b, &omega_nb_b, dt);
        self.state.q_e2n = advance(&self.state.q_e2n, &self.transport_rate_n, dt);
        self.state.altitude -= v.z * dt;
        self.state.velocity = v + accel_n * dt;

        self.recompute_derived();
    }

    fn recompute_derived(&mut self) {
        self.dcm_e2n = dcm_of(&self.state.q_e2n);
        self.dcm_n2b = dcm_of(&self.state.q_n2b);
        self.latitude = latitude_of(&self.dcm_e2n);

        let rn = self.earth.radius_normal(self.latitude) + self.state.altitude;
        let rm = self.earth.radius_meridian(self.latitude) + self.state.altitude;
        let v = self.state.velocity;

        self.earth_rate_n = self.earth.rotation_rate * dcm_column(&self.dcm_e2n, 2);
        self.transport_rate_n = Vec3::new(v.y / rn, -v.x / rm, 0.0);
        self.gravity = self.earth.gravity(self.latitude, self.state.altitude);
    }

    fn velocity(&self) -> Vec3 {
        self.state.velocity
    }

    fn altitude(&self) -> Scalar {
        self.state.altitude
    }

    fn latitude(&self) -> Scalar {
        self.latitude
    }

    fn q_e2n(&self) -> Quat {
        self.state.q_e2n
    }

    fn q_n2b(&self) -> Quat {
        self.state.q_n2b
    }

    fn dcm_e2n(&self) -> Mat3 {
        self.dcm_e2n
    }

    fn dcm_n2b(&self) -> Mat3 {
        self.dcm_n2b
    }

    fn bias_dim(&self) -> usize {
        self.state.biases.len()
    }

    fn bias(&self, index: usize) -> Scalar {
        self.state.biases[index]
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.state.velocity = velocity;
    }

    fn set_altitude(&mut self, altitude: Scalar) {
        self.state.altitude = altitude;
    }

    fn premultiply_q_e2n(&mut self, dq: Quaternion<Scalar>) {
        self.state.q_e2n = Quat::from_quaternion(dq * self.state.q_e2n.into_inner());
    }

    fn premultiply_q_n2b(&mut self, dq: Quaternion<Scalar>) {
        self.state.q_n2b = Quat::from_quaternion(dq * self.state.q_n2b.into_inner());
    }

    fn adjust_bias(&mut self, index: usize, delta: Scalar) {
        self.state.biases[index] += delta;
    }
}
