//! Truth scenarios
//!
//! A scenario owns a truth-state mechanizer and synthesizes the exact
//! inertial readings that reproduce its motion (inverse dynamics), so a
//! navigator fed those readings tracks the truth to integration
//! accuracy. Velocity is held constant in navigation axes, which covers
//! the stationary case and steady cruise over the curved rotating
//! Earth.

use strapnav_core::earth::EarthModel;
use strapnav_core::state::{ImuSample, NavState, StrapdownIns, StrapdownMechanizer};
use strapnav_core::{Scalar, Vec3};

use crate::config::InitialStateConfig;

/// Constant-velocity truth scenario.
#[derive(Debug, Clone)]
pub struct Scenario {
    truth: StrapdownIns,
}

impl Scenario {
    pub fn new(initial: &InitialStateConfig, earth: EarthModel) -> Self {
        let mut state = NavState::level(
            initial.latitude,
            initial.longitude,
            initial.altitude,
            initial.heading,
        );
        state.velocity = initial.velocity;
        Self {
            truth: StrapdownIns::new(state, earth),
        }
    }

    /// Stationary truth at a geodetic position.
    pub fn stationary(
        latitude: Scalar,
        longitude: Scalar,
        altitude: Scalar,
        heading: Scalar,
        earth: EarthModel,
    ) -> Self {
        Self::new(
            &InitialStateConfig {
                latitude,
                longitude,
                altitude,
                heading,
                velocity: Vec3::zeros(),
            },
            earth,
        )
    }

    pub fn truth(&self) -> &StrapdownIns {
        &self.truth
    }

    /// Exact inertial readings for the current truth state.
    ///
    /// With the navigation-frame velocity held constant, the specific
    /// force balances gravity and the Coriolis/transport acceleration,
    /// and the gyro sees the navigation frame's own rotation.
    pub fn ideal_imu(&self) -> ImuSample {
        let v = self.truth.velocity();
        let omega_in = self.truth.earth_rate_nav() + self.truth.transport_rate_nav();
        let coriolis = self.truth.earth_rate_nav() * 2.0 + self.truth.transport_rate_nav();
        let f_n = coriolis.cross(&v) - Vec3::new(0.0, 0.0, self.truth.gravity());
        ImuSample::new(
            self.truth.dcm_n2b() * f_n,
            self.truth.dcm_n2b() * omega_in,
        )
    }

    /// Advance the truth by one step and return the inertial sample
    /// that produced the motion.
    pub fn step(&mut self, dt: Scalar) -> ImuSample {
        let imu = self.ideal_imu();
        self.truth.propagate(&imu, dt);
        imu
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn stationary_truth_does_not_move() {
        let mut scenario = Scenario::stationary(0.7, -0.4, 80.0, 0.5, EarthModel::wgs84());
        let lat0 = scenario.truth().latitude();
        for _ in 0..500 {
            scenario.step(0.01);
        }
        assert_relative_eq!(scenario.truth().velocity().norm(), 0.0, epsilon = 1e-9);
        assert_relative_eq!(scenario.truth().altitude(), 80.0, epsilon = 1e-9);
        assert_relative_eq!(scenario.truth().latitude(), lat0, epsilon = 1e-12);
    }

    #[test]
    fn cruise_holds_navigation_velocity_and_moves_north() {
        let initial = InitialStateConfig {
            latitude: 0.5,
            longitude: 0.1,
            altitude: 1000.0,
            heading: 0.0,
            velocity: Vec3::new(80.0, 0.0, 0.0),
        };
        let mut scenario = Scenario::new(&initial, EarthModel::wgs84());
        let lat0 = scenario.truth().latitude();
        for _ in 0..1000 {
            scenario.step(0.01);
        }
        assert_relative_eq!(
            scenario.truth().velocity(),
            Vec3::new(80.0, 0.0, 0.0),
            epsilon = 1e-6
        );
        // 800 m traveled north: latitude grows by roughly 800 / Rm.
        let expected = lat0
            + 800.0
                / (strapnav_core::earth::radius_meridian(lat0) + 1000.0);
        assert_relative_eq!(scenario.truth().latitude(), expected, max_relative = 1e-3);
    }

    #[test]
    fn navigator_fed_ideal_imu_tracks_the_truth() {
        let initial = InitialStateConfig {
            latitude: 0.62,
            longitude: 0.25,
            altitude: 500.0,
            heading: 0.3,
            velocity: Vec3::new(40.0, 25.0, 0.0),
        };
        let mut scenario = Scenario::new(&initial, EarthModel::wgs84());
        let mut navigator = scenario.truth().clone();
        for _ in 0..2000 {
            let imu = scenario.step(0.01);
            navigator.propagate(&imu, 0.01);
        }
        assert_relative_eq!(
            navigator.velocity(),
            scenario.truth().velocity(),
            epsilon = 1e-6
        );
        assert_relative_eq!(
            navigator.latitude(),
            scenario.truth().latitude(),
            epsilon = 1e-9
        );
    }
}
