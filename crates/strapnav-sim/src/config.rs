//! Simulation configuration
//!
//! Serde-backed configuration for scenario runs: time base, initial
//! state, sensor noise levels and update rates.

use serde::{Deserialize, Serialize};

use strapnav_core::{Scalar, Vec3};

/// Top-level simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Inertial sample period [s]
    pub dt: Scalar,
    /// Total simulated duration [s]
    pub duration: Scalar,
    /// Initial truth state
    pub initial_state: InitialStateConfig,
    /// Inertial sensor errors
    pub imu: ImuNoiseConfig,
    /// Aiding sensor errors and rates
    pub aiding: AidingConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: 0.01, // 100 Hz inertial loop
            duration: 60.0,
            initial_state: InitialStateConfig::default(),
            imu: ImuNoiseConfig::default(),
            aiding: AidingConfig::default(),
        }
    }
}

/// Initial truth state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitialStateConfig {
    /// Geodetic latitude [rad]
    pub latitude: Scalar,
    /// Geodetic longitude [rad]
    pub longitude: Scalar,
    /// Altitude above the ellipsoid [m]
    pub altitude: Scalar,
    /// Heading [rad]
    pub heading: Scalar,
    /// Velocity in navigation axes [m/s]
    pub velocity: Vec3,
}

impl Default for InitialStateConfig {
    fn default() -> Self {
        Self {
            latitude: 0.62,
            longitude: 0.25,
            altitude: 120.0,
            heading: 0.0,
            velocity: Vec3::zeros(),
        }
    }
}

/// Inertial sensor error model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImuNoiseConfig {
    /// Accelerometer noise std dev [m/s^2]
    pub accel_noise_std: Scalar,
    /// Gyroscope noise std dev [rad/s]
    pub gyro_noise_std: Scalar,
    /// Constant accelerometer bias [m/s^2]
    pub accel_bias: Vec3,
    /// Constant gyroscope bias [rad/s]
    pub gyro_bias: Vec3,
}

impl Default for ImuNoiseConfig {
    fn default() -> Self {
        Self {
            accel_noise_std: 0.05,
            gyro_noise_std: 5e-4,
            accel_bias: Vec3::zeros(),
            gyro_bias: Vec3::zeros(),
        }
    }
}

/// Aiding sensor error model and cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AidingConfig {
    /// Satellite fix interval in inertial steps
    pub gnss_interval: usize,
    /// Satellite velocity noise std dev [m/s]
    pub gnss_velocity_std: Scalar,
    /// Satellite position noise std dev [m]
    pub gnss_position_std: Scalar,
    /// Barometric altitude noise std dev [m]
    pub baro_std: Scalar,
    /// Magnetic heading noise std dev [rad]
    pub mag_std: Scalar,
}

impl Default for AidingConfig {
    fn default() -> Self {
        Self {
            gnss_interval: 100, // 1 Hz against a 100 Hz inertial loop
            gnss_velocity_std: 0.1,
            gnss_position_std: 2.5,
            baro_std: 1.5,
            mag_std: 0.02,
        }
    }
}
