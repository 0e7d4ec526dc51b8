//! Sensor error models
//!
//! Wrap the ideal quantities a scenario produces in the noise and bias
//! an instrument would add. All models draw from seeded generators so
//! simulation runs are reproducible.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use strapnav_core::math::{heading_of, latitude_of, longitude_of};
use strapnav_core::state::{ImuSample, StrapdownIns, StrapdownMechanizer};
use strapnav_core::{Scalar, Vec3};

use crate::config::{AidingConfig, ImuNoiseConfig};

fn gaussian_vec3(rng: &mut StdRng, dist: &Normal<Scalar>) -> Vec3 {
    Vec3::new(dist.sample(rng), dist.sample(rng), dist.sample(rng))
}

/// Inertial sensor model: constant bias plus white noise.
#[derive(Debug, Clone)]
pub struct ImuModel {
    accel_noise: Normal<Scalar>,
    gyro_noise: Normal<Scalar>,
    accel_bias: Vec3,
    gyro_bias: Vec3,
    rng: StdRng,
}

impl ImuModel {
    pub fn new(config: &ImuNoiseConfig, seed: u64) -> Self {
        Self {
            accel_noise: Normal::new(0.0, config.accel_noise_std).expect("noise std"),
            gyro_noise: Normal::new(0.0, config.gyro_noise_std).expect("noise std"),
            accel_bias: config.accel_bias,
            gyro_bias: config.gyro_bias,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Corrupt an ideal inertial sample.
    pub fn measure(&mut self, ideal: &ImuSample) -> ImuSample {
        ImuSample::new(
            ideal.specific_force + self.accel_bias + gaussian_vec3(&mut self.rng, &self.accel_noise),
            ideal.angular_rate + self.gyro_bias + gaussian_vec3(&mut self.rng, &self.gyro_noise),
        )
    }
}

/// Satellite receiver model: noisy geodetic position and
/// navigation-frame velocity.
#[derive(Debug, Clone)]
pub struct GnssModel {
    velocity_noise: Normal<Scalar>,
    position_noise: Normal<Scalar>,
    rng: StdRng,
}

/// One satellite fix.
#[derive(Debug, Clone, Copy)]
pub struct GnssFix {
    pub latitude: Scalar,
    pub longitude: Scalar,
    pub altitude: Scalar,
    pub velocity: Vec3,
}

impl GnssModel {
    pub fn new(config: &AidingConfig, seed: u64) -> Self {
        Self {
            velocity_noise: Normal::new(0.0, config.gnss_velocity_std).expect("noise std"),
            position_noise: Normal::new(0.0, config.gnss_position_std).expect("noise std"),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn measure(&mut self, truth: &StrapdownIns) -> GnssFix {
        let dcm = truth.dcm_e2n();
        let lat = latitude_of(&dcm);
        let rm = strapnav_core::earth::radius_meridian(lat) + truth.altitude();
        let rn = strapnav_core::earth::radius_normal(lat) + truth.altitude();
        let north_err = self.position_noise.sample(&mut self.rng);
        let east_err = self.position_noise.sample(&mut self.rng);
        GnssFix {
            latitude: lat + north_err / rm,
            longitude: longitude_of(&dcm) + east_err / (rn * lat.cos().max(1e-6)),
            altitude: truth.altitude() + self.position_noise.sample(&mut self.rng),
            velocity: truth.velocity() + gaussian_vec3(&mut self.rng, &self.velocity_noise),
        }
    }
}

/// Barometric altimeter model.
#[derive(Debug, Clone)]
pub struct BaroModel {
    noise: Normal<Scalar>,
    rng: StdRng,
}

impl BaroModel {
    pub fn new(config: &AidingConfig, seed: u64) -> Self {
        Self {
            noise: Normal::new(0.0, config.baro_std).expect("noise std"),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn measure(&mut self, truth: &StrapdownIns) -> Scalar {
        truth.altitude() + self.noise.sample(&mut self.rng)
    }
}

/// Magnetic compass model: noisy heading.
#[derive(Debug, Clone)]
pub struct MagModel {
    noise: Normal<Scalar>,
    rng: StdRng,
}

impl MagModel {
    pub fn new(config: &AidingConfig, seed: u64) -> Self {
        Self {
            noise: Normal::new(0.0, config.mag_std).expect("noise std"),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn measure(&mut self, truth: &StrapdownIns) -> Scalar {
        heading_of(&truth.dcm_n2b()) + self.noise.sample(&mut self.rng)
    }
}
