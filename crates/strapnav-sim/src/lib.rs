//! # strapnav-sim
//!
//! Simulation collaborators for the strapnav estimation core: truth
//! scenarios with inverse-dynamics inertial synthesis, noisy sensor
//! models, and builders for the `(H, z, R)` measurement tuples the
//! error-state estimator consumes.
//!
//! ## Modules
//!
//! - [`config`]: serde-backed simulation configuration
//! - [`scenario`]: truth-state propagation and ideal inertial samples
//! - [`sensors`]: IMU/GNSS/barometer/magnetometer noise models
//! - [`measurements`]: measurement-tuple builders per aiding source

pub mod config;
pub mod measurements;
pub mod scenario;
pub mod sensors;

pub use config::*;
pub use measurements::*;
pub use scenario::*;
pub use sensors::*;
