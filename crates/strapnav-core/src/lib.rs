//! # strapnav-core
//!
//! Strapdown inertial navigation with a multiplicative error-state
//! Extended Kalman Filter.
//!
//! The nominal navigation state (velocity, earth-to-nav and nav-to-body
//! attitude quaternions, altitude, auxiliary biases) is integrated by a
//! strapdown mechanizer; an error-state filter linearizes the deviation
//! dynamics around the current nominal state, propagates the error
//! covariance, and folds measurement corrections back into the nominal
//! state through left-multiplied error quaternions.
//!
//! ## Modules
//!
//! - [`earth`]: reference-ellipsoid geometry (curvature radii, rotation
//!   rate, gravity)
//! - [`math`]: rotation and quaternion utilities
//! - [`state`]: nominal navigation state and the strapdown mechanizer
//! - [`estimation`]: linearization engine, covariance filter, error-state
//!   estimator

pub mod earth;
pub mod math;
pub mod state;
pub mod estimation;

use nalgebra::{Matrix3, UnitQuaternion, Vector3};

/// Scalar type used throughout the crate. Every quantity is expressed in
/// terms of this alias, so precision is a single-point decision.
pub type Scalar = f64;

/// 3D vector type
pub type Vec3 = Vector3<Scalar>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<Scalar>;

/// Unit quaternion type for attitude
pub type Quat = UnitQuaternion<Scalar>;
