//! Named-field view of the error-state vector
//!
//! The contiguous 10-(or more-)dimensional vector exists only at the
//! Kalman-filter boundary. Everywhere else the error estimate travels
//! as an [`ErrorState`] with named fields, so the offset between error
//! indices and nominal-state fields (one extra parameter per expanded
//! quaternion) is enforced by this conversion and nowhere else.

use nalgebra::DVector;

use crate::{Scalar, Vec3};

use super::{EstimatorError, ERROR_STATE_DIM};

/// Error estimate in named-field form.
///
/// Vector layout: indices 0-2 velocity error, 3-5 earth-to-nav
/// attitude error (horizontal position), 6 altitude error, 7-9
/// nav-to-body attitude error, 10.. auxiliary bias errors. The two
/// attitude blocks are error-quaternion vector parts (half-angle
/// rotation vectors).
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorState {
    /// Navigation-frame velocity error [m/s]
    pub velocity: Vec3,
    /// Earth-to-nav attitude error; encodes horizontal position error
    pub position_tilt: Vec3,
    /// Altitude error [m]
    pub altitude: Scalar,
    /// Nav-to-body attitude error (attitude/heading)
    pub attitude_tilt: Vec3,
    /// Auxiliary bias errors (error indices 10 and up)
    pub biases: DVector<Scalar>,
}

impl ErrorState {
    /// Split a filter-side error vector into named fields.
    pub fn from_vector(x: &DVector<Scalar>) -> Result<Self, EstimatorError> {
        if x.len() < ERROR_STATE_DIM {
            return Err(EstimatorError::ErrorStateTooShort { len: x.len() });
        }
        Ok(Self {
            velocity: Vec3::new(x[0], x[1], x[2]),
            position_tilt: Vec3::new(x[3], x[4], x[5]),
            altitude: x[6],
            attitude_tilt: Vec3::new(x[7], x[8], x[9]),
            biases: x.rows(ERROR_STATE_DIM, x.len() - ERROR_STATE_DIM).into_owned(),
        })
    }

    /// Flatten back to the filter-side layout.
    pub fn to_vector(&self) -> DVector<Scalar> {
        let mut x = DVector::zeros(ERROR_STATE_DIM + self.biases.len());
        x.fixed_rows_mut::<3>(0).copy_from(&self.velocity);
        x.fixed_rows_mut::<3>(3).copy_from(&self.position_tilt);
        x[6] = self.altitude;
        x.fixed_rows_mut::<3>(7).copy_from(&self.attitude_tilt);
        x.rows_mut(ERROR_STATE_DIM, self.biases.len())
            .copy_from(&self.biases);
        x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_round_trip_preserves_layout() {
        let x = DVector::from_vec(vec![
            0.1, 0.2, 0.3, // velocity
            1e-4, 2e-4, 3e-4, // position tilt
            -1.5, // altitude
            4e-4, 5e-4, 6e-4, // attitude tilt
            0.01, 0.02, // biases
        ]);
        let e = ErrorState::from_vector(&x).unwrap();
        assert_eq!(e.velocity, Vec3::new(0.1, 0.2, 0.3));
        assert_eq!(e.position_tilt, Vec3::new(1e-4, 2e-4, 3e-4));
        assert_eq!(e.altitude, -1.5);
        assert_eq!(e.attitude_tilt, Vec3::new(4e-4, 5e-4, 6e-4));
        assert_eq!(e.biases.len(), 2);
        assert_eq!(e.to_vector(), x);
    }

    #[test]
    fn short_vector_is_rejected() {
        let x = DVector::zeros(7);
        assert!(ErrorState::from_vector(&x).is_err());
    }
}
