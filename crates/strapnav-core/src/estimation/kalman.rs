//! Covariance-filter contract and dense reference implementation
//!
//! The error-state estimator drives the covariance recursion through
//! the [`CovarianceFilter`] trait; the factorization strategy behind it
//! is interchangeable. [`DenseKalman`] is the reference implementation:
//! a plain dense recursion with a Joseph-form measurement update.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::Scalar;

use super::{
    EstimatorError, InputMatrix, ProcessNoiseMatrix, StateMatrix, ERROR_STATE_DIM,
    PROCESS_INPUT_DIM,
};

/// Contract of the generic covariance filter.
///
/// `predict` advances the error covariance with the continuous-time
/// Jacobians A and B over a step `dt`; `correct` consumes a measurement
/// model (H, R), updates the covariance internally, and hands the
/// Kalman gain back to the caller. The filter owns P and Q; the error
/// estimate itself is transient and lives with the caller.
pub trait CovarianceFilter {
    fn predict(&mut self, a: &StateMatrix, b: &InputMatrix, dt: Scalar);

    /// Compute the Kalman gain for (H, R) and update P. H must have
    /// [`ERROR_STATE_DIM`] columns and R must be square with H's row
    /// count; the innovation covariance must be invertible.
    fn correct(
        &mut self,
        h: &DMatrix<Scalar>,
        r: &DMatrix<Scalar>,
    ) -> Result<DMatrix<Scalar>, EstimatorError>;

    /// Current error covariance, for diagnostic inspection.
    fn covariance(&self) -> &StateMatrix;
}

/// Diagonal initial-covariance and process-noise configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoiseParams {
    /// Initial error-covariance diagonal (length [`ERROR_STATE_DIM`])
    pub p_diag: Vec<Scalar>,
    /// Process-noise diagonal (length [`PROCESS_INPUT_DIM`])
    pub q_diag: Vec<Scalar>,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            p_diag: vec![1.0; ERROR_STATE_DIM],
            q_diag: vec![1.0; PROCESS_INPUT_DIM],
        }
    }
}

/// Dense reference covariance filter.
#[derive(Debug, Clone)]
pub struct DenseKalman {
    p: StateMatrix,
    q: ProcessNoiseMatrix,
}

impl DenseKalman {
    /// Identity P and Q.
    pub fn new() -> Self {
        Self {
            p: StateMatrix::identity(),
            q: ProcessNoiseMatrix::identity(),
        }
    }

    pub fn with_covariance(p: StateMatrix, q: ProcessNoiseMatrix) -> Self {
        Self { p, q }
    }

    pub fn from_params(params: &NoiseParams) -> Self {
        let mut p = StateMatrix::identity();
        for (i, &v) in params.p_diag.iter().enumerate().take(ERROR_STATE_DIM) {
            p[(i, i)] = v;
        }
        let mut q = ProcessNoiseMatrix::identity();
        for (i, &v) in params.q_diag.iter().enumerate().take(PROCESS_INPUT_DIM) {
            q[(i, i)] = v;
        }
        Self { p, q }
    }

    pub fn process_noise(&self) -> &ProcessNoiseMatrix {
        &self.q
    }
}

impl Default for DenseKalman {
    fn default() -> Self {
        Self::new()
    }
}

impl CovarianceFilter for DenseKalman {
    fn predict(&mut self, a: &StateMatrix, b: &InputMatrix, dt: Scalar) {
        // First-order discretization of the continuous-time model.
        let phi = StateMatrix::identity() + a * dt;
        let gamma = b * dt;
        self.p = phi * self.p * phi.transpose() + gamma * self.q * gamma.transpose();
        // Keep P symmetric against accumulation of round-off.
        self.p = (self.p + self.p.transpose()) * 0.5;
    }

    fn correct(
        &mut self,
        h: &DMatrix<Scalar>,
        r: &DMatrix<Scalar>,
    ) -> Result<DMatrix<Scalar>, EstimatorError> {
        let k_rows = h.nrows();
        if h.ncols() != ERROR_STATE_DIM || r.nrows() != k_rows || r.ncols() != k_rows {
            return Err(EstimatorError::DimensionMismatch {
                h_rows: h.nrows(),
                h_cols: h.ncols(),
                z_len: k_rows,
                r_rows: r.nrows(),
                r_cols: r.ncols(),
            });
        }

        let p = DMatrix::from_fn(ERROR_STATE_DIM, ERROR_STATE_DIM, |i, j| self.p[(i, j)]);
        let s = h * &p * h.transpose() + r;
        let s_inv = s
            .clone()
            .try_inverse()
            .ok_or(EstimatorError::SingularInnovation)?;
        let gain = &p * h.transpose() * s_inv;

        // Joseph form keeps the updated covariance symmetric and
        // positive semi-definite for any gain.
        let i_kh = DMatrix::identity(ERROR_STATE_DIM, ERROR_STATE_DIM) - &gain * h;
        let updated = &i_kh * &p * i_kh.transpose() + &gain * r * gain.transpose();
        self.p = StateMatrix::from_fn(|i, j| updated[(i, j)]);

        Ok(gain)
    }

    fn covariance(&self) -> &StateMatrix {
        &self.p
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn noise_params_round_trip_through_json() {
        let params = NoiseParams::default();
        let text = serde_json::to_string(&params).unwrap();
        let back: NoiseParams = serde_json::from_str(&text).unwrap();
        assert_eq!(back.p_diag, params.p_diag);
        assert_eq!(back.q_diag, params.q_diag);
    }

    #[test]
    fn params_configure_the_diagonals() {
        let params = NoiseParams {
            p_diag: vec![2.0; ERROR_STATE_DIM],
            q_diag: vec![0.25; PROCESS_INPUT_DIM],
        };
        let kf = DenseKalman::from_params(&params);
        assert_eq!(kf.covariance()[(3, 3)], 2.0);
        assert_eq!(kf.process_noise()[(6, 6)], 0.25);
        assert_eq!(kf.covariance()[(0, 1)], 0.0);
    }

    #[test]
    fn zero_jacobians_leave_covariance_untouched() {
        let mut kf = DenseKalman::new();
        kf.predict(&StateMatrix::zeros(), &InputMatrix::zeros(), 0.01);
        assert_relative_eq!(*kf.covariance(), StateMatrix::identity(), epsilon = 1e-15);
    }

    #[test]
    fn process_noise_inflates_driven_states() {
        let mut kf = DenseKalman::new();
        let mut b = InputMatrix::zeros();
        b[(2, 6)] = 1.0;
        kf.predict(&StateMatrix::zeros(), &b, 0.1);
        assert!(kf.covariance()[(2, 2)] > 1.0);
        assert_relative_eq!(kf.covariance()[(0, 0)], 1.0, epsilon = 1e-15);
    }

    #[test]
    fn identity_measurement_halves_identity_covariance() {
        let mut kf = DenseKalman::new();
        let h = DMatrix::identity(ERROR_STATE_DIM, ERROR_STATE_DIM);
        let r = DMatrix::identity(ERROR_STATE_DIM, ERROR_STATE_DIM);
        let gain = kf.correct(&h, &r).unwrap();
        // P = I, H = I, R = I: K = 1/2 I and P' = 1/2 I.
        assert_relative_eq!(gain[(0, 0)], 0.5, epsilon = 1e-12);
        assert_relative_eq!(kf.covariance()[(4, 4)], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn zero_observation_matrix_yields_zero_gain_and_preserves_p() {
        let mut kf = DenseKalman::new();
        let before = *kf.covariance();
        let h = DMatrix::zeros(2, ERROR_STATE_DIM);
        let r = DMatrix::identity(2, 2);
        let gain = kf.correct(&h, &r).unwrap();
        assert_eq!(gain.nrows(), ERROR_STATE_DIM);
        assert_eq!(gain.ncols(), 2);
        assert_relative_eq!(gain.norm(), 0.0, epsilon = 1e-15);
        assert_relative_eq!(*kf.covariance(), before, epsilon = 1e-12);
    }

    #[test]
    fn shape_mismatch_is_reported_not_truncated() {
        let mut kf = DenseKalman::new();
        let h = DMatrix::zeros(2, ERROR_STATE_DIM + 1);
        let r = DMatrix::identity(2, 2);
        assert!(matches!(
            kf.correct(&h, &r),
            Err(EstimatorError::DimensionMismatch { .. })
        ));
        let h = DMatrix::zeros(2, ERROR_STATE_DIM);
        let r = DMatrix::identity(3, 3);
        assert!(matches!(
            kf.correct(&h, &r),
            Err(EstimatorError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn singular_innovation_is_detected() {
        let mut kf = DenseKalman::new();
        let h = DMatrix::zeros(1, ERROR_STATE_DIM);
        let r = DMatrix::zeros(1, 1);
        assert!(matches!(
            kf.correct(&h, &r),
            Err(EstimatorError::SingularInnovation)
        ));
    }

    #[test]
    fn covariance_stays_symmetric_through_cycles() {
        let mut kf = DenseKalman::new();
        let mut a = StateMatrix::zeros();
        a[(0, 3)] = 0.2;
        a[(7, 1)] = -0.1;
        let mut b = InputMatrix::zeros();
        b[(0, 0)] = 1.0;
        b[(7, 3)] = 0.5;
        let mut h = DMatrix::zeros(1, ERROR_STATE_DIM);
        h[(0, 6)] = 1.0;
        let r = DMatrix::identity(1, 1) * 0.5;
        for _ in 0..50 {
            kf.predict(&a, &b, 0.01);
            kf.correct(&h, &r).unwrap();
        }
        let p = kf.covariance();
        assert_relative_eq!(*p, p.transpose(), epsilon = 1e-9);
        for i in 0..ERROR_STATE_DIM {
            assert!(p[(i, i)] > 0.0);
        }
    }
}
