//! Error-state estimation
//!
//! - [`error_state`]: named-field view of the error vector and the
//!   error-to-nominal index mapping
//! - [`linearize`]: continuous-time error-dynamics Jacobians A and B
//! - [`kalman`]: covariance-filter contract and a dense reference
//!   implementation
//! - [`estimator`]: predict/correct orchestration and error injection

pub mod error_state;
pub mod estimator;
pub mod kalman;
pub mod linearize;

pub use error_state::*;
pub use estimator::*;
pub use kalman::*;
pub use linearize::*;

use nalgebra::SMatrix;
use thiserror::Error;

use crate::Scalar;

/// Dimension of the error-state vector: velocity (3), earth-to-nav
/// attitude/position (3), altitude (1), nav-to-body attitude (3).
pub const ERROR_STATE_DIM: usize = 10;

/// Dimension of the process-input error vector: accelerometer (3),
/// gyroscope (3), vertical specific-force/gravity-model error (1).
pub const PROCESS_INPUT_DIM: usize = 7;

/// State-transition Jacobian A
pub type StateMatrix = SMatrix<Scalar, ERROR_STATE_DIM, ERROR_STATE_DIM>;

/// Input-coupling Jacobian B
pub type InputMatrix = SMatrix<Scalar, ERROR_STATE_DIM, PROCESS_INPUT_DIM>;

/// Process-noise covariance Q
pub type ProcessNoiseMatrix = SMatrix<Scalar, PROCESS_INPUT_DIM, PROCESS_INPUT_DIM>;

/// Estimation-layer errors.
///
/// Shape errors are signaled to the caller rather than silently
/// truncated; numerical degeneracy is detected only by the covariance
/// filter, which is the sole authority for it. Neither is recovered
/// from internally.
#[derive(Debug, Error)]
pub enum EstimatorError {
    #[error("measurement shapes disagree: H is {h_rows}x{h_cols}, z has {z_len} rows, R is {r_rows}x{r_cols}")]
    DimensionMismatch {
        h_rows: usize,
        h_cols: usize,
        z_len: usize,
        r_rows: usize,
        r_cols: usize,
    },
    #[error("innovation covariance is singular")]
    SingularInnovation,
    #[error("error vector has {len} rows, expected at least {ERROR_STATE_DIM}")]
    ErrorStateTooShort { len: usize },
}
