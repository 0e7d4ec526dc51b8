//! Error-state estimator
//!
//! Orchestrates the predict/correct cycle: linearize around the current
//! nominal state, advance the covariance, propagate the nominal state,
//! and on each external measurement fold the estimated error vector
//! back into the nominal state through left-multiplied error
//! quaternions. The estimator owns its collaborators by composition and
//! exposes optional hooks instead of overridable methods.

use nalgebra::{DMatrix, DVector};
use tracing::{debug, trace};

use crate::math::error_quaternion;
use crate::state::{ImuSample, StrapdownMechanizer};
use crate::Scalar;

use super::{
    CovarianceFilter, ErrorState, EstimatorError, InputMatrix, LinearizationEngine, StateMatrix,
    ERROR_STATE_DIM,
};

/// Optional extension points of the estimator. Every method defaults to
/// a no-op; implement the ones a subsystem needs (logging, alternate
/// propagation, innovation gating).
pub trait EstimatorHooks {
    /// Called after the covariance prediction, before nominal-state
    /// propagation.
    fn after_predict(&mut self, a: &StateMatrix, b: &InputMatrix, dt: Scalar) {
        let _ = (a, b, dt);
    }

    /// Called after the gain and error estimate are computed, before
    /// injection; `x_hat` may be inspected or modified in place.
    fn before_inject(
        &mut self,
        h: &DMatrix<Scalar>,
        r: &DMatrix<Scalar>,
        gain: &DMatrix<Scalar>,
        z: &DVector<Scalar>,
        x_hat: &mut DVector<Scalar>,
    ) {
        let _ = (h, r, gain, z, x_hat);
    }
}

/// Hook set that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl EstimatorHooks for NoHooks {}

/// Error-state EKF over a strapdown mechanizer.
///
/// Single-threaded and synchronous: `update` and `correct` run to
/// completion on the calling thread and never overlap.
#[derive(Debug, Clone)]
pub struct ErrorStateEstimator<M, F, H = NoHooks> {
    ins: M,
    filter: F,
    engine: LinearizationEngine,
    hooks: H,
}

impl<M, F> ErrorStateEstimator<M, F, NoHooks>
where
    M: StrapdownMechanizer,
    F: CovarianceFilter,
{
    pub fn new(ins: M, filter: F, engine: LinearizationEngine) -> Self {
        Self::with_hooks(ins, filter, engine, NoHooks)
    }
}

impl<M, F, H> ErrorStateEstimator<M, F, H>
where
    M: StrapdownMechanizer,
    F: CovarianceFilter,
    H: EstimatorHooks,
{
    pub fn with_hooks(ins: M, filter: F, engine: LinearizationEngine, hooks: H) -> Self {
        Self {
            ins,
            filter,
            engine,
            hooks,
        }
    }

    pub fn mechanizer(&self) -> &M {
        &self.ins
    }

    pub fn mechanizer_mut(&mut self) -> &mut M {
        &mut self.ins
    }

    /// Underlying covariance filter, for diagnostic inspection of P.
    pub fn filter(&self) -> &F {
        &self.filter
    }

    pub fn engine(&self) -> &LinearizationEngine {
        &self.engine
    }

    /// One inertial update tick.
    ///
    /// The covariance prediction uses the pre-propagation nominal state
    /// as its linearization point, then the mechanizer advances past it.
    pub fn update(&mut self, imu: &ImuSample, dt: Scalar) {
        let (a, b) = self.engine.build_at_nominal(&self.ins, imu);
        self.filter.predict(&a, &b, dt);
        self.hooks.after_predict(&a, &b, dt);
        self.ins.propagate(imu, dt);
        trace!(dt, "inertial update");
    }

    /// Apply one external measurement: H (k x 10), residual z (k),
    /// noise covariance R (k x k).
    pub fn correct(
        &mut self,
        h: &DMatrix<Scalar>,
        z: &DVector<Scalar>,
        r: &DMatrix<Scalar>,
    ) -> Result<(), EstimatorError> {
        let k_rows = h.nrows();
        if h.ncols() != ERROR_STATE_DIM
            || z.len() != k_rows
            || r.nrows() != k_rows
            || r.ncols() != k_rows
        {
            return Err(EstimatorError::DimensionMismatch {
                h_rows: h.nrows(),
                h_cols: h.ncols(),
                z_len: z.len(),
                r_rows: r.nrows(),
                r_cols: r.ncols(),
            });
        }

        let gain = self.filter.correct(h, r)?;
        let mut x_hat = &gain * z;
        self.hooks.before_inject(h, r, &gain, z, &mut x_hat);
        debug!(dim = z.len(), "injecting measurement correction");
        self.correct_ins(&x_hat)
    }

    /// Inject an error estimate into the nominal state.
    ///
    /// Velocity, altitude and biases are corrected by subtraction; the
    /// attitude blocks become first-order error quaternions multiplied
    /// onto the left of the nominal quaternions (renormalized by the
    /// quaternion constructor). Finishes by recomputing the
    /// mechanizer's derived quantities so the next linearization sees a
    /// consistent state. No numerical-sanity guards: degenerate inputs
    /// must be rejected upstream.
    pub fn correct_ins(&mut self, x_hat: &DVector<Scalar>) -> Result<(), EstimatorError> {
        let e = ErrorState::from_vector(x_hat)?;

        let v = self.ins.velocity();
        self.ins.set_velocity(v - e.velocity);
        self.ins
            .premultiply_q_e2n(error_quaternion(&(-e.position_tilt)));
        let h = self.ins.altitude();
        self.ins.set_altitude(h - e.altitude);
        self.ins
            .premultiply_q_n2b(error_quaternion(&(-e.attitude_tilt)));
        for i in 0..e.biases.len().min(self.ins.bias_dim()) {
            self.ins.adjust_bias(i, -e.biases[i]);
        }

        self.ins.recompute_derived();
        Ok(())
    }
}
