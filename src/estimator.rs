//! Black-box estimator boundary.
//!
//! The search never looks inside a model; it only needs to build one from a
//! decoded configuration, fit it on a training fold and predict a test fold.
//! Errors at this boundary are plain strings: the evaluator converts every
//! failure into a rejection, it never inspects the message beyond logging it.

use crate::types::{Configuration, ModelFamily};

/// A trainable model. Fit on one fold, predict another.
pub trait Estimator {
    /// Train on `x` (rows of features) against targets `y`.
    ///
    /// `x.len() == y.len()` is guaranteed by the caller. Numeric failure
    /// (non-convergence, singular systems) is reported as `Err`, not a panic.
    fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<(), String>;

    /// Predict one value per row of `x`. Only called after a successful `fit`.
    fn predict(&self, x: &[Vec<f64>]) -> Vec<f64>;
}

/// Builds estimator instances from decoded configurations.
///
/// The family tag selects which parameter-space table drives the search; it is
/// an explicit value, never inferred from how a model object prints.
pub trait EstimatorBuilder: Send + Sync {
    fn family(&self) -> ModelFamily;

    /// Construct a fresh, unfitted estimator with the given hyperparameters.
    ///
    /// Returns `Err` when the estimator itself rejects the combination; the
    /// search treats that configuration as worst-possible fitness.
    fn build(&self, configuration: &Configuration) -> Result<Box<dyn Estimator>, String>;
}
