//! Genetic-algorithm hyperparameter search.
//!
//! Each candidate hyperparameter configuration is encoded as a fixed-length
//! bit-string genome. A genetic search (tournament selection, two-point
//! crossover, bit-flip mutation) evolves a population of genomes; fitness is
//! the mean k-fold cross-validation score of an estimator built from the
//! decoded configuration. Invalid or failing configurations are never errors:
//! they score the worst-possible sentinel fitness and lose selection.
//!
//! The estimators themselves stay behind the [`estimator::Estimator`] /
//! [`estimator::EstimatorBuilder`] traits; this crate only knows how to
//! build, fit and predict through them.

pub mod engines;
pub mod error;
pub mod estimator;
pub mod space;
pub mod types;

pub use engines::evaluation::{FitnessEvaluator, KFold, Rejection, Verdict, CV_FOLDS};
pub use engines::generation::{
    Decoded, Genome, HyperparameterCodec, LogProgress, ProgressCallback, RunConfig, SilentProgress,
    Tuner,
};
pub use error::{Result, TuneError};
pub use estimator::{Estimator, EstimatorBuilder};
pub use space::{space_for, ParamKind, ParamSpec, ParameterSpace, SpaceManifest};
pub use types::{
    Configuration, EvaluationResult, ModelFamily, OptimizationDirection, ParamValue,
};
