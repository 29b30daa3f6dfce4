use crate::engines::evaluation::kfold::KFold;
use crate::engines::generation::codec::{Decoded, HyperparameterCodec};
use crate::engines::generation::genome::Genome;
use crate::estimator::EstimatorBuilder;
use crate::types::{Configuration, OptimizationDirection};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Cross-validation fold count, fixed for the search
pub const CV_FOLDS: usize = 5;

/// Why a genome scored no fitness
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    /// The decoded field combination violates a cross-field validity rule
    NotConfigurable(&'static str),
    /// The genome does not match the codec layout (driver bug, still penalized)
    MalformedGenome(String),
    /// The estimator rejected the configuration at construction
    Build(String),
    /// Fitting failed on some fold
    Fit(String),
    /// The mean fold score was NaN or infinite
    NonFiniteScore,
}

impl Rejection {
    pub fn reason(&self) -> String {
        match self {
            Rejection::NotConfigurable(reason) => (*reason).to_string(),
            Rejection::MalformedGenome(detail) => detail.clone(),
            Rejection::Build(detail) => detail.clone(),
            Rejection::Fit(detail) => detail.clone(),
            Rejection::NonFiniteScore => "mean fold score is not finite".to_string(),
        }
    }
}

/// Outcome of assessing one genome: a real score, or an inspectable rejection
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Scored(f64),
    Rejected(Rejection),
}

/// Scores genomes by decoding them and cross-validating the resulting
/// estimator.
///
/// Every failure mode — invalid combination, estimator rejection, fit error,
/// non-finite score — collapses to the direction's sentinel fitness, so a bad
/// configuration can lose selection but never abort the search.
pub struct FitnessEvaluator<'a, B, F>
where
    B: EstimatorBuilder,
    F: Fn(&[f64], &[f64]) -> f64 + Sync,
{
    codec: &'a HyperparameterCodec,
    builder: &'a B,
    x: &'a [Vec<f64>],
    y: &'a [f64],
    metric: &'a F,
    direction: OptimizationDirection,
    folds: KFold,
    evaluations: &'a AtomicUsize,
}

impl<'a, B, F> FitnessEvaluator<'a, B, F>
where
    B: EstimatorBuilder,
    F: Fn(&[f64], &[f64]) -> f64 + Sync,
{
    pub fn new(
        codec: &'a HyperparameterCodec,
        builder: &'a B,
        x: &'a [Vec<f64>],
        y: &'a [f64],
        metric: &'a F,
        direction: OptimizationDirection,
        evaluations: &'a AtomicUsize,
    ) -> Self {
        Self {
            codec,
            builder,
            x,
            y,
            metric,
            direction,
            folds: KFold::new(CV_FOLDS),
            evaluations,
        }
    }

    /// Scalar fitness for the search loop: score, or the sentinel on rejection
    pub fn evaluate(&self, genome: &Genome) -> f64 {
        match self.assess(genome) {
            Verdict::Scored(score) => score,
            Verdict::Rejected(rejection) => {
                log::debug!("configuration rejected: {}", rejection.reason());
                self.direction.sentinel()
            }
        }
    }

    /// Full typed outcome; never panics, never propagates estimator errors
    pub fn assess(&self, genome: &Genome) -> Verdict {
        let count = self.evaluations.fetch_add(1, Ordering::Relaxed) + 1;

        let configuration = match self.codec.decode(genome) {
            Ok(Decoded::Configured(config)) => config,
            Ok(Decoded::NotConfigurable(reason)) => {
                return Verdict::Rejected(Rejection::NotConfigurable(reason))
            }
            Err(err) => return Verdict::Rejected(Rejection::MalformedGenome(err.to_string())),
        };

        log::debug!("evaluation {count}: {configuration}");

        match self.cross_validate(&configuration) {
            Ok(score) if score.is_finite() => Verdict::Scored(score),
            Ok(_) => Verdict::Rejected(Rejection::NonFiniteScore),
            Err(rejection) => Verdict::Rejected(rejection),
        }
    }

    /// Mean metric over k folds, building a fresh estimator per fold
    fn cross_validate(&self, configuration: &Configuration) -> Result<f64, Rejection> {
        let splits = self.folds.split(self.x.len());
        let mut total = 0.0;

        for (train_idx, test_idx) in &splits {
            let (x_train, y_train) = gather(self.x, self.y, train_idx);
            let (x_test, y_test) = gather(self.x, self.y, test_idx);

            let mut model = self
                .builder
                .build(configuration)
                .map_err(Rejection::Build)?;
            model.fit(&x_train, &y_train).map_err(Rejection::Fit)?;

            let predictions = model.predict(&x_test);
            total += (self.metric)(&y_test, &predictions);
        }

        Ok(total / splits.len() as f64)
    }

    /// Evaluations performed so far; observability only
    pub fn evaluations(&self) -> usize {
        self.evaluations.load(Ordering::Relaxed)
    }
}

/// Extract the rows and targets at `indices`
fn gather(x: &[Vec<f64>], y: &[f64], indices: &[usize]) -> (Vec<Vec<f64>>, Vec<f64>) {
    let rows = indices.iter().map(|&i| x[i].clone()).collect();
    let targets = indices.iter().map(|&i| y[i]).collect();
    (rows, targets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimator::{Estimator, EstimatorBuilder};
    use crate::space::space_for;
    use crate::types::ModelFamily;

    /// Predicts the training-target mean regardless of configuration
    struct MeanModel {
        mean: f64,
    }

    impl Estimator for MeanModel {
        fn fit(&mut self, _x: &[Vec<f64>], y: &[f64]) -> Result<(), String> {
            if y.is_empty() {
                return Err("empty training fold".to_string());
            }
            self.mean = y.iter().sum::<f64>() / y.len() as f64;
            Ok(())
        }

        fn predict(&self, x: &[Vec<f64>]) -> Vec<f64> {
            vec![self.mean; x.len()]
        }
    }

    struct MeanBuilder;

    impl EstimatorBuilder for MeanBuilder {
        fn family(&self) -> ModelFamily {
            ModelFamily::RandomForestReg
        }

        fn build(&self, _configuration: &Configuration) -> Result<Box<dyn Estimator>, String> {
            Ok(Box::new(MeanModel { mean: 0.0 }))
        }
    }

    /// Builder whose construction always fails
    struct RefusingBuilder;

    impl EstimatorBuilder for RefusingBuilder {
        fn family(&self) -> ModelFamily {
            ModelFamily::RandomForestReg
        }

        fn build(&self, _configuration: &Configuration) -> Result<Box<dyn Estimator>, String> {
            Err("unsupported combination".to_string())
        }
    }

    fn toy_data(n: usize) -> (Vec<Vec<f64>>, Vec<f64>) {
        let x: Vec<Vec<f64>> = (0..n).map(|i| vec![i as f64, (i * i) as f64]).collect();
        let y: Vec<f64> = (0..n).map(|i| i as f64).collect();
        (x, y)
    }

    fn neg_mae(y_true: &[f64], y_pred: &[f64]) -> f64 {
        let n = y_true.len().max(1) as f64;
        -y_true
            .iter()
            .zip(y_pred)
            .map(|(t, p)| (t - p).abs())
            .sum::<f64>()
            / n
    }

    #[test]
    fn test_valid_genome_scores() {
        let codec = HyperparameterCodec::new(space_for(ModelFamily::RandomForestReg)).unwrap();
        let (x, y) = toy_data(30);
        let counter = AtomicUsize::new(0);
        let metric = neg_mae;
        let evaluator = FitnessEvaluator::new(
            &codec,
            &MeanBuilder,
            &x,
            &y,
            &metric,
            OptimizationDirection::Maximize,
            &counter,
        );

        let genome = vec![0u8; codec.genome_length()];
        let fitness = evaluator.evaluate(&genome);
        assert!(fitness.is_finite());
        assert!(fitness < 0.0);
        assert_eq!(evaluator.evaluations(), 1);
    }

    #[test]
    fn test_build_failure_maps_to_sentinel_both_directions() {
        let codec = HyperparameterCodec::new(space_for(ModelFamily::RandomForestReg)).unwrap();
        let (x, y) = toy_data(20);
        let metric = neg_mae;

        for direction in [
            OptimizationDirection::Maximize,
            OptimizationDirection::Minimize,
        ] {
            let counter = AtomicUsize::new(0);
            let evaluator = FitnessEvaluator::new(
                &codec,
                &RefusingBuilder,
                &x,
                &y,
                &metric,
                direction,
                &counter,
            );
            let genome = vec![0u8; codec.genome_length()];
            assert_eq!(evaluator.evaluate(&genome), direction.sentinel());
            assert_eq!(
                evaluator.assess(&genome),
                Verdict::Rejected(Rejection::Build("unsupported combination".to_string()))
            );
        }
    }

    #[test]
    fn test_invalid_combination_maps_to_sentinel() {
        // oob_score without bootstrap is never configurable for forests
        let codec = HyperparameterCodec::new(space_for(ModelFamily::RandomForestReg)).unwrap();
        let (x, y) = toy_data(20);
        let counter = AtomicUsize::new(0);
        let metric = neg_mae;
        let evaluator = FitnessEvaluator::new(
            &codec,
            &MeanBuilder,
            &x,
            &y,
            &metric,
            OptimizationDirection::Maximize,
            &counter,
        );

        // bootstrap and oob_score are the last two bits of the forest layout
        let mut genome = vec![0u8; codec.genome_length()];
        let len = genome.len();
        genome[len - 1] = 1; // oob_score on, bootstrap off
        assert_eq!(
            evaluator.assess(&genome),
            Verdict::Rejected(Rejection::NotConfigurable(
                "oob_score requires bootstrap sampling"
            ))
        );
        assert_eq!(evaluator.evaluate(&genome), f64::NEG_INFINITY);
    }

    #[test]
    fn test_nan_metric_maps_to_sentinel() {
        let codec = HyperparameterCodec::new(space_for(ModelFamily::RandomForestReg)).unwrap();
        let (x, y) = toy_data(20);
        let counter = AtomicUsize::new(0);
        let metric = |_t: &[f64], _p: &[f64]| f64::NAN;
        let evaluator = FitnessEvaluator::new(
            &codec,
            &MeanBuilder,
            &x,
            &y,
            &metric,
            OptimizationDirection::Minimize,
            &counter,
        );

        let genome = vec![0u8; codec.genome_length()];
        assert_eq!(
            evaluator.assess(&genome),
            Verdict::Rejected(Rejection::NonFiniteScore)
        );
        assert_eq!(evaluator.evaluate(&genome), f64::INFINITY);
    }

    #[test]
    fn test_counter_increments_per_evaluation() {
        let codec = HyperparameterCodec::new(space_for(ModelFamily::RandomForestReg)).unwrap();
        let (x, y) = toy_data(20);
        let counter = AtomicUsize::new(0);
        let metric = neg_mae;
        let evaluator = FitnessEvaluator::new(
            &codec,
            &MeanBuilder,
            &x,
            &y,
            &metric,
            OptimizationDirection::Maximize,
            &counter,
        );

        let genome = vec![0u8; codec.genome_length()];
        for expected in 1..=5 {
            evaluator.evaluate(&genome);
            assert_eq!(evaluator.evaluations(), expected);
        }
    }
}
