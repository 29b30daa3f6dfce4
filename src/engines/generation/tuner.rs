use crate::engines::evaluation::fitness::FitnessEvaluator;
use crate::engines::generation::codec::HyperparameterCodec;
use crate::engines::generation::genome::Genome;
use crate::engines::generation::operators::{
    flip_mutation, random_genome, tournament_selection, two_point_crossover,
};
use crate::engines::generation::progress::ProgressCallback;
use crate::error::{Result, TuneError};
use crate::estimator::EstimatorBuilder;
use crate::space::space_for;
use crate::types::{EvaluationResult, ModelFamily, OptimizationDirection};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Per-bit flip probability applied when an individual is selected for mutation
const BIT_FLIP_PROB: f64 = 0.05;

/// One search run's parameters. All values are caller-supplied; there are no
/// implicit defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub population_size: usize,
    pub generations: usize,
    /// Probability that a selected pair undergoes two-point crossover
    pub crossover_rate: f64,
    /// Probability that an individual undergoes bit-flip mutation
    pub mutation_rate: f64,
    /// Seed for reproducible runs; entropy-seeded when absent
    pub seed: Option<u64>,
}

impl RunConfig {
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            return Err(TuneError::Configuration(
                "population size must be at least 2".to_string(),
            ));
        }
        if self.generations == 0 {
            return Err(TuneError::Configuration(
                "generation count must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(TuneError::Configuration(
                "crossover rate must be between 0 and 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(TuneError::Configuration(
                "mutation rate must be between 0 and 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Genetic hyperparameter search driver.
///
/// Owns the population for the duration of a run: random initialization,
/// then per generation tournament selection, pairwise crossover, bit-flip
/// mutation and re-evaluation. Fitness evaluation within a generation runs in
/// parallel; the generational loop itself is sequential.
pub struct Tuner<'a, B, F>
where
    B: EstimatorBuilder,
    F: Fn(&[f64], &[f64]) -> f64 + Sync,
{
    codec: HyperparameterCodec,
    builder: B,
    x: &'a [Vec<f64>],
    y: &'a [f64],
    metric: F,
    direction: OptimizationDirection,
    tournament_size: usize,
    population: Vec<(Genome, f64)>,
    evaluations: AtomicUsize,
}

impl<'a, B, F> Tuner<'a, B, F>
where
    B: EstimatorBuilder,
    F: Fn(&[f64], &[f64]) -> f64 + Sync,
{
    /// Create a tuner for the builder's model family.
    ///
    /// Fails when the data is empty, ragged, or mismatched in length, or when
    /// the tournament size is zero.
    pub fn new(
        builder: B,
        x: &'a [Vec<f64>],
        y: &'a [f64],
        metric: F,
        direction: OptimizationDirection,
        tournament_size: usize,
    ) -> Result<Self> {
        if x.is_empty() {
            return Err(TuneError::Configuration(
                "feature matrix is empty".to_string(),
            ));
        }
        if x.len() != y.len() {
            return Err(TuneError::Configuration(format!(
                "feature matrix has {} rows but target has {} values",
                x.len(),
                y.len()
            )));
        }
        let width = x[0].len();
        if x.iter().any(|row| row.len() != width) {
            return Err(TuneError::Configuration(
                "feature matrix rows have differing widths".to_string(),
            ));
        }
        if tournament_size == 0 {
            return Err(TuneError::Configuration(
                "tournament size must be at least 1".to_string(),
            ));
        }

        let codec = HyperparameterCodec::new(space_for(builder.family()))?;

        Ok(Self {
            codec,
            builder,
            x,
            y,
            metric,
            direction,
            tournament_size,
            population: Vec::new(),
            evaluations: AtomicUsize::new(0),
        })
    }

    pub fn family(&self) -> ModelFamily {
        self.builder.family()
    }

    pub fn codec(&self) -> &HyperparameterCodec {
        &self.codec
    }

    pub fn genome_length(&self) -> usize {
        self.codec.genome_length()
    }

    /// Total fitness evaluations across all runs; observability only
    pub fn evaluations(&self) -> usize {
        self.evaluations.load(Ordering::Relaxed)
    }

    /// Run the generational search, replacing any previous terminal population.
    pub fn run<C: ProgressCallback>(&mut self, run: &RunConfig, progress: &mut C) -> Result<()> {
        run.validate()?;

        let evaluator = FitnessEvaluator::new(
            &self.codec,
            &self.builder,
            self.x,
            self.y,
            &self.metric,
            self.direction,
            &self.evaluations,
        );

        let mut rng = match run.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let genome_length = self.codec.genome_length();
        let initial: Vec<Genome> = (0..run.population_size)
            .map(|_| random_genome(genome_length, &mut rng))
            .collect();
        let mut scored = evaluate_population(&evaluator, initial);

        for generation in 0..run.generations {
            progress.on_generation_start(generation);

            let mut offspring: Vec<Genome> = (0..run.population_size)
                .map(|_| {
                    tournament_selection(&scored, self.tournament_size, self.direction, &mut rng)
                })
                .collect();

            for pair in offspring.chunks_exact_mut(2) {
                if rng.gen::<f64>() < run.crossover_rate {
                    let (c1, c2) = two_point_crossover(&pair[0], &pair[1], &mut rng);
                    pair[0] = c1;
                    pair[1] = c2;
                }
            }

            for genome in &mut offspring {
                if rng.gen::<f64>() < run.mutation_rate {
                    flip_mutation(genome, BIT_FLIP_PROB, &mut rng);
                }
            }

            scored = evaluate_population(&evaluator, offspring);

            let best = scored
                .iter()
                .map(|(_, fitness)| *fitness)
                .reduce(|a, b| if self.direction.improves(b, a) { b } else { a })
                .unwrap_or_else(|| self.direction.sentinel());

            log::info!(
                "generation {}/{}: best fitness {best:.6}, {} evaluations so far",
                generation + 1,
                run.generations,
                self.evaluations()
            );
            progress.on_generation_complete(generation, best);
        }

        self.population = scored;
        Ok(())
    }

    /// The k best individuals of the terminal population, best first.
    ///
    /// `k` larger than the population returns the whole population. Before
    /// any run the population is empty and so is the result.
    pub fn get_best(&self, k: usize) -> Vec<EvaluationResult> {
        let mut ranked: Vec<&(Genome, f64)> = self.population.iter().collect();
        ranked.sort_by(|a, b| {
            let ordering = a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal);
            match self.direction {
                OptimizationDirection::Maximize => ordering.reverse(),
                OptimizationDirection::Minimize => ordering,
            }
        });

        ranked
            .into_iter()
            .take(k)
            .map(|(genome, fitness)| EvaluationResult {
                fitness: *fitness,
                configuration: self
                    .codec
                    .decode(genome)
                    .ok()
                    .and_then(|decoded| decoded.configuration()),
            })
            .collect()
    }
}

/// Score a population in parallel; order is preserved, results are
/// independent of evaluation order.
fn evaluate_population<B, F>(
    evaluator: &FitnessEvaluator<'_, B, F>,
    population: Vec<Genome>,
) -> Vec<(Genome, f64)>
where
    B: EstimatorBuilder,
    F: Fn(&[f64], &[f64]) -> f64 + Sync,
{
    population
        .into_par_iter()
        .map(|genome| {
            let fitness = evaluator.evaluate(&genome);
            (genome, fitness)
        })
        .collect()
}
