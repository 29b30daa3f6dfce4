use crate::engines::generation::genome::Genome;
use crate::types::OptimizationDirection;
use rand::Rng;

/// Tournament selection: best of K random candidates, per the metric direction
pub fn tournament_selection<R: Rng>(
    population: &[(Genome, f64)],
    tournament_size: usize,
    direction: OptimizationDirection,
    rng: &mut R,
) -> Genome {
    let mut best_idx = rng.gen_range(0..population.len());

    for _ in 1..tournament_size.max(1) {
        let idx = rng.gen_range(0..population.len());
        if direction.improves(population[idx].1, population[best_idx].1) {
            best_idx = idx;
        }
    }

    population[best_idx].0.clone()
}

/// Two-point crossover: swap the middle bit segment between parents
pub fn two_point_crossover<R: Rng>(
    parent1: &Genome,
    parent2: &Genome,
    rng: &mut R,
) -> (Genome, Genome) {
    let len = parent1.len().min(parent2.len());
    if len <= 1 {
        return (parent1.clone(), parent2.clone());
    }

    let mut a = rng.gen_range(1..len);
    let mut b = rng.gen_range(1..len);
    if a > b {
        std::mem::swap(&mut a, &mut b);
    }

    let mut child1 = parent1.clone();
    let mut child2 = parent2.clone();

    child1[a..b].copy_from_slice(&parent2[a..b]);
    child2[a..b].copy_from_slice(&parent1[a..b]);

    (child1, child2)
}

/// Bit-flip mutation: each bit flips independently with `flip_prob`
pub fn flip_mutation<R: Rng>(genome: &mut Genome, flip_prob: f64, rng: &mut R) {
    for bit in genome.iter_mut() {
        if rng.gen::<f64>() < flip_prob {
            *bit = 1 - *bit;
        }
    }
}

/// Generate a uniformly random bit genome
pub fn random_genome<R: Rng>(length: usize, rng: &mut R) -> Genome {
    (0..length).map(|_| rng.gen_range(0..=1u8)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_genome_is_bits() {
        let mut rng = StdRng::seed_from_u64(7);
        let genome = random_genome(64, &mut rng);
        assert_eq!(genome.len(), 64);
        assert!(genome.iter().all(|&b| b == 0 || b == 1));
    }

    #[test]
    fn test_tournament_respects_direction() {
        let mut rng = StdRng::seed_from_u64(1);
        let population = vec![(vec![0u8; 4], 0.1), (vec![1u8; 4], 0.9)];

        // Tournament covering the whole population always picks the winner
        let best = tournament_selection(
            &population,
            16,
            OptimizationDirection::Maximize,
            &mut rng,
        );
        assert_eq!(best, vec![1u8; 4]);

        let best = tournament_selection(
            &population,
            16,
            OptimizationDirection::Minimize,
            &mut rng,
        );
        assert_eq!(best, vec![0u8; 4]);
    }

    #[test]
    fn test_crossover_preserves_length_and_material() {
        let mut rng = StdRng::seed_from_u64(3);
        let p1: Genome = vec![0; 16];
        let p2: Genome = vec![1; 16];
        let (c1, c2) = two_point_crossover(&p1, &p2, &mut rng);
        assert_eq!(c1.len(), 16);
        assert_eq!(c2.len(), 16);
        // Bit totals are conserved by a segment swap
        let ones: usize = c1.iter().chain(c2.iter()).map(|&b| b as usize).sum();
        assert_eq!(ones, 16);
    }

    #[test]
    fn test_crossover_single_bit_is_identity() {
        let mut rng = StdRng::seed_from_u64(3);
        let (c1, c2) = two_point_crossover(&vec![0u8], &vec![1u8], &mut rng);
        assert_eq!(c1, vec![0u8]);
        assert_eq!(c2, vec![1u8]);
    }

    #[test]
    fn test_flip_mutation_extremes() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut genome: Genome = vec![0, 1, 0, 1];

        flip_mutation(&mut genome, 0.0, &mut rng);
        assert_eq!(genome, vec![0, 1, 0, 1]);

        flip_mutation(&mut genome, 1.0, &mut rng);
        assert_eq!(genome, vec![1, 0, 1, 0]);
    }
}
