use rand::seq::SliceRandom;
use rand::SeedableRng;

/// K-fold index splitter.
///
/// Splits `n_samples` indices into K folds; each fold serves once as the test
/// set while the remaining folds form the training set. Fold sizes differ by
/// at most one (the remainder is spread over the first folds).
#[derive(Debug, Clone)]
pub struct KFold {
    n_splits: usize,
    shuffle: bool,
    random_state: Option<u64>,
}

impl KFold {
    pub fn new(n_splits: usize) -> Self {
        Self {
            n_splits: n_splits.max(2),
            shuffle: false,
            random_state: None,
        }
    }

    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Seeded shuffling; implies `shuffle`
    pub fn with_random_state(mut self, random_state: u64) -> Self {
        self.random_state = Some(random_state);
        self.shuffle = true;
        self
    }

    pub fn n_splits(&self) -> usize {
        self.n_splits
    }

    /// Generate (train_indices, test_indices) per fold.
    ///
    /// When `n_samples` is smaller than the fold count, the split degrades to
    /// leave-one-out over the available samples.
    pub fn split(&self, n_samples: usize) -> Vec<(Vec<usize>, Vec<usize>)> {
        let n_splits = self.n_splits.min(n_samples).max(1);

        let mut indices: Vec<usize> = (0..n_samples).collect();
        if self.shuffle {
            match self.random_state {
                Some(seed) => {
                    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
                    indices.shuffle(&mut rng);
                }
                None => {
                    let mut rng = rand::thread_rng();
                    indices.shuffle(&mut rng);
                }
            }
        }

        let fold_size = n_samples / n_splits;
        let remainder = n_samples % n_splits;

        let mut result = Vec::with_capacity(n_splits);
        let mut start = 0;

        for i in 0..n_splits {
            let current = if i < remainder { fold_size + 1 } else { fold_size };
            let end = start + current;

            let test: Vec<usize> = indices[start..end].to_vec();
            let train: Vec<usize> = indices[..start]
                .iter()
                .chain(indices[end..].iter())
                .copied()
                .collect();

            result.push((train, test));
            start = end;
        }

        result
    }
}
