/// Genome representation for the hyperparameter search
///
/// A genome is a fixed-length string of bits (0/1) that deterministically maps
/// to one hyperparameter configuration. The `HyperparameterCodec` owns the
/// mapping: each parameter spec is allocated a contiguous bit-slice, read
/// most-significant bit first.
///
/// # Why bits instead of configurations?
///
/// Genetic operators work best on simple, linear structures:
/// - **Crossover**: swapping bit segments is trivial (array slicing)
/// - **Mutation**: flipping individual bits is straightforward
/// - **No invalid states at this level**: every bit pattern decodes to either
///   a valid configuration or the explicit not-configurable sentinel
///
/// A genome carries no semantic meaning until decoded.
pub type Genome = Vec<u8>;
