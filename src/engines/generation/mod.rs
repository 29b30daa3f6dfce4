pub mod codec;
pub mod genome;
pub mod operators;
pub mod progress;
pub mod tuner;

pub use codec::{Decoded, HyperparameterCodec};
pub use genome::Genome;
pub use progress::{LogProgress, ProgressCallback, SilentProgress};
pub use tuner::{RunConfig, Tuner};
