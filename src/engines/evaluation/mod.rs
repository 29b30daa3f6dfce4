pub mod fitness;
pub mod kfold;

pub use fitness::{FitnessEvaluator, Rejection, Verdict, CV_FOLDS};
pub use kfold::KFold;
