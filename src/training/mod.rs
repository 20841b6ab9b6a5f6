// Training: balancing, split, fitting, evaluation and cross-validation.

pub mod balance;
pub mod cross_validation;
pub mod metrics;
pub mod trainer;

use thiserror::Error;

use crate::corpus::Label;
use crate::model::ModelError;

pub use cross_validation::{cross_validate, CrossValidation};
pub use metrics::{compute_validation_metrics, ValidationMetrics};
pub use trainer::{train, TrainConfig, TrainOutcome};

#[derive(Debug, Error)]
pub enum TrainError {
    #[error("corpus has no {0} rows; both classes are needed to train")]
    EmptyClass(Label),

    #[error("{rows} balanced row(s) are too few to split into train and test sets")]
    TooFewRows { rows: usize },

    #[error("cross-validation needs between 2 and {max} folds, got {folds}")]
    InvalidFolds { folds: usize, max: usize },

    #[error(transparent)]
    Model(#[from] ModelError),
}
