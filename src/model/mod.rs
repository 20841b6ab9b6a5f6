// Model: the TF-IDF vectorizer, the logistic-regression classifier, and
// their on-disk artifact form.

pub mod artifact;
pub mod logistic;
pub mod vectorizer;

use thiserror::Error;

pub use artifact::{ArtifactError, TrainedArtifact};
pub use logistic::{LogisticConfig, LogisticRegression};
pub use vectorizer::{SparseVector, TfIdfVectorizer};

/// Fitting errors shared by the vectorizer and the classifier.
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("training texts contain no tokens; the vocabulary would be empty")]
    EmptyVocabulary,

    #[error("cannot fit a classifier on zero samples")]
    EmptyTrainingSet,

    #[error("{samples} sample(s) but {labels} label(s)")]
    LengthMismatch { samples: usize, labels: usize },

    #[error("training data needs both classes, only {0} is present")]
    SingleClass(crate::corpus::Label),
}
