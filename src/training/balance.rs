// Class balancing and the train/test split.
//
// Both steps draw from a single ChaCha8 stream seeded once, so the same
// corpus and seed always give the same balanced set and the same split.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use super::TrainError;
use crate::corpus::{Label, LabeledDocument};

/// Undersample the majority class to the minority count, then shuffle.
///
/// Majority rows are sampled without replacement; the rest are discarded.
/// Either class may be the majority.
pub fn balance(documents: &[LabeledDocument], rng: &mut ChaCha8Rng) -> Result<Vec<LabeledDocument>, TrainError> {
    let (hoax, valid): (Vec<&LabeledDocument>, Vec<&LabeledDocument>) =
        documents.iter().partition(|d| d.label == Label::Hoax);

    if hoax.is_empty() {
        return Err(TrainError::EmptyClass(Label::Hoax));
    }
    if valid.is_empty() {
        return Err(TrainError::EmptyClass(Label::Valid));
    }

    let (minority, mut majority) = if hoax.len() <= valid.len() {
        (hoax, valid)
    } else {
        (valid, hoax)
    };

    majority.shuffle(rng);
    majority.truncate(minority.len());

    let mut balanced: Vec<LabeledDocument> = minority
        .into_iter()
        .chain(majority)
        .cloned()
        .collect();
    balanced.shuffle(rng);

    info!(
        input = documents.len(),
        balanced = balanced.len(),
        per_class = balanced.len() / 2,
        "Balanced classes by undersampling"
    );
    Ok(balanced)
}

/// Documents split into train and test sets.
#[derive(Debug, Clone)]
pub struct Split {
    pub train: Vec<LabeledDocument>,
    pub test: Vec<LabeledDocument>,
}

/// Shuffle and split; the test set gets `ceil(test_ratio * n)` rows.
pub fn train_test_split(
    documents: Vec<LabeledDocument>,
    test_ratio: f64,
    rng: &mut ChaCha8Rng,
) -> Result<Split, TrainError> {
    let rows = documents.len();
    let test_size = (test_ratio * rows as f64).ceil() as usize;
    if test_size == 0 || test_size >= rows {
        return Err(TrainError::TooFewRows { rows });
    }

    let mut documents = documents;
    documents.shuffle(rng);
    let train = documents.split_off(test_size);

    Ok(Split {
        train,
        test: documents,
    })
}

/// A fresh generator for one training run.
pub fn seeded(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}
