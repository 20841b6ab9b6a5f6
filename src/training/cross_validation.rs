// Stratified k-fold cross-validation over the balanced set.
//
// Each fold refits its own vectorizer and classifier on the remaining folds,
// so test-fold vocabulary never leaks into training.

use tracing::info;

use super::balance::{balance, seeded};
use super::metrics::{compute_validation_metrics, mean_metrics, ValidationMetrics};
use super::trainer::{evaluate_documents, fit_documents, TrainConfig};
use super::TrainError;
use crate::corpus::{Label, LabeledDocument, NormalizedCorpus};

#[derive(Debug, Clone)]
pub struct CrossValidation {
    /// One entry per fold, in fold order
    pub folds: Vec<ValidationMetrics>,
    /// Mean rates across folds; counts summed
    pub mean: ValidationMetrics,
}

/// Assign each document a fold so every fold gets an even share of each class.
fn stratified_folds(documents: &[LabeledDocument], folds: usize) -> Vec<usize> {
    let mut seen = [0usize; 2];
    documents
        .iter()
        .map(|d| {
            let class = usize::from(d.label.as_u8());
            let fold = seen[class] % folds;
            seen[class] += 1;
            fold
        })
        .collect()
}

/// Balance `corpus` as training does, then run `folds`-fold stratified CV.
pub fn cross_validate(
    corpus: &NormalizedCorpus,
    folds: usize,
    config: &TrainConfig,
) -> Result<CrossValidation, TrainError> {
    let balanced = balance(corpus.documents(), &mut seeded(config.seed))?;
    let per_class = balanced.iter().filter(|d| d.label == Label::Hoax).count();
    if folds < 2 || folds > per_class {
        return Err(TrainError::InvalidFolds {
            folds,
            max: per_class,
        });
    }

    let assignment = stratified_folds(&balanced, folds);
    let mut results = Vec::with_capacity(folds);

    for fold in 0..folds {
        let (test, train) = split_fold(&balanced, &assignment, fold);

        let artifact = fit_documents(&train, &config.logistic)?;
        let evaluation = evaluate_documents(&artifact, &test);
        let metrics = compute_validation_metrics(&evaluation.predictions, &evaluation.labels);
        info!(fold = fold + 1, folds, %metrics, "Cross-validation fold");
        results.push(metrics);
    }

    let mean = mean_metrics(&results);
    info!(folds, %mean, "Cross-validation complete");
    Ok(CrossValidation {
        folds: results,
        mean,
    })
}

/// (test, train) documents for one fold.
fn split_fold(
    documents: &[LabeledDocument],
    assignment: &[usize],
    fold: usize,
) -> (Vec<LabeledDocument>, Vec<LabeledDocument>) {
    let mut test = Vec::new();
    let mut train = Vec::new();
    for (doc, &f) in documents.iter().zip(assignment) {
        if f == fold {
            test.push(doc.clone());
        } else {
            train.push(doc.clone());
        }
    }
    (test, train)
}
