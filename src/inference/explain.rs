// Top contributing terms for one scored document.

use serde::Serialize;

use crate::model::{SparseVector, TrainedArtifact};

/// A vocabulary term present in the input, with its classifier weight.
/// Positive weights push toward hoax, negative toward valid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermContribution {
    pub term: String,
    pub weight: f64,
}

/// The `limit` terms of `x` with the largest absolute coefficients.
///
/// Only features that are nonzero in `x` are considered. Ties keep
/// feature-index order.
pub fn top_terms(artifact: &TrainedArtifact, x: &SparseVector, limit: usize) -> Vec<TermContribution> {
    let coefficients = artifact.classifier.coefficients();

    let mut present: Vec<(usize, f64)> = x
        .iter()
        .filter(|(_, value)| *value != 0.0)
        .filter_map(|(i, _)| coefficients.get(i).map(|w| (i, *w)))
        .collect();

    // `present` is in ascending index order and sort_by is stable.
    present.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));

    present
        .into_iter()
        .take(limit)
        .filter_map(|(i, weight)| {
            artifact.vectorizer.term(i).map(|term| TermContribution {
                term: term.to_string(),
                weight,
            })
        })
        .collect()
}
