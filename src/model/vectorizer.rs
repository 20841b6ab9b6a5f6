// TF-IDF vectorizer: turns normalized text into sparse weighted term vectors.
//
// Tokens are maximal alphanumeric runs of two or more characters. The
// vocabulary is sorted, so feature indices depend only on the set of terms
// seen at fit time. Weights are raw term counts times a smoothed idf,
// L2-normalized per document. Terms outside the vocabulary are ignored.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::info;

use super::ModelError;

/// Minimum token length in characters. Single letters carry no signal.
const MIN_TOKEN_CHARS: usize = 2;

/// A sparse document vector with strictly ascending feature indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    pub indices: Vec<usize>,
    pub values: Vec<f64>,
}

impl SparseVector {
    /// Number of non-zero entries.
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Dot product with a dense vector. Indices past the end contribute zero.
    pub fn dot(&self, dense: &[f64]) -> f64 {
        self.iter()
            .filter_map(|(i, v)| dense.get(i).map(|w| w * v))
            .sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }
}

/// Split text into lowercase tokens of at least two alphanumeric characters.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= MIN_TOKEN_CHARS)
        .map(str::to_lowercase)
}

/// A fitted TF-IDF transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfIdfVectorizer {
    /// Terms in feature-index order (sorted)
    terms: Vec<String>,
    /// idf weight per feature index
    idf: Vec<f64>,
    /// Number of documents the vectorizer was fitted on
    documents_seen: usize,
    /// term -> feature index; rebuilt from `terms` after deserializing
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl TfIdfVectorizer {
    /// Fit vocabulary and idf weights on `texts`.
    ///
    /// Fails if the texts contain no tokens at all.
    pub fn fit<S: AsRef<str>>(texts: &[S]) -> Result<Self, ModelError> {
        let mut document_frequency: BTreeMap<String, usize> = BTreeMap::new();
        for text in texts {
            let unique: BTreeSet<String> = tokenize(text.as_ref()).collect();
            for term in unique {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        if document_frequency.is_empty() {
            return Err(ModelError::EmptyVocabulary);
        }

        // Smoothed idf: as if one extra document contained every term once.
        let n = texts.len() as f64;
        let (terms, idf): (Vec<String>, Vec<f64>) = document_frequency
            .into_iter()
            .map(|(term, df)| {
                let idf = ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0;
                (term, idf)
            })
            .unzip();

        info!(
            documents = texts.len(),
            vocabulary = terms.len(),
            "Fitted TF-IDF vectorizer"
        );

        Ok(Self::from_parts(terms, idf, texts.len()))
    }

    fn from_parts(terms: Vec<String>, idf: Vec<f64>, documents_seen: usize) -> Self {
        let index = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();
        Self {
            terms,
            idf,
            documents_seen,
            index,
        }
    }

    /// Rebuild the term lookup after deserialization.
    pub(crate) fn reindex(self) -> Self {
        Self::from_parts(self.terms, self.idf, self.documents_seen)
    }

    /// Vectorize a single document.
    pub fn transform(&self, text: &str) -> SparseVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for token in tokenize(text) {
            if let Some(&i) = self.index.get(&token) {
                *counts.entry(i).or_insert(0.0) += 1.0;
            }
        }

        let mut indices = Vec::with_capacity(counts.len());
        let mut values = Vec::with_capacity(counts.len());
        for (i, tf) in counts {
            indices.push(i);
            values.push(tf * self.idf[i]);
        }

        let norm = values.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for v in &mut values {
                *v /= norm;
            }
        }

        SparseVector { indices, values }
    }

    /// Vectorize many documents.
    pub fn transform_batch<S: AsRef<str>>(&self, texts: &[S]) -> Vec<SparseVector> {
        texts.iter().map(|t| self.transform(t.as_ref())).collect()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.terms.len()
    }

    pub fn documents_seen(&self) -> usize {
        self.documents_seen
    }

    /// The term at a feature index.
    pub fn term(&self, index: usize) -> Option<&str> {
        self.terms.get(index).map(String::as_str)
    }

    /// Feature index of a term, if it is in the vocabulary.
    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    /// SHA-256 over vocabulary and idf weights, hex-encoded.
    ///
    /// A classifier records the digest of the vectorizer it was trained
    /// against; loading refuses a pair whose digests differ.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        for (term, idf) in self.terms.iter().zip(&self.idf) {
            hasher.update(term.as_bytes());
            hasher.update([0u8]);
            hasher.update(idf.to_le_bytes());
        }
        hex::encode(hasher.finalize())
    }
}
