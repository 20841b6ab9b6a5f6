// Trainer: corpus in, fitted artifact and held-out evaluation out.
//
// 1. balance the classes by undersampling the majority
// 2. shuffle and split off ceil(20%) as the test set
// 3. fit the vectorizer on the training texts only
// 4. fit the classifier on the vectorized training split
// 5. score the test split

use std::path::Path;

use tracing::info;

use super::balance::{balance, seeded, train_test_split};
use super::metrics::{compute_validation_metrics, ValidationMetrics};
use super::TrainError;
use crate::corpus::{Label, LabeledDocument, NormalizedCorpus};
use crate::model::artifact::{ArtifactError, TestEvaluation};
use crate::model::{LogisticConfig, LogisticRegression, ModelError, TfIdfVectorizer, TrainedArtifact};

#[derive(Debug, Clone)]
pub struct TrainConfig {
    pub seed: u64,
    /// Fraction of the balanced set held out for testing
    pub test_ratio: f64,
    pub logistic: LogisticConfig,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            test_ratio: 0.2,
            logistic: LogisticConfig::default(),
        }
    }
}

impl TrainConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }
}

/// Everything a training run produces.
#[derive(Debug, Clone)]
pub struct TrainOutcome {
    pub artifact: TrainedArtifact,
    pub evaluation: TestEvaluation,
    pub metrics: ValidationMetrics,
    /// (valid, hoax) rows in the input corpus
    pub input_counts: (usize, usize),
    pub balanced_rows: usize,
    pub train_rows: usize,
    pub test_rows: usize,
}

impl TrainOutcome {
    /// Persist the vectorizer, classifier and test data into `dir`.
    pub fn save(&self, dir: &Path) -> Result<(), ArtifactError> {
        self.artifact.save(dir)?;
        self.evaluation.save(dir)
    }
}

/// Fit a vectorizer and a classifier on the given documents.
pub fn fit_documents(
    documents: &[LabeledDocument],
    config: &LogisticConfig,
) -> Result<TrainedArtifact, ModelError> {
    let texts: Vec<&str> = documents.iter().map(|d| d.cleaned.as_str()).collect();
    let labels: Vec<Label> = documents.iter().map(|d| d.label).collect();

    let vectorizer = TfIdfVectorizer::fit(&texts)?;
    let rows = vectorizer.transform_batch(&texts);
    let classifier = LogisticRegression::fit(&rows, &labels, vectorizer.vocabulary_size(), config)?;

    Ok(TrainedArtifact::new(vectorizer, classifier))
}

/// Score documents with a fitted pair.
pub fn evaluate_documents(artifact: &TrainedArtifact, documents: &[LabeledDocument]) -> TestEvaluation {
    let mut evaluation = TestEvaluation::default();
    for doc in documents {
        let x = artifact.vectorizer.transform(&doc.cleaned);
        evaluation.texts.push(doc.cleaned.clone());
        evaluation.labels.push(doc.label);
        evaluation.predictions.push(artifact.classifier.predict(&x));
        evaluation.probabilities.push(artifact.classifier.predict_proba(&x));
    }
    evaluation
}

/// Run a full training pass over `corpus`.
pub fn train(corpus: &NormalizedCorpus, config: &TrainConfig) -> Result<TrainOutcome, TrainError> {
    let input_counts = corpus.label_counts();
    info!(
        rows = corpus.len(),
        valid = input_counts.0,
        hoax = input_counts.1,
        "Training on corpus"
    );

    let mut rng = seeded(config.seed);
    let balanced = balance(corpus.documents(), &mut rng)?;
    let balanced_rows = balanced.len();
    let split = train_test_split(balanced, config.test_ratio, &mut rng)?;

    let artifact = fit_documents(&split.train, &config.logistic)?;
    let evaluation = evaluate_documents(&artifact, &split.test);
    let metrics = compute_validation_metrics(&evaluation.predictions, &evaluation.labels);

    info!(
        train = split.train.len(),
        test = split.test.len(),
        accuracy = metrics.accuracy,
        f1 = metrics.f1,
        "Training complete"
    );

    Ok(TrainOutcome {
        artifact,
        evaluation,
        metrics,
        input_counts,
        balanced_rows,
        train_rows: split.train.len(),
        test_rows: split.test.len(),
    })
}
