// Inference service: validates, scores and explains one article.
//
// Pipeline per request:
//   1. reject empty, too-short and letterless input
//   2. detect the language on the raw text; reject anything but Indonesian
//   3. normalize, vectorize and score
//   4. attach the top contributing terms and an extractive summary
//
// The service holds its trained artifact behind an `Arc` and never mutates
// it. Rejections are values, not errors: every collaborator failure is
// turned into a `RejectionReason` or `Summary::Unavailable` here.

pub mod explain;

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::corpus::Label;
use crate::language::ngram::NgramDetector;
use crate::language::traits::{DetectionError, LanguageDetector};
use crate::language::TARGET_LANGUAGE;
use crate::model::{ArtifactError, TrainedArtifact};
use crate::summary::{Summarizer, Summary};
use crate::text::{has_letter_run, normalize};

pub use explain::{top_terms, TermContribution};

/// Number of terms reported in `top_terms`.
pub const TOP_TERMS: usize = 5;

/// Why an input was not scored. All of these are recoverable by the user.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectionReason {
    #[error("no text was provided")]
    EmptyInput,

    #[error("text is too short; enter at least {min_chars} characters")]
    InputTooShort { min_chars: usize },

    #[error("text contains no recognizable words")]
    NoWords,

    #[error("could not detect the language of the text; enter a complete sentence")]
    LanguageUndetected,

    #[error("text appears to be in '{detected}'; only Indonesian articles are supported")]
    WrongLanguage { detected: String },
}

/// Tunables for validation and the result advisories.
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceSettings {
    /// Minimum trimmed length, in characters
    pub min_chars: usize,
    /// Also require a run of three or more ASCII letters
    pub require_word: bool,
    /// Results below this confidence carry the low-confidence flag
    pub low_confidence_threshold: f64,
    pub summary_words: usize,
}

impl Default for InferenceSettings {
    fn default() -> Self {
        Self {
            min_chars: 30,
            require_word: true,
            low_confidence_threshold: 0.60,
            summary_words: 80,
        }
    }
}

/// A scored article.
#[derive(Debug, Clone, Serialize)]
pub struct InferenceResult {
    pub label: Label,
    /// Probability of the predicted label
    pub confidence: f64,
    pub hoax_probability: f64,
    pub top_terms: Vec<TermContribution>,
    pub summary: Summary,
    pub low_confidence: bool,
}

impl InferenceResult {
    pub fn is_hoax(&self) -> bool {
        self.label == Label::Hoax
    }
}

/// True when a result at `confidence` should carry the advisory flag.
pub fn is_low_confidence(confidence: f64, threshold: f64) -> bool {
    confidence < threshold
}

pub struct InferenceService {
    artifact: Arc<TrainedArtifact>,
    detector: Box<dyn LanguageDetector>,
    summarizer: Summarizer,
    settings: InferenceSettings,
}

impl InferenceService {
    /// Build a service around an already-loaded artifact.
    pub fn new(artifact: Arc<TrainedArtifact>, settings: InferenceSettings) -> Self {
        Self {
            artifact,
            detector: Box::new(NgramDetector::new()),
            summarizer: Summarizer::new(settings.summary_words),
            settings,
        }
    }

    /// Load the artifact pair from `dir` and build a service around it.
    pub fn load(dir: &Path, settings: InferenceSettings) -> Result<Self, ArtifactError> {
        let artifact = TrainedArtifact::load(dir)?;
        Ok(Self::new(Arc::new(artifact), settings))
    }

    /// Swap the language detector.
    pub fn with_detector(mut self, detector: Box<dyn LanguageDetector>) -> Self {
        self.detector = detector;
        self
    }

    pub fn artifact(&self) -> &Arc<TrainedArtifact> {
        &self.artifact
    }

    pub fn settings(&self) -> &InferenceSettings {
        &self.settings
    }

    /// Length and content checks that need no model.
    pub fn validate(&self, raw: &str) -> Result<(), RejectionReason> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(RejectionReason::EmptyInput);
        }
        if trimmed.chars().count() < self.settings.min_chars {
            return Err(RejectionReason::InputTooShort {
                min_chars: self.settings.min_chars,
            });
        }
        if self.settings.require_word && !has_letter_run(trimmed, 3) {
            return Err(RejectionReason::NoWords);
        }
        Ok(())
    }

    /// Detect the language of `raw`, mapped onto rejections.
    pub fn check_language(&self, raw: &str) -> Result<(), RejectionReason> {
        match self.detector.detect(raw) {
            Ok(code) if code == TARGET_LANGUAGE => Ok(()),
            Ok(detected) => Err(RejectionReason::WrongLanguage { detected }),
            Err(e @ (DetectionError::NoSignal | DetectionError::Ambiguous(_))) => {
                debug!(error = %e, "Language detection failed");
                Err(RejectionReason::LanguageUndetected)
            }
        }
    }

    /// Score one article.
    pub fn infer(&self, raw: &str) -> Result<InferenceResult, RejectionReason> {
        self.validate(raw)?;
        self.check_language(raw)?;

        let cleaned = normalize(raw);
        let x = self.artifact.vectorizer.transform(&cleaned);
        let hoax_probability = self.artifact.classifier.predict_proba(&x);
        let label = self.artifact.classifier.predict(&x);
        let confidence = match label {
            Label::Hoax => hoax_probability,
            Label::Valid => 1.0 - hoax_probability,
        };

        let top_terms = top_terms(&self.artifact, &x, TOP_TERMS);
        let summary = self.summarizer.summarize(raw);

        debug!(
            label = %label,
            confidence,
            features = x.nnz(),
            summarized = summary.is_available(),
            "Scored article"
        );

        Ok(InferenceResult {
            label,
            confidence,
            hoax_probability,
            top_terms,
            summary,
            low_confidence: is_low_confidence(confidence, self.settings.low_confidence_threshold),
        })
    }
}
