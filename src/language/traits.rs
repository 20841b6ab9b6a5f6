// Language detector trait: swap-ready abstraction.
//
// The inference service only needs "which language is this?" as an ISO 639-1
// code. The default implementation counts stop words; a statistical model
// can be dropped in later without touching the service.

use thiserror::Error;

/// Why a detector could not name a language.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DetectionError {
    /// Nothing in the text matched any language profile.
    #[error("no language signal in the text")]
    NoSignal,
    /// Two or more languages scored the same.
    #[error("ambiguous language: {0:?} scored equally")]
    Ambiguous(Vec<String>),
}

/// Trait for identifying the natural language of a piece of text.
pub trait LanguageDetector: Send + Sync {
    /// Return the ISO 639-1 code of the text's language (e.g. "id", "en").
    fn detect(&self, text: &str) -> Result<String, DetectionError>;
}
