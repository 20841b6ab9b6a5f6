// Language detection: the detector trait, a character n-gram detector and
// a stop-word frequency detector it falls back on.

pub mod ngram;
pub mod stopwords;
pub mod traits;

/// ISO 639-1 code of the language the classifier was trained on.
pub const TARGET_LANGUAGE: &str = "id";
