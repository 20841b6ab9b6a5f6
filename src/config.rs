use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::inference::InferenceSettings;
use crate::model::artifact::{artifacts_present, default_model_dir};

/// Central configuration loaded from environment variables.
///
/// Every value has a default, so an empty environment works. The .env file
/// is loaded automatically at startup via dotenvy.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding vectorizer.bin, classifier.bin and test_data.bin
    pub model_dir: PathBuf,
    /// Unified corpus written by `unify` and read by `train`
    pub corpus_path: PathBuf,
    /// Seed for every shuffle, sample and split
    pub seed: u64,
    pub min_chars: usize,
    pub require_word: bool,
    pub low_confidence: f64,
    pub summary_words: usize,
    /// Shared secret for `POST /api/reload`; when unset the header only has
    /// to be present
    pub reload_token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        let inference = InferenceSettings::default();
        Self {
            model_dir: default_model_dir(),
            corpus_path: PathBuf::from("cleandataset/hoax_dataset_merged.csv"),
            seed: 42,
            min_chars: inference.min_chars,
            require_word: inference.require_word,
            low_confidence: inference.low_confidence_threshold,
            summary_words: inference.summary_words,
            reload_token: None,
        }
    }
}

/// Parse an optional env var, falling back to `default` when unset.
fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("{name} has an invalid value: {raw:?}")),
        Err(_) => Ok(default),
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        let defaults = Self::default();

        let low_confidence: f64 = parse_var("HOAKS_LOW_CONFIDENCE", defaults.low_confidence)?;
        if !(0.0..=1.0).contains(&low_confidence) {
            anyhow::bail!("HOAKS_LOW_CONFIDENCE must be between 0 and 1, got {low_confidence}");
        }

        Ok(Self {
            model_dir: env::var("HOAKS_MODEL_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_dir),
            corpus_path: env::var("HOAKS_CORPUS_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.corpus_path),
            seed: parse_var("HOAKS_SEED", defaults.seed)?,
            min_chars: parse_var("HOAKS_MIN_CHARS", defaults.min_chars)?,
            require_word: parse_var("HOAKS_REQUIRE_WORD", defaults.require_word)?,
            low_confidence,
            summary_words: parse_var("HOAKS_SUMMARY_WORDS", defaults.summary_words)?,
            reload_token: env::var("HOAKS_RELOAD_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty()),
        })
    }

    /// Inference tunables derived from this config.
    pub fn inference_settings(&self) -> InferenceSettings {
        InferenceSettings {
            min_chars: self.min_chars,
            require_word: self.require_word,
            low_confidence_threshold: self.low_confidence,
            summary_words: self.summary_words,
        }
    }

    /// Check that trained artifacts exist in the model directory.
    /// Call this before any operation that scores text.
    pub fn require_artifacts(&self) -> Result<()> {
        if !artifacts_present(&self.model_dir) {
            anyhow::bail!(
                "Model artifacts not found in {}\n\
                 Run `hoaks train` to train a model, or set HOAKS_MODEL_DIR.",
                self.model_dir.display()
            );
        }
        Ok(())
    }
}
