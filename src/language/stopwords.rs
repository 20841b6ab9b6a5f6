// Stop-word frequency language detector.
//
// Function words are the most reliable language signal in short text: an
// Indonesian paragraph is full of "yang", "dan", "di", "akan", "bahwa";
// an English one of "the", "and", "that". We count how many tokens of the
// input appear in each language's stop-word list and pick the best match.

use std::collections::HashSet;

use stop_words::{get, LANGUAGE};
use tracing::debug;

use super::traits::{DetectionError, LanguageDetector};

/// One language profile: ISO 639-1 code plus its stop words.
struct Profile {
    code: &'static str,
    words: HashSet<String>,
}

/// Detects language by counting stop-word hits per profile.
pub struct StopwordDetector {
    profiles: Vec<Profile>,
    /// Tokens shorter than this are ignored (single letters are noise)
    min_token_len: usize,
}

impl Default for StopwordDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl StopwordDetector {
    /// Build the default detector: Indonesian plus the languages most likely
    /// to be pasted into the form by mistake.
    pub fn new() -> Self {
        let languages = [
            ("id", LANGUAGE::Indonesian),
            ("en", LANGUAGE::English),
            ("fr", LANGUAGE::French),
            ("de", LANGUAGE::German),
            ("es", LANGUAGE::Spanish),
            ("it", LANGUAGE::Italian),
            ("nl", LANGUAGE::Dutch),
            ("pt", LANGUAGE::Portuguese),
        ];

        let profiles = languages
            .into_iter()
            .map(|(code, language)| Profile {
                code,
                words: get(language).into_iter().map(|w| w.to_lowercase()).collect(),
            })
            .collect();

        Self {
            profiles,
            min_token_len: 2,
        }
    }

    /// Stop-word hit count per language code, in profile order.
    pub fn scores(&self, text: &str) -> Vec<(&'static str, usize)> {
        let lower = text.to_lowercase();
        let tokens: Vec<&str> = lower
            .split(|c: char| !c.is_alphabetic())
            .filter(|t| t.chars().count() >= self.min_token_len)
            .collect();

        self.profiles
            .iter()
            .map(|profile| {
                let hits = tokens
                    .iter()
                    .filter(|t| profile.words.contains(**t))
                    .count();
                (profile.code, hits)
            })
            .collect()
    }
}

impl LanguageDetector for StopwordDetector {
    fn detect(&self, text: &str) -> Result<String, DetectionError> {
        let scores = self.scores(text);
        let best = scores.iter().map(|(_, hits)| *hits).max().unwrap_or(0);

        if best == 0 {
            return Err(DetectionError::NoSignal);
        }

        let leaders: Vec<String> = scores
            .iter()
            .filter(|(_, hits)| *hits == best)
            .map(|(code, _)| code.to_string())
            .collect();

        debug!(?scores, "Language detection scores");

        match leaders.as_slice() {
            [single] => Ok(single.clone()),
            _ => Err(DetectionError::Ambiguous(leaders)),
        }
    }
}
