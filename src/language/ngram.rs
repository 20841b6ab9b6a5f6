// Character n-gram language detector (whatlang), with stop-word counts as
// a tie-breaker.
//
// Trigram profiles recognize a language from its letter patterns alone, so
// a headline made only of content words ("Polisi menangkap pelaku pencurian
// motor.") is still identified. Latin-script text is compared against the
// same languages the stop-word detector knows; other scripts go through the
// full whatlang language set and always come back as a non-target language.

use tracing::debug;
use whatlang::{detect_script, Detector, Lang, Script};

use super::stopwords::StopwordDetector;
use super::traits::{DetectionError, LanguageDetector};

/// Only the head of the text is inspected.
const MAX_SAMPLE_CHARS: usize = 2000;

/// Latin-script languages the classifier's users are likely to paste.
const LATIN_PROFILES: [Lang; 8] = [
    Lang::Ind,
    Lang::Eng,
    Lang::Fra,
    Lang::Deu,
    Lang::Spa,
    Lang::Ita,
    Lang::Nld,
    Lang::Por,
];

pub struct NgramDetector {
    latin: Detector,
    stopwords: StopwordDetector,
}

impl Default for NgramDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl NgramDetector {
    pub fn new() -> Self {
        Self {
            latin: Detector::with_allowlist(LATIN_PROFILES.to_vec()),
            stopwords: StopwordDetector::new(),
        }
    }
}

impl LanguageDetector for NgramDetector {
    fn detect(&self, text: &str) -> Result<String, DetectionError> {
        let sample = head(text, MAX_SAMPLE_CHARS);

        match detect_script(sample) {
            None => return Err(DetectionError::NoSignal),
            Some(Script::Latin) => {}
            Some(script) => {
                debug!(?script, "Non-Latin script");
                return whatlang::detect(sample)
                    .map(|info| iso_639_1(info.lang()))
                    .ok_or(DetectionError::NoSignal);
            }
        }

        let info = self.latin.detect(sample).ok_or(DetectionError::NoSignal)?;
        let guess = iso_639_1(info.lang());
        debug!(
            lang = %guess,
            confidence = info.confidence(),
            reliable = info.is_reliable(),
            "n-gram detection"
        );
        if info.is_reliable() {
            return Ok(guess);
        }

        // Unsure between profiles: function words decide when they agree on one.
        Ok(self.stopwords.detect(sample).unwrap_or(guess))
    }
}

/// The first `max_chars` characters of `text`.
fn head(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// ISO 639-1 code for the languages we name in messages; the three-letter
/// code otherwise.
fn iso_639_1(lang: Lang) -> String {
    let code = match lang {
        Lang::Ind => "id",
        Lang::Eng => "en",
        Lang::Fra => "fr",
        Lang::Deu => "de",
        Lang::Spa => "es",
        Lang::Ita => "it",
        Lang::Nld => "nl",
        Lang::Por => "pt",
        Lang::Rus => "ru",
        Lang::Cmn => "zh",
        Lang::Jpn => "ja",
        Lang::Kor => "ko",
        Lang::Ara => "ar",
        Lang::Hin => "hi",
        Lang::Tha => "th",
        other => other.code(),
    };
    code.to_string()
}
