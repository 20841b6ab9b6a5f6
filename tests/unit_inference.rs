// Unit tests for the inference service: rejections, scoring, explanations
// and the low-confidence advisory.

mod common;

use std::time::{Duration, Instant};

use hoaks::corpus::Label;
use hoaks::inference::{is_low_confidence, InferenceSettings, RejectionReason, TOP_TERMS};
use hoaks::language::traits::{DetectionError, LanguageDetector};
use hoaks::text::normalize;

const INDONESIAN_HOAX: &str =
    "Pesan berantai yang viral ini menyebut chip rahasia dalam vaksin, segera sebarkan.";
const INDONESIAN_VALID: &str =
    "Kementerian Kesehatan menyampaikan data resmi vaksinasi dalam konferensi pers hari ini.";
const ENGLISH: &str = "The minister said that the new bridge will open to the public next week.";

/// Short news headlines made only of content words.
const HEADLINES: &[&str] = &[
    "Polisi menangkap pelaku pencurian motor.",
    "Menteri Kesehatan mengumumkan vaksin gratis.",
    "Pemerintah menaikkan harga bahan bakar minyak.",
    "Harga cabai di pasar tradisional melonjak tajam.",
];

/// Finds no language in anything.
struct SilentDetector;

impl LanguageDetector for SilentDetector {
    fn detect(&self, _text: &str) -> Result<String, DetectionError> {
        Err(DetectionError::NoSignal)
    }
}

/// Always reports the same language.
struct FixedDetector(&'static str);

impl LanguageDetector for FixedDetector {
    fn detect(&self, _text: &str) -> Result<String, DetectionError> {
        Ok(self.0.to_string())
    }
}

// ============================================================
// Rejections
// ============================================================

#[test]
fn empty_input_is_rejected() {
    let service = common::fixture_service();
    assert_eq!(service.infer("").unwrap_err(), RejectionReason::EmptyInput);
    assert_eq!(service.infer("  \n\t ").unwrap_err(), RejectionReason::EmptyInput);
}

#[test]
fn short_input_is_rejected() {
    let service = common::fixture_service();
    assert_eq!(
        service.infer("ab").unwrap_err(),
        RejectionReason::InputTooShort { min_chars: 30 }
    );
}

#[test]
fn letterless_input_is_rejected() {
    let service = common::fixture_service();
    assert_eq!(
        service.infer("1234567890 1234567890 1234567890 !!").unwrap_err(),
        RejectionReason::NoWords
    );
}

#[test]
fn english_input_is_wrong_language() {
    let service = common::fixture_service();
    assert_eq!(
        service.infer(ENGLISH).unwrap_err(),
        RejectionReason::WrongLanguage {
            detected: "en".to_string()
        }
    );
}

#[test]
fn undetectable_language_is_its_own_rejection() {
    let service = common::fixture_service().with_detector(Box::new(SilentDetector));
    assert_eq!(
        service.infer(INDONESIAN_VALID).unwrap_err(),
        RejectionReason::LanguageUndetected
    );
}

#[test]
fn headlines_without_stop_words_are_indonesian() {
    let service = common::fixture_service();
    for headline in HEADLINES {
        let result = service.infer(headline);
        assert!(result.is_ok(), "{headline:?} rejected: {:?}", result.err());
    }
}

#[test]
fn long_input_is_scored_quickly() {
    let service = common::fixture_service();
    let article = vec![INDONESIAN_HOAX, INDONESIAN_VALID].repeat(2_500).join("\n");
    let started = Instant::now();
    let result = service.infer(&article).unwrap();
    assert!(result.summary.is_available());
    assert!(
        started.elapsed() < Duration::from_secs(20),
        "inference took {:?}",
        started.elapsed()
    );
}

#[test]
fn custom_detector_is_respected() {
    let service = common::fixture_service().with_detector(Box::new(FixedDetector("ms")));
    assert_eq!(
        service.infer(INDONESIAN_VALID).unwrap_err(),
        RejectionReason::WrongLanguage {
            detected: "ms".to_string()
        }
    );
}

#[test]
fn min_chars_is_configurable() {
    let settings = InferenceSettings {
        min_chars: 20,
        ..InferenceSettings::default()
    };
    let service = hoaks::inference::InferenceService::new(
        std::sync::Arc::new(common::fixture_artifact()),
        settings,
    );
    assert_eq!(
        service.infer("tujuh belas huruf").unwrap_err(),
        RejectionReason::InputTooShort { min_chars: 20 }
    );
}

// ============================================================
// Scoring
// ============================================================

#[test]
fn indonesian_fixtures_get_expected_labels() {
    let service = common::fixture_service();

    let hoax = service.infer(INDONESIAN_HOAX).unwrap();
    assert_eq!(hoax.label, Label::Hoax);
    assert!((0.0..=1.0).contains(&hoax.confidence));
    assert!(hoax.confidence >= 0.5);

    let valid = service.infer(INDONESIAN_VALID).unwrap();
    assert_eq!(valid.label, Label::Valid);
    assert!((0.0..=1.0).contains(&valid.confidence));
    assert!((valid.confidence - (1.0 - valid.hoax_probability)).abs() < 1e-12);
}

#[test]
fn top_terms_are_bounded_sorted_and_present_in_input() {
    let service = common::fixture_service();
    let result = service.infer(INDONESIAN_HOAX).unwrap();

    assert!(!result.top_terms.is_empty());
    assert!(result.top_terms.len() <= TOP_TERMS);
    for pair in result.top_terms.windows(2) {
        assert!(pair[0].weight.abs() >= pair[1].weight.abs());
    }

    let cleaned = normalize(INDONESIAN_HOAX);
    let words: Vec<&str> = cleaned.split(' ').collect();
    for term in &result.top_terms {
        assert!(words.contains(&term.term.as_str()), "{} not in input", term.term);
    }
}

#[test]
fn summary_is_text_or_explicitly_unavailable() {
    let service = common::fixture_service();
    let result = service.infer(INDONESIAN_HOAX).unwrap();
    match result.summary.as_text() {
        Some(text) => assert!(!text.is_empty()),
        None => assert!(!result.summary.is_available()),
    }
}

// ============================================================
// Low-confidence advisory
// ============================================================

#[test]
fn low_confidence_flag_follows_threshold() {
    assert!(is_low_confidence(0.5, 0.60));
    assert!(is_low_confidence(0.5999, 0.60));
    assert!(!is_low_confidence(0.60, 0.60));
    assert!(!is_low_confidence(0.95, 0.60));
}

#[test]
fn results_carry_flag_consistent_with_confidence() {
    let service = common::fixture_service();
    for text in [INDONESIAN_HOAX, INDONESIAN_VALID] {
        let result = service.infer(text).unwrap();
        assert_eq!(result.low_confidence, result.confidence < 0.60);
    }
}
