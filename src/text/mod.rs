// Text normalization shared by corpus construction and inference.
//
// The classifier only ever sees text that went through `normalize`. The
// unifier, the inference service and the summarizer all call the same
// function, so a vocabulary built at training time lines up with what the
// service vectorizes at request time.

pub mod stemmer;

use std::sync::LazyLock;

use regex::Regex;

use stemmer::{IndonesianStemmer, Stemmer};

/// Links are dropped before anything else so their letters never leak
/// into the vocabulary.
static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"http\S+|www\S+").expect("URL pattern is a valid regex"));

/// Normalize raw article text with the default Indonesian stemmer.
///
/// Steps: lowercase, strip URLs, replace everything outside `[a-z\s]` with
/// a space, collapse whitespace, stem each word. The output only ever
/// contains `a-z` and single spaces, and `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(raw: &str) -> String {
    normalize_with(raw, &IndonesianStemmer)
}

/// Normalize with an explicit stemmer.
pub fn normalize_with(raw: &str, stemmer: &dyn Stemmer) -> String {
    let lower = raw.to_lowercase();
    let without_urls = URL_PATTERN.replace_all(&lower, " ");

    let letters_only: String = without_urls
        .chars()
        .map(|c| if c.is_ascii_lowercase() { c } else { ' ' })
        .collect();

    letters_only
        .split_whitespace()
        .map(|word| stemmer.stem(word))
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether the text contains a run of at least three ASCII letters.
///
/// Used as a cheap validity signal for user input: a long string of digits
/// or punctuation is not an article.
pub fn has_letter_run(text: &str, min_run: usize) -> bool {
    let mut run = 0usize;
    for c in text.chars() {
        if c.is_ascii_alphabetic() {
            run += 1;
            if run >= min_run {
                return true;
            }
        } else {
            run = 0;
        }
    }
    false
}
