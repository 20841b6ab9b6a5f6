// Extractive summarizer: TextRank over the article's sentences.
//
// The raw text is split into sentences first (normalization removes the
// punctuation we would split on), then each sentence goes through the same
// normalizer the classifier uses. Sentences are ranked with PageRank over a
// word-overlap similarity graph and the best ones are kept until the summary
// is as close as it gets to the word target, in document order.

pub mod pagerank;

use std::collections::HashSet;

use serde::Serialize;
use stop_words::{get, LANGUAGE};
use tracing::debug;

use crate::text::normalize;
use pagerank::PageRank;

/// Sentences beyond this many are left out of the ranking.
pub const MAX_SENTENCES: usize = 200;

/// Summary of one article, or an explicit marker that none could be made.
///
/// Serializes as a string, or `null` when unavailable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Summary {
    Text(String),
    Unavailable,
}

impl Summary {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Summary::Text(text) => Some(text),
            Summary::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Summary::Text(_))
    }
}

pub struct Summarizer {
    target_words: usize,
    /// Normalized Indonesian stop words, ignored when comparing sentences
    stopwords: HashSet<String>,
    pagerank: PageRank,
}

impl Summarizer {
    pub fn new(target_words: usize) -> Self {
        let stopwords = get(LANGUAGE::Indonesian)
            .iter()
            .map(|w| normalize(w))
            .filter(|w| !w.is_empty())
            .collect();
        Self {
            target_words,
            stopwords,
            pagerank: PageRank::default(),
        }
    }

    pub fn target_words(&self) -> usize {
        self.target_words
    }

    /// Summarize `raw`; `Unavailable` when there are fewer than two usable
    /// sentences or no two sentences share a content word.
    ///
    /// Only the first `MAX_SENTENCES` usable sentences are ranked.
    pub fn summarize(&self, raw: &str) -> Summary {
        let sentences: Vec<String> = split_sentences(raw)
            .into_iter()
            .map(normalize)
            .filter(|s| !s.is_empty())
            .take(MAX_SENTENCES)
            .collect();

        if sentences.len() < 2 {
            debug!(sentences = sentences.len(), "Too few sentences to summarize");
            return Summary::Unavailable;
        }

        let bags: Vec<WordBag> = sentences
            .iter()
            .map(|s| WordBag::new(s, &self.stopwords))
            .collect();

        let n = sentences.len();
        let mut weights = vec![vec![0.0; n]; n];
        let mut has_edge = false;
        for i in 0..n {
            for j in (i + 1)..n {
                let w = similarity(&bags[i], &bags[j]);
                if w > 0.0 {
                    weights[i][j] = w;
                    weights[j][i] = w;
                    has_edge = true;
                }
            }
        }

        if !has_edge {
            debug!(sentences = n, "No sentence overlap; summary unavailable");
            return Summary::Unavailable;
        }

        let scores = self.pagerank.run(&weights);
        let selected = self.select(&sentences, &scores);
        let joined: Vec<&str> = selected.iter().map(|&i| sentences[i].as_str()).collect();

        Summary::Text(format_summary(&joined.join(". ")))
    }

    /// Indices of the chosen sentences, in document order.
    ///
    /// Walks sentences from highest score down and stops at the first one
    /// whose words would move the total away from the target. The top
    /// sentence is always kept.
    fn select(&self, sentences: &[String], scores: &[f64]) -> Vec<usize> {
        let mut ranked: Vec<usize> = (0..sentences.len()).collect();
        ranked.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]).then(a.cmp(&b)));

        let target = self.target_words as i64;
        let mut length = 0i64;
        let mut selected = Vec::new();
        for i in ranked {
            let words = sentences[i].split(' ').count() as i64;
            if !selected.is_empty() && (target - length - words).abs() > (target - length).abs() {
                break;
            }
            selected.push(i);
            length += words;
        }

        selected.sort_unstable();
        selected
    }
}

/// Content words of one sentence: the distinct set plus the token count.
struct WordBag<'a> {
    words: HashSet<&'a str>,
    len: usize,
}

impl<'a> WordBag<'a> {
    fn new(sentence: &'a str, stopwords: &HashSet<String>) -> Self {
        let tokens: Vec<&str> = sentence
            .split(' ')
            .filter(|w| !stopwords.contains(*w))
            .collect();
        Self {
            len: tokens.len(),
            words: tokens.into_iter().collect(),
        }
    }
}

/// TextRank similarity: shared words over the log lengths of both sentences.
fn similarity(a: &WordBag, b: &WordBag) -> f64 {
    let denominator = (a.len as f64).ln() + (b.len as f64).ln();
    if a.len == 0 || b.len == 0 || denominator <= 0.0 {
        return 0.0;
    }
    let (small, large) = if a.words.len() <= b.words.len() {
        (&a.words, &b.words)
    } else {
        (&b.words, &a.words)
    };
    let shared = small.iter().filter(|w| large.contains(*w)).count();
    shared as f64 / denominator
}

/// Split raw text at `.`, `!` or `?` followed by whitespace (or the end),
/// and at line breaks. Pieces are trimmed; empty ones are dropped.
pub fn split_sentences(raw: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = raw.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        let boundary = match c {
            '\n' | '\r' => true,
            '.' | '!' | '?' => chars.peek().map_or(true, |(_, next)| next.is_whitespace()),
            _ => false,
        };
        if boundary {
            let end = i + c.len_utf8();
            sentences.push(raw[start..end].trim());
            start = end;
        }
    }
    sentences.push(raw[start..].trim());

    sentences.retain(|s| !s.is_empty());
    sentences
}

/// Split on periods, capitalize each sentence, rejoin with ". " and end
/// with a period.
pub fn format_summary(text: &str) -> String {
    let sentences: Vec<String> = text
        .split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(capitalize)
        .collect();
    if sentences.is_empty() {
        return String::new();
    }
    format!("{}.", sentences.join(". "))
}

fn capitalize(sentence: &str) -> String {
    let mut chars = sentence.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
