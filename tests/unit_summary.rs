// Unit tests for the extractive summarizer.

use std::time::{Duration, Instant};

use hoaks::summary::{split_sentences, Summarizer, Summary, MAX_SENTENCES};
use hoaks::text::normalize;

const ARTICLE: &str = "Harga beras di gudang petani kembali naik pekan ini. \
    Petani mengeluhkan biaya pupuk yang membuat harga beras terus naik. \
    Pedagang pasar menyebut stok beras dari gudang petani mulai menipis. \
    Cuaca cerah membuat warga kota memadati taman kota pada akhir pekan.";

// ============================================================
// Available summaries
// ============================================================

#[test]
fn multi_sentence_article_is_summarized() {
    let summary = Summarizer::new(80).summarize(ARTICLE);
    let text = summary.as_text().expect("summary should be available");

    assert!(text.ends_with('.'));
    assert!(text.chars().next().unwrap().is_uppercase());
}

#[test]
fn summary_sentences_come_from_article_in_order() {
    let normalized: Vec<String> = split_sentences(ARTICLE).into_iter().map(normalize).collect();

    let summary = Summarizer::new(80).summarize(ARTICLE);
    let text = summary.as_text().unwrap().to_lowercase();

    let mut last = None;
    for sentence in text.trim_end_matches('.').split(". ") {
        let position = normalized
            .iter()
            .position(|s| s == sentence)
            .unwrap_or_else(|| panic!("'{sentence}' is not an article sentence"));
        if let Some(previous) = last {
            assert!(position > previous, "summary is out of document order");
        }
        last = Some(position);
    }
}

#[test]
fn small_target_keeps_only_top_sentence() {
    let summary = Summarizer::new(3).summarize(ARTICLE);
    let text = summary.as_text().unwrap();
    assert_eq!(text.matches(". ").count(), 0, "expected one sentence: {text}");
}

/// `n` related sentences, one per line.
fn long_article(n: usize) -> String {
    (0..n)
        .map(|i| match i % 3 {
            0 => "Harga beras di gudang petani kembali naik pekan ini.",
            1 => "Pedagang pasar menyebut stok beras petani mulai menipis.",
            _ => "Petani mengeluhkan harga pupuk yang membuat beras mahal.",
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn long_input_is_ranked_from_a_bounded_prefix() {
    let summary = Summarizer::new(1_000_000).summarize(&long_article(1_000));
    let text = summary.as_text().unwrap();
    let sentences = text.trim_end_matches('.').split(". ").count();
    assert_eq!(sentences, MAX_SENTENCES);
}

#[test]
fn very_long_input_finishes_quickly() {
    let article = long_article(20_000);
    let started = Instant::now();
    let summary = Summarizer::new(80).summarize(&article);
    assert!(summary.is_available());
    assert!(
        started.elapsed() < Duration::from_secs(10),
        "summarizing took {:?}",
        started.elapsed()
    );
}

// ============================================================
// Unavailable summaries
// ============================================================

#[test]
fn single_sentence_is_unavailable() {
    let summary = Summarizer::new(80).summarize("Harga beras di gudang petani kembali naik pekan ini.");
    assert_eq!(summary, Summary::Unavailable);
}

#[test]
fn unrelated_sentences_are_unavailable() {
    let summary = Summarizer::new(80).summarize("Kucing tidur nyenyak di sofa. Mobil merah melaju kencang.");
    assert_eq!(summary, Summary::Unavailable);
}

#[test]
fn unavailable_serializes_as_null() {
    assert_eq!(serde_json::to_value(Summary::Unavailable).unwrap(), serde_json::Value::Null);
    assert_eq!(
        serde_json::to_value(Summary::Text("Ringkas.".into())).unwrap(),
        serde_json::json!("Ringkas.")
    );
}
