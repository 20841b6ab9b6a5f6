// Colored terminal output for verdicts, metrics and pipeline reports.
//
// main.rs display calls delegate here so the commands stay about control
// flow, not formatting.

use std::path::Path;

use colored::Colorize;

use crate::corpus::unify::Unified;
use crate::corpus::Label;
use crate::inference::{InferenceResult, RejectionReason};
use crate::model::artifact::TestEvaluation;
use crate::summary::Summary;
use crate::training::{CrossValidation, TrainOutcome, ValidationMetrics};

/// Display the verdict for one article.
pub fn display_verdict(result: &InferenceResult) {
    let verdict = match result.label {
        Label::Hoax => "HOAX".red().bold(),
        Label::Valid => "VALID".green().bold(),
    };
    println!("\n  Result: {}  ({:.1}% confidence)", verdict, result.confidence * 100.0);

    if result.low_confidence {
        println!(
            "  {} Low confidence: verify this article with other sources.",
            "~".yellow()
        );
    }

    if !result.top_terms.is_empty() {
        println!("\n  Influential terms:");
        for term in &result.top_terms {
            let direction = if term.weight > 0.0 {
                "hoax".red()
            } else {
                "valid".green()
            };
            println!("    {:<20} {:>+7.3}  ({})", term.term, term.weight, direction);
        }
    }

    match &result.summary {
        Summary::Text(text) => println!("\n  Summary:\n    {}", text.dimmed()),
        Summary::Unavailable => println!("\n  Summary: {}", "not available for this text".dimmed()),
    }
    println!();
}

/// Display why an input was not scored.
pub fn display_rejection(reason: &RejectionReason) {
    println!("  {} {}", "Rejected:".yellow().bold(), reason);
}

/// Display held-out metrics with a confusion matrix.
pub fn display_metrics(title: &str, metrics: &ValidationMetrics) {
    println!("\n{}", format!("=== {title} ===").bold());
    println!(
        "  Accuracy {:.4}  Precision {:.4}  Recall {:.4}  F1 {:.4}  FPR {:.4}",
        metrics.accuracy, metrics.precision, metrics.recall, metrics.f1, metrics.fpr
    );
    println!();
    println!("  {:>16} {:>10} {:>10}", "", "pred valid".dimmed(), "pred hoax".dimmed());
    println!("  {:>16} {:>10} {:>10}", "actual valid", metrics.tn, metrics.fp);
    println!("  {:>16} {:>10} {:>10}", "actual hoax", metrics.fn_count, metrics.tp);
}

/// Display a training run's row counts and test metrics.
pub fn display_training(outcome: &TrainOutcome, model_dir: &Path) {
    let (valid, hoax) = outcome.input_counts;
    println!("\n{}", "=== Training ===".bold());
    println!("  Corpus: {valid} valid, {hoax} hoax");
    println!(
        "  Balanced: {} rows ({} per class)",
        outcome.balanced_rows,
        outcome.balanced_rows / 2
    );
    println!(
        "  Split: {} train, {} test",
        outcome.train_rows, outcome.test_rows
    );
    println!(
        "  Vocabulary: {} terms",
        outcome.artifact.vectorizer.vocabulary_size()
    );
    display_metrics("Held-out test set", &outcome.metrics);
    println!("\n  Artifacts written to {}", model_dir.display());
}

/// Display per-fold and mean cross-validation metrics.
pub fn display_cross_validation(cv: &CrossValidation) {
    println!(
        "\n{}",
        format!("=== Cross-validation ({} folds) ===", cv.folds.len()).bold()
    );
    for (i, fold) in cv.folds.iter().enumerate() {
        println!(
            "  Fold {}: acc {:.4}  prec {:.4}  rec {:.4}  f1 {:.4}",
            i + 1,
            fold.accuracy,
            fold.precision,
            fold.recall,
            fold.f1
        );
    }
    println!(
        "  {}: acc {:.4}  prec {:.4}  rec {:.4}  f1 {:.4}",
        "Mean".bold(),
        cv.mean.accuracy,
        cv.mean.precision,
        cv.mean.recall,
        cv.mean.f1
    );
}

/// Display misclassified rows from the held-out set.
pub fn display_misclassified(evaluation: &TestEvaluation, limit: usize) {
    let wrong: Vec<usize> = (0..evaluation.len())
        .filter(|&i| evaluation.predictions[i] != evaluation.labels[i])
        .collect();

    if wrong.is_empty() {
        println!("\n  No misclassified rows.");
        return;
    }

    println!(
        "\n{}",
        format!(
            "=== Misclassified ({} of {}, showing {}) ===",
            wrong.len(),
            evaluation.len(),
            wrong.len().min(limit)
        )
        .bold()
    );
    for &i in wrong.iter().take(limit) {
        let preview = super::truncate_chars(&evaluation.texts[i], 100);
        println!(
            "  actual {:<5} p(hoax) {:.2}  {}",
            evaluation.labels[i].name(),
            evaluation.probabilities[i],
            preview.dimmed()
        );
    }
}

/// Display what each source contributed to a unified corpus.
pub fn display_unify_report(unified: &Unified, output: &Path) {
    println!("\n{}", "=== Sources ===".bold());
    for src in &unified.loaded {
        println!(
            "  {} {}  [{}]  {} rows, {} kept, {} dropped",
            "+".green(),
            src.path.display(),
            src.variant.text_column,
            src.rows_read,
            src.documents.len(),
            src.rows_dropped()
        );
    }
    for skipped in &unified.skipped {
        println!(
            "  {} {}  skipped: {}",
            "-".yellow(),
            skipped.path.display(),
            skipped.reason
        );
    }

    let (valid, hoax) = unified.corpus.label_counts();
    println!(
        "\n  Unified corpus: {} rows ({} valid, {} hoax) -> {}",
        unified.corpus.len(),
        valid,
        hoax,
        output.display()
    );
}
