// Model status: which artifacts exist, their version and age, and the
// corpus they were trained from.

use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;

use crate::config::Config;
use crate::corpus::NormalizedCorpus;
use crate::model::artifact::{
    read_artifact, read_header, ArtifactKind, TestEvaluation, CLASSIFIER_FILE, FORMAT_VERSION,
    TEST_DATA_FILE, VECTORIZER_FILE,
};
use crate::model::TfIdfVectorizer;

/// One artifact file.
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactStatus {
    pub file: &'static str,
    pub present: bool,
    pub size: Option<String>,
    pub format_version: Option<u32>,
    pub created_at: Option<DateTime<Utc>>,
    /// Set when the file exists but its header cannot be read
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CorpusStatus {
    pub path: String,
    pub rows: usize,
    pub valid: usize,
    pub hoax: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelStatus {
    pub model_dir: String,
    pub expected_format_version: u32,
    pub artifacts: Vec<ArtifactStatus>,
    pub vocabulary_size: Option<usize>,
    pub test_rows: Option<usize>,
    pub corpus: Option<CorpusStatus>,
}

impl ModelStatus {
    /// Vectorizer and classifier both present at the current version.
    pub fn ready(&self) -> bool {
        self.artifacts
            .iter()
            .filter(|a| a.file != TEST_DATA_FILE)
            .all(|a| a.format_version == Some(FORMAT_VERSION))
    }
}

fn artifact_status(dir: &Path, file: &'static str) -> ArtifactStatus {
    let path = dir.join(file);
    let mut status = ArtifactStatus {
        file,
        present: path.exists(),
        size: None,
        format_version: None,
        created_at: None,
        error: None,
    };
    if !status.present {
        return status;
    }

    status.size = std::fs::metadata(&path).ok().map(|m| format_bytes(m.len()));
    match read_header(&path) {
        Ok(header) => {
            status.format_version = Some(header.format_version);
            status.created_at = Some(header.created_at);
        }
        Err(e) => status.error = Some(e.to_string()),
    }
    status
}

/// Gather status for the configured model directory. Reading the corpus
/// means a full pass over the CSV, so it is optional.
pub fn collect(config: &Config, include_corpus: bool) -> ModelStatus {
    let dir = &config.model_dir;
    let artifacts = [VECTORIZER_FILE, CLASSIFIER_FILE, TEST_DATA_FILE]
        .into_iter()
        .map(|file| artifact_status(dir, file))
        .collect();

    let vocabulary_size = read_artifact::<TfIdfVectorizer>(&dir.join(VECTORIZER_FILE), ArtifactKind::Vectorizer)
        .ok()
        .map(|envelope| envelope.payload.vocabulary_size());
    let test_rows = TestEvaluation::load(dir).ok().map(|t| t.len());

    let corpus = include_corpus
        .then(|| NormalizedCorpus::read_csv(&config.corpus_path).ok())
        .flatten()
        .map(|corpus| {
            let (valid, hoax) = corpus.label_counts();
            CorpusStatus {
                path: config.corpus_path.display().to_string(),
                rows: corpus.len(),
                valid,
                hoax,
            }
        });

    ModelStatus {
        model_dir: dir.display().to_string(),
        expected_format_version: FORMAT_VERSION,
        artifacts,
        vocabulary_size,
        test_rows,
        corpus,
    }
}

/// Display model status to the terminal.
pub fn show(config: &Config) -> Result<()> {
    let status = collect(config, true);

    println!("{}", "Model status".bold());
    println!("Model directory: {}", status.model_dir);

    for artifact in &status.artifacts {
        let line = match (artifact.present, &artifact.error, artifact.format_version) {
            (false, _, _) => "missing".red().to_string(),
            (true, Some(e), _) => format!("{} ({e})", "unreadable".red()),
            (true, None, Some(v)) if v != FORMAT_VERSION => format!(
                "{} (format v{v}, expected v{FORMAT_VERSION})",
                "outdated".yellow()
            ),
            (true, None, _) => format!(
                "{} {}, written {}",
                "ok".green(),
                artifact.size.as_deref().unwrap_or("?"),
                artifact
                    .created_at
                    .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
                    .unwrap_or_else(|| "unknown".to_string())
            ),
        };
        println!("  {:<16} {}", artifact.file, line);
    }

    if let Some(vocab) = status.vocabulary_size {
        println!("Vocabulary: {vocab} terms");
    }
    if let Some(rows) = status.test_rows {
        println!("Held-out test rows: {rows}");
    }

    match &status.corpus {
        Some(c) => println!(
            "Corpus: {} ({} rows: {} valid, {} hoax)",
            c.path, c.rows, c.valid, c.hoax
        ),
        None => {
            println!("Corpus: not found at {}", config.corpus_path.display());
            println!("  Run `hoaks unify` to build it");
        }
    }

    if !status.ready() {
        println!("\nRun `hoaks train` to train a model.");
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
