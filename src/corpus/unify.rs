// Dataset unifier: merges heterogeneous labeled sources into one corpus.
//
// Each source is a CSV export or a spreadsheet (xlsx, xls, ods) with its own
// column names. For every source we
// pick a (text, label) column pair from the schema table, drop rows with a
// missing text or label, normalize the text, and append the rows to the
// corpus. The merged corpus is shuffled with a fixed seed so two runs over
// the same inputs produce byte-identical files.
//
// A missing or unrecognized source is skipped with a warning. Only an empty
// result (nothing matched at all) is fatal.

use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader};
use csv::StringRecord;
use indicatif::{ProgressBar, ProgressStyle};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use thiserror::Error;
use tracing::{info, warn};

use super::schema::{default_variants, resolve, SchemaVariant};
use super::{Label, LabeledDocument, NormalizedCorpus};
use crate::text::normalize;

/// One input file, optionally with an explicit column pair.
#[derive(Debug, Clone)]
pub struct SourceSpec {
    pub path: PathBuf,
    /// Overrides the schema table for this file
    pub columns: Option<SchemaVariant>,
}

impl SourceSpec {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            columns: None,
        }
    }

    pub fn with_columns(path: impl Into<PathBuf>, columns: SchemaVariant) -> Self {
        Self {
            path: path.into(),
            columns: Some(columns),
        }
    }
}

/// Why a source contributed nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Missing,
    Unreadable(String),
    /// None of the known column pairs appear in the header row
    UnrecognizedColumns(Vec<String>),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Missing => write!(f, "file not found"),
            SkipReason::Unreadable(e) => write!(f, "unreadable: {e}"),
            SkipReason::UnrecognizedColumns(headers) => {
                write!(f, "no known text/label columns in {headers:?}")
            }
        }
    }
}

/// A source that was skipped, and why.
#[derive(Debug, Clone)]
pub struct SkippedSource {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// A source that contributed rows.
#[derive(Debug, Clone)]
pub struct LoadedSource {
    pub path: PathBuf,
    pub variant: SchemaVariant,
    /// Data rows in the file
    pub rows_read: usize,
    /// Normalized rows that survived the null/label/empty filters
    pub documents: Vec<LabeledDocument>,
}

impl LoadedSource {
    pub fn rows_dropped(&self) -> usize {
        self.rows_read - self.documents.len()
    }
}

/// Fatal unification errors.
#[derive(Debug, Error)]
pub enum UnifyError {
    /// Every source was missing or unrecognized: a configuration problem.
    #[error("none of the {attempted} source file(s) could be used; check paths and column names")]
    NoSources { attempted: usize },
}

/// Result of a unification run: the merged corpus plus per-source detail.
#[derive(Debug)]
pub struct Unified {
    pub corpus: NormalizedCorpus,
    pub loaded: Vec<LoadedSource>,
    pub skipped: Vec<SkippedSource>,
}

/// Merges labeled sources into a single normalized corpus.
pub struct Unifier {
    variants: Vec<SchemaVariant>,
    seed: u64,
    show_progress: bool,
}

impl Unifier {
    pub fn new(seed: u64) -> Self {
        Self {
            variants: default_variants(),
            seed,
            show_progress: false,
        }
    }

    /// Replace the schema table.
    pub fn with_variants(mut self, variants: Vec<SchemaVariant>) -> Self {
        self.variants = variants;
        self
    }

    /// Show a progress bar while normalizing rows.
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Load, normalize, concatenate and shuffle all sources.
    ///
    /// Sources contribute in argument order before the shuffle, so pass
    /// previously unified corpora last to mirror an incremental merge.
    pub fn unify(&self, sources: &[SourceSpec]) -> Result<Unified, UnifyError> {
        let mut loaded = Vec::new();
        let mut skipped = Vec::new();

        for source in sources {
            match self.load_source(source) {
                Ok(src) => {
                    info!(
                        path = %src.path.display(),
                        text_column = %src.variant.text_column,
                        rows = src.rows_read,
                        kept = src.documents.len(),
                        "Loaded source"
                    );
                    loaded.push(src);
                }
                Err(reason) => {
                    warn!(path = %source.path.display(), %reason, "Skipping source");
                    skipped.push(SkippedSource {
                        path: source.path.clone(),
                        reason,
                    });
                }
            }
        }

        if loaded.is_empty() {
            return Err(UnifyError::NoSources {
                attempted: sources.len(),
            });
        }

        let mut documents: Vec<LabeledDocument> = loaded
            .iter()
            .flat_map(|src| src.documents.iter().cloned())
            .collect();

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        documents.shuffle(&mut rng);

        let corpus = NormalizedCorpus::new(documents);
        let (valid, hoax) = corpus.label_counts();
        info!(rows = corpus.len(), valid, hoax, "Unified corpus built");

        Ok(Unified {
            corpus,
            loaded,
            skipped,
        })
    }

    /// Read one source and normalize its rows.
    pub fn load_source(&self, source: &SourceSpec) -> Result<LoadedSource, SkipReason> {
        if !source.path.exists() {
            return Err(SkipReason::Missing);
        }

        let table = read_table(&source.path)?;

        let explicit = source.columns.as_ref().map(std::slice::from_ref);
        let candidates = explicit.unwrap_or(self.variants.as_slice());
        let (variant, text_idx, label_idx) = resolve(candidates, &table.headers).ok_or_else(|| {
            SkipReason::UnrecognizedColumns(table.headers.iter().map(str::to_string).collect())
        })?;

        // Pull (text, label) pairs, dropping rows where either is missing.
        let rows_read = table.rows_read;
        let mut pairs: Vec<(String, Label)> = Vec::new();
        for record in &table.records {
            let text = record.get(text_idx).map(str::trim).unwrap_or("");
            let label = record.get(label_idx).and_then(Label::parse);
            if let (false, Some(label)) = (text.is_empty(), label) {
                pairs.push((text.to_string(), label));
            }
        }

        let documents = if variant.pre_normalized {
            pairs
                .into_iter()
                .map(|(cleaned, label)| LabeledDocument { cleaned, label })
                .filter(|d| !d.cleaned.is_empty())
                .collect()
        } else {
            normalize_rows(pairs, self.progress_bar(rows_read, &source.path))
        };

        Ok(LoadedSource {
            path: source.path.clone(),
            variant: variant.clone(),
            rows_read,
            documents,
        })
    }

    fn progress_bar(&self, len: usize, path: &Path) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(len as u64);
        pb.set_style(
            ProgressStyle::with_template("  {msg} [{bar:30}] {pos}/{len}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        pb.set_message(
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        );
        pb
    }
}

/// Header row and data rows of one source file, whatever its format.
struct SourceTable {
    headers: StringRecord,
    records: Vec<StringRecord>,
    /// Data rows in the file, including ones that failed to parse
    rows_read: usize,
}

/// Read a source as CSV, or as a spreadsheet when the extension says so.
fn read_table(path: &Path) -> Result<SourceTable, SkipReason> {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase());
    match extension.as_deref() {
        Some("xlsx" | "xlsm" | "xls" | "ods") => read_workbook(path),
        _ => read_csv(path),
    }
}

fn read_csv(path: &Path) -> Result<SourceTable, SkipReason> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| SkipReason::Unreadable(e.to_string()))?;

    let headers = reader
        .headers()
        .map_err(|e| SkipReason::Unreadable(e.to_string()))?
        .clone();

    let mut rows_read = 0usize;
    let mut records = Vec::new();
    for record in reader.records() {
        rows_read += 1;
        if let Ok(record) = record {
            records.push(record);
        }
    }

    Ok(SourceTable {
        headers,
        records,
        rows_read,
    })
}

/// First worksheet of a workbook; its first row is the header.
fn read_workbook(path: &Path) -> Result<SourceTable, SkipReason> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| SkipReason::Unreadable(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SkipReason::Unreadable("workbook has no worksheets".to_string()))?
        .map_err(|e| SkipReason::Unreadable(e.to_string()))?;

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect::<StringRecord>());
    let headers = rows.next().unwrap_or_default();
    let records: Vec<StringRecord> = rows.collect();

    Ok(SourceTable {
        headers,
        rows_read: records.len(),
        records,
    })
}

/// Cell contents as the text a CSV export would hold. Whole floats lose
/// their fraction so a label cell of 1.0 reads as "1".
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        other => other.to_string(),
    }
}

/// Normalize rows in parallel. Output order matches input order, and rows
/// that normalize to nothing are dropped.
fn normalize_rows(pairs: Vec<(String, Label)>, pb: ProgressBar) -> Vec<LabeledDocument> {
    let documents: Vec<LabeledDocument> = pairs
        .into_par_iter()
        .map(|(text, label)| {
            let cleaned = normalize(&text);
            pb.inc(1);
            LabeledDocument { cleaned, label }
        })
        .collect::<Vec<_>>()
        .into_iter()
        .filter(|d| !d.cleaned.is_empty())
        .collect();
    pb.finish_and_clear();
    documents
}
