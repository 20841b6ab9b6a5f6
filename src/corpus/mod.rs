// Corpus: the labeled, normalized training data and its CSV form.
//
// A unified corpus is a flat CSV with two columns, `cleaned` and `label`,
// one row per article. It is built once per training run by the unifier
// and read by the trainer.

pub mod schema;
pub mod unify;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Article class. Serialized as the integer used in the source datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Label {
    Valid = 0,
    Hoax = 1,
}

impl Label {
    /// Parse a label cell from a source file.
    ///
    /// Spreadsheet exports write the same value as `1`, `1.0` or `true`, so
    /// all of those are accepted. Anything else is not a label.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "0" | "0.0" | "false" => Some(Label::Valid),
            "1" | "1.0" | "true" => Some(Label::Hoax),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Label::Valid => "valid",
            Label::Hoax => "hoax",
        }
    }
}

impl From<Label> for u8 {
    fn from(label: Label) -> Self {
        label.as_u8()
    }
}

impl TryFrom<u8> for Label {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(Label::Valid),
            1 => Ok(Label::Hoax),
            other => Err(format!("label must be 0 or 1, got {other}")),
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One normalized article with its class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledDocument {
    /// Output of `text::normalize`; never empty
    pub cleaned: String,
    pub label: Label,
}

/// The ordered, normalized training corpus.
///
/// Rows with empty text never make it in; see `NormalizedCorpus::new`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedCorpus {
    documents: Vec<LabeledDocument>,
}

impl NormalizedCorpus {
    /// Build a corpus, dropping documents whose text is empty.
    pub fn new(documents: Vec<LabeledDocument>) -> Self {
        let documents = documents
            .into_iter()
            .filter(|d| !d.cleaned.trim().is_empty())
            .collect();
        Self { documents }
    }

    pub fn documents(&self) -> &[LabeledDocument] {
        &self.documents
    }

    pub fn into_documents(self) -> Vec<LabeledDocument> {
        self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Count of (valid, hoax) rows.
    pub fn label_counts(&self) -> (usize, usize) {
        let hoax = self
            .documents
            .iter()
            .filter(|d| d.label == Label::Hoax)
            .count();
        (self.documents.len() - hoax, hoax)
    }

    /// Read a corpus CSV (`cleaned,label`).
    ///
    /// Rows with an empty text cell or a label outside {0, 1} are skipped,
    /// matching how the unifier treats source rows.
    pub fn read_csv(path: &Path) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("Failed to open corpus: {}", path.display()))?;

        let mut documents = Vec::new();
        for record in reader.deserialize::<CorpusRow>() {
            let row = record.with_context(|| format!("Malformed row in {}", path.display()))?;
            let (Some(cleaned), Some(label)) = (row.cleaned, row.label.as_deref().and_then(Label::parse))
            else {
                continue;
            };
            documents.push(LabeledDocument { cleaned, label });
        }

        Ok(Self::new(documents))
    }

    /// Write the corpus as CSV, creating parent directories as needed.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        write_documents(&self.documents, path)
    }
}

/// Write documents as a `cleaned,label` CSV.
pub fn write_documents(documents: &[LabeledDocument], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create corpus file: {}", path.display()))?;
    for doc in documents {
        writer.serialize(doc)?;
    }
    writer.flush()?;
    Ok(())
}

/// Loose row shape for reading: both cells may be missing.
#[derive(Debug, Deserialize)]
struct CorpusRow {
    cleaned: Option<String>,
    label: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_parsing_accepts_spreadsheet_forms() {
        assert_eq!(Label::parse("1"), Some(Label::Hoax));
        assert_eq!(Label::parse(" 0.0 "), Some(Label::Valid));
        assert_eq!(Label::parse("TRUE"), Some(Label::Hoax));
        assert_eq!(Label::parse("2"), None);
        assert_eq!(Label::parse(""), None);
    }

    #[test]
    fn empty_documents_are_dropped() {
        let corpus = NormalizedCorpus::new(vec![
            LabeledDocument {
                cleaned: "berita benar".to_string(),
                label: Label::Valid,
            },
            LabeledDocument {
                cleaned: "  ".to_string(),
                label: Label::Hoax,
            },
        ]);
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.label_counts(), (1, 0));
    }
}
