// Source schema table: which columns hold the text and the label.
//
// Each dataset we ingest names its columns differently. Instead of branching
// per source, the unifier walks this table in priority order and uses the
// first pair whose columns both exist. Supporting a new source format means
// adding a row here (or passing `--columns` on the command line).

use std::str::FromStr;

/// A (text column, label column) pair a source file may use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaVariant {
    pub text_column: String,
    pub label_column: String,
    /// The text column already holds normalized text (e.g. a previous
    /// unified corpus), so the normalizer is not applied again.
    pub pre_normalized: bool,
}

impl SchemaVariant {
    pub fn raw(text_column: &str, label_column: &str) -> Self {
        Self {
            text_column: text_column.to_string(),
            label_column: label_column.to_string(),
            pre_normalized: false,
        }
    }

    pub fn normalized(text_column: &str, label_column: &str) -> Self {
        Self {
            text_column: text_column.to_string(),
            label_column: label_column.to_string(),
            pre_normalized: true,
        }
    }

    /// Column positions of this variant in `headers`, if both are present.
    pub fn locate(&self, headers: &csv::StringRecord) -> Option<(usize, usize)> {
        let text = headers.iter().position(|h| h.trim() == self.text_column)?;
        let label = headers.iter().position(|h| h.trim() == self.label_column)?;
        Some((text, label))
    }
}

/// Parses `text:label` from the command line as a raw variant.
impl FromStr for SchemaVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((text, label)) if !text.is_empty() && !label.is_empty() => {
                Ok(SchemaVariant::raw(text, label))
            }
            _ => Err(format!("expected TEXT_COLUMN:LABEL_COLUMN, got {s:?}")),
        }
    }
}

/// The known source layouts, checked in this order.
///
/// The first three are the raw scraped / fact-check exports; the last two
/// are previously cleaned corpora that only need to be merged.
pub fn default_variants() -> Vec<SchemaVariant> {
    vec![
        SchemaVariant::raw("text_new", "hoax"),
        SchemaVariant::raw("Narasi", "hoax"),
        SchemaVariant::raw("FullText", "hoax"),
        SchemaVariant::normalized("cleaned", "label"),
        SchemaVariant::normalized("cleaned_text", "label"),
    ]
}

/// First variant in `variants` that matches `headers`, with column positions.
pub fn resolve<'a>(
    variants: &'a [SchemaVariant],
    headers: &csv::StringRecord,
) -> Option<(&'a SchemaVariant, usize, usize)> {
    variants
        .iter()
        .find_map(|v| v.locate(headers).map(|(text, label)| (v, text, label)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_in_priority_order() {
        let headers = csv::StringRecord::from(vec!["FullText", "Narasi", "hoax"]);
        let variants = default_variants();
        let (variant, text, label) = resolve(&variants, &headers).unwrap();
        assert_eq!(variant.text_column, "Narasi");
        assert_eq!((text, label), (1, 2));
    }

    #[test]
    fn unknown_headers_resolve_to_none() {
        let headers = csv::StringRecord::from(vec!["judul", "isi"]);
        assert!(resolve(&default_variants(), &headers).is_none());
    }

    #[test]
    fn parses_column_pair_from_cli() {
        let v: SchemaVariant = "content:is_hoax".parse().unwrap();
        assert_eq!(v, SchemaVariant::raw("content", "is_hoax"));
        assert!("content".parse::<SchemaVariant>().is_err());
    }
}
