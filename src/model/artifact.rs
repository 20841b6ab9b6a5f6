// Model artifacts: versioned bincode files in the model directory.
//
// Training writes three files:
//   vectorizer.bin  the fitted TF-IDF vectorizer
//   classifier.bin  the logistic regression plus the digest of its vectorizer
//   test_data.bin   the held-out split with predictions, for `evaluate`
//
// Every file is an `ArtifactEnvelope`: a small header (format version, kind,
// creation time) followed by the payload. The header is decoded first so a
// file from another format version fails with a clear error instead of a
// garbled decode.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use super::{LogisticRegression, TfIdfVectorizer};
use crate::corpus::Label;

/// Bumped whenever a payload's shape changes.
pub const FORMAT_VERSION: u32 = 1;

pub const VECTORIZER_FILE: &str = "vectorizer.bin";
pub const CLASSIFIER_FILE: &str = "classifier.bin";
pub const TEST_DATA_FILE: &str = "test_data.bin";

/// Default model directory: `./models` when it exists (a checkout with
/// trained artifacts), otherwise the platform data directory.
pub fn default_model_dir() -> PathBuf {
    let local = PathBuf::from("models");
    if local.is_dir() {
        return local;
    }
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("hoaks")
        .join("models")
}

/// Check whether the vectorizer and classifier files both exist.
pub fn artifacts_present(dir: &Path) -> bool {
    dir.join(VECTORIZER_FILE).exists() && dir.join(CLASSIFIER_FILE).exists()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArtifactKind {
    Vectorizer,
    Classifier,
    TestData,
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ArtifactKind::Vectorizer => "vectorizer",
            ArtifactKind::Classifier => "classifier",
            ArtifactKind::TestData => "test data",
        };
        f.write_str(name)
    }
}

/// Header shared by every artifact file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactHeader {
    pub format_version: u32,
    pub kind: ArtifactKind,
    pub created_at: DateTime<Utc>,
}

/// Header plus payload, as written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactEnvelope<T> {
    pub header: ArtifactHeader,
    pub payload: T,
}

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("model artifact not found: {0} (run `hoaks train` first)")]
    Missing(PathBuf),

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode or decode {path}: {source}")]
    Encoding {
        path: PathBuf,
        #[source]
        source: bincode::Error,
    },

    #[error("{path} has format version {found}, expected {expected}; retrain the model")]
    VersionMismatch {
        path: PathBuf,
        found: u32,
        expected: u32,
    },

    #[error("{path} holds a {found} artifact, expected {expected}")]
    KindMismatch {
        path: PathBuf,
        found: ArtifactKind,
        expected: ArtifactKind,
    },

    #[error("classifier was trained against a different vectorizer; retrain or restore the matching pair")]
    VectorizerMismatch,

    #[error("classifier has {weights} weights but the vectorizer has {vocabulary} terms")]
    DimensionMismatch { weights: usize, vocabulary: usize },
}

/// Write `payload` to `path` inside an envelope of the given kind.
pub fn write_artifact<T: Serialize>(
    path: &Path,
    kind: ArtifactKind,
    payload: &T,
) -> Result<(), ArtifactError> {
    let envelope = ArtifactEnvelope {
        header: ArtifactHeader {
            format_version: FORMAT_VERSION,
            kind,
            created_at: Utc::now(),
        },
        payload,
    };
    let bytes = bincode::serialize(&envelope).map_err(|source| ArtifactError::Encoding {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, bytes).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Read only the header of an artifact file.
pub fn read_header(path: &Path) -> Result<ArtifactHeader, ArtifactError> {
    let bytes = read_bytes(path)?;
    decode_header(path, &bytes)
}

/// Read an artifact, checking its version and kind before the payload.
pub fn read_artifact<T: DeserializeOwned>(
    path: &Path,
    expected: ArtifactKind,
) -> Result<ArtifactEnvelope<T>, ArtifactError> {
    let bytes = read_bytes(path)?;
    let header = decode_header(path, &bytes)?;

    if header.format_version != FORMAT_VERSION {
        return Err(ArtifactError::VersionMismatch {
            path: path.to_path_buf(),
            found: header.format_version,
            expected: FORMAT_VERSION,
        });
    }
    if header.kind != expected {
        return Err(ArtifactError::KindMismatch {
            path: path.to_path_buf(),
            found: header.kind,
            expected,
        });
    }

    bincode::deserialize(&bytes).map_err(|source| ArtifactError::Encoding {
        path: path.to_path_buf(),
        source,
    })
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, ArtifactError> {
    if !path.exists() {
        return Err(ArtifactError::Missing(path.to_path_buf()));
    }
    fs::read(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// The envelope is encoded header-first, and bincode's default decode ignores
// trailing bytes, so the header decodes on its own.
fn decode_header(path: &Path, bytes: &[u8]) -> Result<ArtifactHeader, ArtifactError> {
    bincode::deserialize(bytes).map_err(|source| ArtifactError::Encoding {
        path: path.to_path_buf(),
        source,
    })
}

/// Classifier payload: the model plus the digest of the vectorizer it needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ClassifierPayload {
    model: LogisticRegression,
    vectorizer_digest: String,
}

/// A matched vectorizer + classifier pair, ready for inference.
#[derive(Debug, Clone)]
pub struct TrainedArtifact {
    pub vectorizer: TfIdfVectorizer,
    pub classifier: LogisticRegression,
    /// When the classifier file was written; `None` until saved
    pub created_at: Option<DateTime<Utc>>,
}

impl TrainedArtifact {
    /// Pair a vectorizer with the classifier fitted on its output.
    pub fn new(vectorizer: TfIdfVectorizer, classifier: LogisticRegression) -> Self {
        Self {
            vectorizer,
            classifier,
            created_at: None,
        }
    }

    /// Write both files into `dir`, creating it if needed.
    pub fn save(&self, dir: &Path) -> Result<(), ArtifactError> {
        fs::create_dir_all(dir).map_err(|source| ArtifactError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        write_artifact(
            &dir.join(VECTORIZER_FILE),
            ArtifactKind::Vectorizer,
            &self.vectorizer,
        )?;
        write_artifact(
            &dir.join(CLASSIFIER_FILE),
            ArtifactKind::Classifier,
            &ClassifierPayload {
                model: self.classifier.clone(),
                vectorizer_digest: self.vectorizer.digest(),
            },
        )?;

        info!(dir = %dir.display(), "Saved model artifacts");
        Ok(())
    }

    /// Load and cross-check both files from `dir`.
    pub fn load(dir: &Path) -> Result<Self, ArtifactError> {
        let vectorizer: ArtifactEnvelope<TfIdfVectorizer> =
            read_artifact(&dir.join(VECTORIZER_FILE), ArtifactKind::Vectorizer)?;
        let classifier: ArtifactEnvelope<ClassifierPayload> =
            read_artifact(&dir.join(CLASSIFIER_FILE), ArtifactKind::Classifier)?;

        let vectorizer_payload = vectorizer.payload.reindex();
        if classifier.payload.vectorizer_digest != vectorizer_payload.digest() {
            return Err(ArtifactError::VectorizerMismatch);
        }

        let model = classifier.payload.model;
        if model.n_features() != vectorizer_payload.vocabulary_size() {
            return Err(ArtifactError::DimensionMismatch {
                weights: model.n_features(),
                vocabulary: vectorizer_payload.vocabulary_size(),
            });
        }

        info!(
            dir = %dir.display(),
            vocabulary = vectorizer_payload.vocabulary_size(),
            "Loaded model artifacts"
        );

        Ok(Self {
            vectorizer: vectorizer_payload,
            classifier: model,
            created_at: Some(classifier.header.created_at),
        })
    }
}

/// The held-out split, kept for offline evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestEvaluation {
    pub texts: Vec<String>,
    pub labels: Vec<Label>,
    pub predictions: Vec<Label>,
    /// Hoax-class probability per row
    pub probabilities: Vec<f64>,
}

impl TestEvaluation {
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    pub fn save(&self, dir: &Path) -> Result<(), ArtifactError> {
        fs::create_dir_all(dir).map_err(|source| ArtifactError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        write_artifact(&dir.join(TEST_DATA_FILE), ArtifactKind::TestData, self)
    }

    pub fn load(dir: &Path) -> Result<Self, ArtifactError> {
        let envelope: ArtifactEnvelope<Self> =
            read_artifact(&dir.join(TEST_DATA_FILE), ArtifactKind::TestData)?;
        Ok(envelope.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LogisticConfig;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("hoaks-artifact-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn trained() -> TrainedArtifact {
        let texts = ["vaksin chip rahasia", "menteri resmi jadwal"];
        let labels = [Label::Hoax, Label::Valid];
        let vectorizer = TfIdfVectorizer::fit(&texts).unwrap();
        let rows = vectorizer.transform_batch(&texts);
        let classifier = LogisticRegression::fit(
            &rows,
            &labels,
            vectorizer.vocabulary_size(),
            &LogisticConfig::default(),
        )
        .unwrap();
        TrainedArtifact::new(vectorizer, classifier)
    }

    #[test]
    fn save_then_load_keeps_predictions() {
        let dir = scratch("roundtrip");
        let artifact = trained();
        artifact.save(&dir).unwrap();

        let loaded = TrainedArtifact::load(&dir).unwrap();
        assert!(loaded.created_at.is_some());
        let x = loaded.vectorizer.transform("vaksin rahasia");
        assert_eq!(
            loaded.classifier.decision(&x),
            artifact.classifier.decision(&artifact.vectorizer.transform("vaksin rahasia"))
        );
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_directory_reports_missing() {
        let dir = scratch("missing");
        assert!(matches!(
            TrainedArtifact::load(&dir),
            Err(ArtifactError::Missing(_))
        ));
    }

    #[test]
    fn mismatched_vectorizer_is_refused() {
        let dir = scratch("mismatch");
        trained().save(&dir).unwrap();

        let other = TfIdfVectorizer::fit(&["berita lain sama sekali"]).unwrap();
        write_artifact(&dir.join(VECTORIZER_FILE), ArtifactKind::Vectorizer, &other).unwrap();

        assert!(matches!(
            TrainedArtifact::load(&dir),
            Err(ArtifactError::VectorizerMismatch)
        ));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn wrong_kind_is_refused() {
        let dir = scratch("kind");
        fs::create_dir_all(&dir).unwrap();
        TestEvaluation::default().save(&dir).unwrap();
        fs::copy(dir.join(TEST_DATA_FILE), dir.join(VECTORIZER_FILE)).unwrap();

        let err = read_artifact::<TfIdfVectorizer>(&dir.join(VECTORIZER_FILE), ArtifactKind::Vectorizer)
            .unwrap_err();
        assert!(matches!(err, ArtifactError::KindMismatch { .. }));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn future_version_is_refused() {
        let dir = scratch("version");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(TEST_DATA_FILE);
        let envelope = ArtifactEnvelope {
            header: ArtifactHeader {
                format_version: FORMAT_VERSION + 1,
                kind: ArtifactKind::TestData,
                created_at: Utc::now(),
            },
            payload: (),
        };
        fs::write(&path, bincode::serialize(&envelope).unwrap()).unwrap();

        assert!(matches!(
            TestEvaluation::load(&dir),
            Err(ArtifactError::VersionMismatch { found, .. }) if found == FORMAT_VERSION + 1
        ));
        let _ = fs::remove_dir_all(&dir);
    }
}
