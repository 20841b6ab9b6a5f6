// Shared fixtures: a small labeled Indonesian corpus and a service trained on it.
#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use hoaks::corpus::{Label, LabeledDocument, NormalizedCorpus};
use hoaks::inference::{InferenceService, InferenceSettings};
use hoaks::model::{LogisticConfig, TrainedArtifact};
use hoaks::text::normalize;
use hoaks::training::trainer::fit_documents;

pub const HOAX_ARTICLES: &[&str] = &[
    "Viral pesan berantai bahwa vaksin mengandung chip rahasia untuk melacak warga, segera sebarkan!",
    "Beredar kabar konspirasi bahwa chip rahasia ditanam lewat vaksin, sebarkan ke grup keluarga.",
    "Pesan viral menyebut air rebusan bawang putih menyembuhkan kanker dalam tiga hari, sebarkan!",
    "Konspirasi besar terbongkar, chip rahasia dalam vaksin bisa mengendalikan pikiran, viral sekarang.",
    "Sebarkan segera, pesan berantai menyebut uang gratis dibagikan lewat tautan rahasia ini.",
    "Viral video konspirasi yang mengklaim gempa besar akan terjadi besok malam, sebarkan ke semua.",
    "Kabar viral bahwa minum air garam hangat membunuh virus dalam tubuh, sebarkan pesan berantai ini.",
    "Pesan berantai konspirasi menyebut sinyal menara baru menyebarkan penyakit, segera sebarkan.",
    "Beredar pesan viral bahwa bank akan menutup semua rekening besok, sebarkan ke keluarga anda.",
    "Konspirasi chip rahasia kembali viral, pesan berantai meminta warga menolak vaksin, sebarkan.",
    "Viral klaim bahwa telur palsu dari plastik beredar di pasar, sebarkan pesan berantai ini segera.",
    "Pesan berantai rahasia menyebut presiden membagikan hadiah uang lewat tautan viral, sebarkan.",
];

pub const VALID_ARTICLES: &[&str] = &[
    "Kementerian Kesehatan merilis data resmi jumlah vaksinasi nasional dalam konferensi pers hari ini.",
    "Menurut data resmi Badan Pusat Statistik, angka inflasi bulan lalu tercatat turun tipis.",
    "Kementerian Keuangan menyampaikan laporan resmi realisasi anggaran negara dalam konferensi pers.",
    "Badan Meteorologi merilis prakiraan cuaca resmi untuk pekan depan berdasarkan data pengamatan.",
    "Menteri Pendidikan meresmikan gedung sekolah baru dan menyampaikan data jumlah siswa penerima bantuan.",
    "Data resmi Kementerian Perhubungan menunjukkan jumlah penumpang kereta meningkat selama libur panjang.",
    "Dalam konferensi pers, kepolisian menyampaikan hasil penyelidikan resmi kecelakaan di jalan tol.",
    "Bank Indonesia merilis laporan resmi mengenai cadangan devisa berdasarkan data akhir bulan.",
    "Kementerian Pertanian mencatat data resmi produksi beras nasional meningkat dibanding tahun lalu.",
    "Pemerintah daerah menyampaikan jadwal resmi pembagian bantuan sosial dalam konferensi pers.",
    "Menurut laporan resmi Kementerian Kesehatan, data kasus demam berdarah menurun bulan ini.",
    "Badan Pusat Statistik merilis data resmi tingkat pengangguran terbuka dalam konferensi pers.",
];

/// Normalized, labeled fixture documents (hoax first, then valid).
pub fn fixture_documents() -> Vec<LabeledDocument> {
    let hoax = HOAX_ARTICLES.iter().map(|t| (t, Label::Hoax));
    let valid = VALID_ARTICLES.iter().map(|t| (t, Label::Valid));
    hoax.chain(valid)
        .map(|(text, label)| LabeledDocument {
            cleaned: normalize(text),
            label,
        })
        .collect()
}

pub fn fixture_corpus() -> NormalizedCorpus {
    NormalizedCorpus::new(fixture_documents())
}

/// A vectorizer + classifier fitted on every fixture document.
pub fn fixture_artifact() -> TrainedArtifact {
    fit_documents(&fixture_documents(), &LogisticConfig::default()).unwrap()
}

pub fn fixture_service() -> InferenceService {
    InferenceService::new(Arc::new(fixture_artifact()), InferenceSettings::default())
}

/// A fresh, empty scratch directory unique to this test.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("hoaks-test-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
