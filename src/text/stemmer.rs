// Indonesian stemmer: dictionary-free confix stripping.
//
// Reduces affixed Indonesian words to a root form by peeling particles,
// possessive pronouns, prefixes and derivational suffixes. Every removal is
// gated on the word's "measure" (its vowel count) so short roots survive.
//
// The single pass is repeated until the word stops changing, which makes
// `stem(stem(w)) == stem(w)` hold for every input.

/// Trait for reducing a single lowercase word to its root form.
///
/// The normalizer calls this once per whitespace-separated word. Input is
/// always lowercase ASCII letters; output must be non-empty lowercase ASCII
/// letters and a fixpoint of `stem`.
pub trait Stemmer: Send + Sync {
    fn stem(&self, word: &str) -> String;
}

/// Passes words through unchanged. Useful for diagnosing vocabulary issues.
pub struct IdentityStemmer;

impl Stemmer for IdentityStemmer {
    fn stem(&self, word: &str) -> String {
        word.to_string()
    }
}

/// The default stemmer used for both corpus construction and inference.
#[derive(Debug, Default, Clone, Copy)]
pub struct IndonesianStemmer;

/// Roots whose leading or trailing letters look like affixes.
/// Stripping stops as soon as one of these is reached.
const KNOWN_ROOTS: &[&str] = &[
    "berita",
    "bencana",
    "bendera",
    "benua",
    "dialog",
    "dinas",
    "diskusi",
    "kedelai",
    "keluarga",
    "kemarin",
    "kereta",
    "ketua",
    "media",
    "medis",
    "menteri",
    "merdeka",
    "mereka",
    "metode",
    "negeri",
    "pelangi",
    "peluru",
    "pemilu",
    "perempuan",
    "peristiwa",
    "periksa",
    "perintah",
    "pertama",
    "pesawat",
    "sebagai",
    "teknologi",
    "teroris",
    "terima",
    "tetapi",
];

/// Which prefix (if any) was removed during the current pass.
/// Suffix removal depends on it: `di-` words keep their `-an`, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prefix {
    None,
    /// di-, meng-, men-, me-, mem-, meny-, ter-
    Verbal,
    /// per-, pe-
    Per,
    /// ke-, peng-, pen-, pem-, peny-
    Nominal,
    /// ber-, be-
    Ber,
}

impl Stemmer for IndonesianStemmer {
    fn stem(&self, word: &str) -> String {
        // Every productive pass shortens the word, so this terminates.
        let mut current = word.to_string();
        loop {
            let next = stem_once(&current);
            if next == current {
                return current;
            }
            current = next;
        }
    }
}

fn is_vowel(c: u8) -> bool {
    matches!(c, b'a' | b'e' | b'i' | b'o' | b'u')
}

fn measure(word: &str) -> usize {
    word.bytes().filter(|&c| is_vowel(c)).count()
}

/// No further removal is allowed once the word is short or a known root.
fn settled(word: &str) -> bool {
    measure(word) <= 2 || KNOWN_ROOTS.contains(&word)
}

/// One pass of the affix-stripping algorithm.
fn stem_once(word: &str) -> String {
    if !word.bytes().all(|c| c.is_ascii_lowercase()) || settled(word) {
        return word.to_string();
    }

    let mut w = word.to_string();

    strip_particle(&mut w);
    if settled(&w) {
        return w;
    }

    strip_possessive(&mut w);
    if settled(&w) {
        return w;
    }

    let prefix = strip_first_order_prefix(&mut w);
    if prefix != Prefix::None {
        if settled(&w) {
            return w;
        }
        strip_suffix(&mut w, prefix);
        if settled(&w) {
            return w;
        }
        strip_second_order_prefix(&mut w);
    } else {
        let prefix = strip_second_order_prefix(&mut w);
        if settled(&w) {
            return w;
        }
        strip_suffix(&mut w, prefix);
    }

    w
}

fn strip_particle(w: &mut String) {
    for particle in ["kah", "lah", "pun"] {
        if w.len() > particle.len() && w.ends_with(particle) {
            w.truncate(w.len() - particle.len());
            return;
        }
    }
}

fn strip_possessive(w: &mut String) {
    for possessive in ["nya", "ku", "mu"] {
        if w.len() > possessive.len() && w.ends_with(possessive) {
            w.truncate(w.len() - possessive.len());
            return;
        }
    }
}

/// Replace a leading `prefix` with `replacement`.
fn recode(w: &mut String, prefix: &str, replacement: &str) {
    let rest = w[prefix.len()..].to_string();
    *w = format!("{replacement}{rest}");
}

/// True if `w` starts with `prefix` and the next letter is a vowel.
fn prefix_before_vowel(w: &str, prefix: &str) -> bool {
    w.starts_with(prefix)
        && w
            .as_bytes()
            .get(prefix.len())
            .is_some_and(|&c| is_vowel(c))
}

fn strip_first_order_prefix(w: &mut String) -> Prefix {
    // Longest match first: meny/peny/meng/peng before mem/pem/men/pen/me.
    if prefix_before_vowel(w, "meny") {
        recode(w, "meny", "s");
        return Prefix::Verbal;
    }
    if prefix_before_vowel(w, "peny") {
        recode(w, "peny", "s");
        return Prefix::Nominal;
    }
    for (prefix, kind) in [("meng", Prefix::Verbal), ("peng", Prefix::Nominal)] {
        if w.len() > prefix.len() && w.starts_with(prefix) {
            recode(w, prefix, "");
            return kind;
        }
    }
    for (prefix, kind) in [("mem", Prefix::Verbal), ("pem", Prefix::Nominal)] {
        if w.len() > prefix.len() && w.starts_with(prefix) {
            // mem- + vowel drops a root-initial p: memukul -> pukul
            let replacement = if prefix_before_vowel(w, prefix) { "p" } else { "" };
            recode(w, prefix, replacement);
            return kind;
        }
    }
    for (prefix, kind) in [
        ("men", Prefix::Verbal),
        ("pen", Prefix::Nominal),
        ("ter", Prefix::Verbal),
        ("me", Prefix::Verbal),
        ("di", Prefix::Verbal),
        ("ke", Prefix::Nominal),
    ] {
        if w.len() > prefix.len() && w.starts_with(prefix) {
            recode(w, prefix, "");
            return kind;
        }
    }
    Prefix::None
}

fn strip_second_order_prefix(w: &mut String) -> Prefix {
    match w.as_str() {
        "belajar" => {
            *w = "ajar".to_string();
            return Prefix::Ber;
        }
        "pelajar" => {
            *w = "ajar".to_string();
            return Prefix::Per;
        }
        _ => {}
    }
    if w.len() > 3 && w.starts_with("ber") {
        recode(w, "ber", "");
        return Prefix::Ber;
    }
    if w.len() > 3 && w.starts_with("per") {
        recode(w, "per", "");
        return Prefix::Per;
    }
    // be- only before consonant + "er": bekerja -> kerja
    let bytes = w.as_bytes();
    if bytes.len() > 4 && w.starts_with("be") && !is_vowel(bytes[2]) && &bytes[3..5] == b"er" {
        recode(w, "be", "");
        return Prefix::Ber;
    }
    if w.len() > 2 && w.starts_with("pe") {
        recode(w, "pe", "");
        return Prefix::Per;
    }
    Prefix::None
}

fn strip_suffix(w: &mut String, prefix: Prefix) {
    if w.len() > 3 && w.ends_with("kan") && !matches!(prefix, Prefix::Nominal | Prefix::Per) {
        w.truncate(w.len() - 3);
        return;
    }
    if w.len() > 2 && w.ends_with("an") && prefix != Prefix::Verbal {
        w.truncate(w.len() - 2);
        return;
    }
    if w.len() > 2
        && w.ends_with('i')
        && !matches!(prefix, Prefix::Nominal | Prefix::Ber)
        && w.as_bytes()[w.len() - 2] != b's'
    {
        w.truncate(w.len() - 1);
    }
}
