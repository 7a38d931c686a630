//! Cyrillic-to-Latin transliteration of file names.
//!
//! Only the base part of a name (everything before the first `.`) is
//! rewritten. The extension chain after it is carried over untouched, so
//! `Звіт.tar.gz` becomes `Zvit.tar.gz`.
//!
//! # Examples
//!
//! ```
//! use sortdir::transliterate::normalize;
//!
//! assert_eq!(normalize("Фото.JPG"), "Foto.JPG");
//! assert_eq!(normalize("мій звіт.pdf"), "mij_zvit.pdf");
//! ```

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

/// The Ukrainian alphabet, lowercase.
const CYRILLIC: &str = "абвгдеєжзиіїйклмнопрстуфхцчшщьюя";

/// Latin substitutions, positionally aligned with [`CYRILLIC`].
const LATIN: [&str; 32] = [
    "a", "b", "v", "g", "d", "e", "je", "zh", "z", "y", "i", "ji", "j", "k", "l", "m", "n", "o",
    "p", "r", "s", "t", "u", "f", "h", "ts", "ch", "sh", "sch", "", "ju", "ja",
];

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]").expect("Invalid non-word pattern"));

/// Rewrites file names into an ASCII-safe form.
///
/// The only knob is what happens to names without any `.`: by default they
/// come back without a separator, while `with_trailing_dot(true)` yields
/// `name.` for compatibility with trees sorted by older tooling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Transliterator {
    trailing_dot: bool,
}

impl Transliterator {
    /// Creates a transliterator that omits the trailing separator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Controls whether names without an extension chain end with `.`.
    pub fn with_trailing_dot(mut self, trailing_dot: bool) -> Self {
        self.trailing_dot = trailing_dot;
        self
    }

    /// Normalizes a file name.
    ///
    /// The base part is transliterated and every character that is not an
    /// ASCII letter, digit or underscore becomes `_`. The extension chain is
    /// appended verbatim.
    ///
    /// # Examples
    ///
    /// ```
    /// use sortdir::transliterate::Transliterator;
    ///
    /// let t = Transliterator::new();
    /// assert_eq!(t.normalize("архів.tar.gz"), "arhiv.tar.gz");
    /// assert_eq!(t.normalize("README"), "README");
    /// assert_eq!(t.with_trailing_dot(true).normalize("README"), "README.");
    /// ```
    pub fn normalize(&self, name: &str) -> String {
        let (base, chain) = split_name(name);
        let transliterated = transliterate(base);
        let base = sanitize(&transliterated);

        match chain {
            Some(chain) => format!("{}.{}", base, chain),
            None if self.trailing_dot => format!("{}.", base),
            None => base.into_owned(),
        }
    }
}

/// Normalizes a file name with the default [`Transliterator`].
pub fn normalize(name: &str) -> String {
    Transliterator::default().normalize(name)
}

/// Splits a name at its first `.` into base and extension chain.
///
/// ```
/// use sortdir::transliterate::split_name;
///
/// assert_eq!(split_name("data.tar.gz"), ("data", Some("tar.gz")));
/// assert_eq!(split_name("Makefile"), ("Makefile", None));
/// ```
pub fn split_name(name: &str) -> (&str, Option<&str>) {
    match name.split_once('.') {
        Some((base, chain)) => (base, Some(chain)),
        None => (name, None),
    }
}

/// Replaces every Ukrainian Cyrillic letter with its Latin spelling.
///
/// Uppercase letters produce an uppercased substitution (`Щ` → `SCH`).
/// Everything else passes through unchanged.
pub fn transliterate(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match latin_for(c) {
            Some(latin) => out.push_str(&latin),
            None => out.push(c),
        }
    }
    out
}

fn latin_for(c: char) -> Option<Cow<'static, str>> {
    if let Some(index) = CYRILLIC.chars().position(|letter| letter == c) {
        return Some(Cow::Borrowed(LATIN[index]));
    }

    let mut lower = c.to_lowercase();
    let lowered = lower.next()?;
    if lowered == c || lower.next().is_some() {
        return None;
    }

    CYRILLIC
        .chars()
        .position(|letter| letter == lowered)
        .map(|index| Cow::Owned(LATIN[index].to_uppercase()))
}

fn sanitize(text: &str) -> Cow<'_, str> {
    NON_WORD.replace_all(text, "_")
}
