//! Text normalization shared by catalog search, facets and tag matching.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Fold a string for comparison: strip diacritics and lower-case.
///
/// Decomposes to NFD and drops combining marks, so `"Próximos"` and
/// `"proximos"` compare equal.
///
/// ```
/// use foxsports_core::normalize_text;
///
/// assert_eq!(normalize_text("José"), "jose");
/// assert_eq!(normalize_text("PRÓXIMOS"), "proximos");
/// ```
#[must_use]
pub fn normalize_text(value: &str) -> String {
    value
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}
