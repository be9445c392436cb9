//! Name and title normalization.
//!
//! Produces the accent-free keys used to compare author names and the
//! hyphenated slugs used in article URLs.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

static NON_SLUG_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("slug separator pattern is valid"));

/// Normalizes a name into a comparison key.
///
/// The text is lowercased, decomposed (NFD) so accents become separate
/// combining marks, and everything outside `[a-z0-9]` is dropped.
///
/// # Examples
///
/// ```
/// use byline::normalize::normalize;
///
/// assert_eq!(normalize("José Pérez-Núñez"), "josepereznunez");
/// assert_eq!(normalize(""), "");
/// ```
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// Removes a trailing run of ASCII digits.
///
/// Roster entries for contributors who share a name carry a numeric
/// suffix ("Smith2"); this undoes it.
pub fn strip_trailing_digits(key: &str) -> &str {
    key.trim_end_matches(|c: char| c.is_ascii_digit())
}

/// Generates a URL slug from a title.
///
/// Lowercases, strips accents, collapses every run of characters outside
/// `[a-z0-9]` into a single hyphen and trims hyphens from both ends.
///
/// # Examples
///
/// ```
/// use byline::normalize::generate_slug;
///
/// assert_eq!(generate_slug("Análisis de Datos Climáticos"), "analisis-de-datos-climaticos");
/// ```
pub fn generate_slug(text: &str) -> String {
    let folded: String = text
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();

    NON_SLUG_RUN
        .replace_all(&folded, "-")
        .trim_matches('-')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- Tests for normalize ---

    #[test]
    fn test_normalize_strips_accents_and_case() {
        assert_eq!(normalize("Ana García"), "anagarcia");
        assert_eq!(normalize("ÉMILE Zola"), "emilezola");
    }

    #[test]
    fn test_normalize_drops_punctuation_and_spaces() {
        // Given: a name with hyphens, apostrophes and dots
        let name = "María-José O'Neil Jr.";

        // When: we normalize it
        let key = normalize(name);

        // Then: only ascii letters and digits survive
        assert_eq!(key, "mariajoseoneiljr");
    }

    #[test]
    fn test_normalize_keeps_digits() {
        assert_eq!(normalize("Juan Pérez2"), "juanperez2");
    }

    #[test]
    fn test_normalize_empty_and_symbol_only() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("  --- !!"), "");
    }

    #[test]
    fn test_normalize_drops_letters_without_ascii_base() {
        // ø and ß have no decomposition to an ascii letter
        assert_eq!(normalize("Søren Weiß"), "srenwei");
    }

    // --- Tests for strip_trailing_digits ---

    #[test]
    fn test_strip_trailing_digits() {
        assert_eq!(strip_trailing_digits("smith2"), "smith");
        assert_eq!(strip_trailing_digits("smith123"), "smith");
        assert_eq!(strip_trailing_digits("smith"), "smith");
    }

    #[test]
    fn test_strip_trailing_digits_only_trailing() {
        assert_eq!(strip_trailing_digits("r2d2"), "r2d");
        assert_eq!(strip_trailing_digits("2024"), "");
    }

    #[test]
    fn test_strip_trailing_digits_idempotent() {
        let once = strip_trailing_digits("perez42");
        assert_eq!(strip_trailing_digits(once), once);
    }

    // --- Tests for generate_slug ---

    #[test]
    fn test_generate_slug_accented_title() {
        assert_eq!(
            generate_slug("Análisis de Datos Climáticos"),
            "analisis-de-datos-climaticos"
        );
    }

    #[test]
    fn test_generate_slug_collapses_runs_and_trims() {
        // Given: a title with punctuation runs at the edges and in the middle
        let title = "  ¿Qué es la Física Cuántica?  (Parte 2) ";

        // When: we generate the slug
        let slug = generate_slug(title);

        // Then: separators collapse to single hyphens with none at the edges
        assert_eq!(slug, "que-es-la-fisica-cuantica-parte-2");
    }

    #[test]
    fn test_generate_slug_empty() {
        assert_eq!(generate_slug(""), "");
        assert_eq!(generate_slug("???"), "");
    }
}
