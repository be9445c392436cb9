//! Citation styles and locales.
//!
//! Lists the supported citation styles and holds the per-style templates
//! that assemble a full reference from its already-formatted parts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Output language of a rendered citation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    Es,
    En,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::Es, Locale::En];

    /// Word placed before the last author in a list.
    pub fn connector(&self) -> &'static str {
        match self {
            Locale::Es => "y",
            Locale::En => "and",
        }
    }

    /// Byline shown when an article has no displayable author.
    pub fn unknown_author(&self) -> &'static str {
        match self {
            Locale::Es => "Autor desconocido",
            Locale::En => "Unknown author",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Locale::Es => "es",
            Locale::En => "en",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "es" => Ok(Locale::Es),
            "en" => Ok(Locale::En),
            other => Err(format!("unsupported locale '{}'", other)),
        }
    }
}

/// A supported citation style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CitationStyle {
    Apa,
    Mla,
    Chicago,
}

/// Single source of truth for builtin styles: (name, style, description).
const BUILTIN_STYLES: &[(&str, CitationStyle, &str)] = &[
    ("apa", CitationStyle::Apa, "APA: Surname, I., & Surname, I. (Year)."),
    ("mla", CitationStyle::Mla, "MLA: Surname, Given, et al. \"Title.\""),
    ("chicago", CitationStyle::Chicago, "Chicago: Surname, Given. \"Title.\" Journal Vol"),
];

/// Returns a builtin style by name.
pub fn builtin_style(name: &str) -> Option<CitationStyle> {
    BUILTIN_STYLES
        .iter()
        .find(|(n, _, _)| *n == name)
        .map(|(_, style, _)| *style)
}

/// Returns the list of available builtin style names.
pub fn builtin_style_names() -> Vec<&'static str> {
    BUILTIN_STYLES.iter().map(|(n, _, _)| *n).collect()
}

/// Returns `(name, description)` for every builtin style.
pub fn builtin_style_descriptions() -> Vec<(&'static str, &'static str)> {
    BUILTIN_STYLES.iter().map(|(n, _, d)| (*n, *d)).collect()
}

/// Formatted pieces of one reference.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceParts<'a> {
    /// Author list, already joined in the style's convention.
    pub authors: &'a str,
    pub title: &'a str,
    pub journal: &'a str,
    pub year: &'a str,
    pub volume: &'a str,
    pub number: &'a str,
    pub first_page: &'a str,
    pub last_page: &'a str,
}

impl CitationStyle {
    pub fn name(&self) -> &'static str {
        match self {
            CitationStyle::Apa => "apa",
            CitationStyle::Mla => "mla",
            CitationStyle::Chicago => "chicago",
        }
    }

    /// Assembles a plain-text reference.
    pub fn render(&self, parts: &ReferenceParts<'_>) -> String {
        let ReferenceParts {
            authors,
            title,
            journal,
            year,
            volume,
            number,
            first_page,
            last_page,
        } = parts;

        match self {
            CitationStyle::Apa => format!(
                "{authors}. ({year}). {title}. {journal}, {volume}({number}), {first_page}-{last_page}."
            ),
            CitationStyle::Mla => format!(
                "{authors}. \"{title}.\" {journal}, vol. {volume}, no. {number}, {year}, pp. {first_page}-{last_page}."
            ),
            CitationStyle::Chicago => format!(
                "{authors}. \"{title}.\" {journal} {volume}, no. {number} ({year}): {first_page}-{last_page}."
            ),
        }
    }
}
