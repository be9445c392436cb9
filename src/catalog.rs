//! Article catalog loading.
//!
//! The catalog is a JSON array (or JSONL) of article records using the
//! journal's field names. Unlike the roster, a catalog that cannot be read
//! or parsed is fatal for the run.

use std::fmt;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::authors::{to_raw_authors, RawAuthorInput};
use crate::normalize::generate_slug;
use crate::style::Locale;

/// Errors that can occur when loading the catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid JSONL at line {line}: {message}")]
    JsonlError { line: usize, message: String },

    #[error("Catalog must be a JSON array of articles")]
    NotAnArray,
}

/// A catalog field that may be written as a number or a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Integer(n) => write!(f, "{}", n),
            Scalar::Float(n) => write!(f, "{}", n),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

/// Reads `null` the same as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn scalar_text(value: &Option<Scalar>) -> String {
    value.as_ref().map(Scalar::to_string).unwrap_or_default()
}

/// One article record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Article {
    #[serde(rename = "titulo", default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(rename = "tituloEnglish", default)]
    pub title_en: Option<String>,
    #[serde(rename = "fecha", default)]
    pub date: Option<String>,
    #[serde(rename = "autores", default)]
    pub authors: Option<Value>,
    #[serde(rename = "authorIds", default, deserialize_with = "null_as_default")]
    pub author_ids: Vec<Value>,
    #[serde(rename = "numeroArticulo", default)]
    pub sequence: Option<Scalar>,
    #[serde(rename = "volumen", default)]
    pub volume: Option<Scalar>,
    #[serde(rename = "numero", default)]
    pub issue: Option<Scalar>,
    #[serde(rename = "primeraPagina", default)]
    pub first_page: Option<Scalar>,
    #[serde(rename = "ultimaPagina", default)]
    pub last_page: Option<Scalar>,
}

impl Article {
    /// The byline as raw author inputs, in order.
    pub fn raw_authors(&self) -> Vec<RawAuthorInput> {
        to_raw_authors(self.authors.as_ref())
    }

    /// Roster uid recorded for the author at `position`, if any.
    pub fn author_id(&self, position: usize) -> Option<String> {
        match self.author_ids.get(position)? {
            Value::String(id) if !id.is_empty() => Some(id.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Year of `fecha`, accepting a plain date, a timestamp or a bare year.
    pub fn publication_year(&self) -> Option<i32> {
        let date = self.date.as_deref()?.trim();
        if let Ok(d) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
            return Some(d.year());
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
            return Some(dt.year());
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S") {
            return Some(dt.year());
        }
        if date.len() == 4 {
            return date.parse().ok();
        }
        None
    }

    pub fn year_text(&self) -> String {
        self.publication_year()
            .map(|y| y.to_string())
            .unwrap_or_default()
    }

    pub fn sequence_text(&self) -> String {
        scalar_text(&self.sequence)
    }

    pub fn volume_text(&self) -> String {
        scalar_text(&self.volume)
    }

    pub fn issue_text(&self) -> String {
        scalar_text(&self.issue)
    }

    pub fn first_page_text(&self) -> String {
        scalar_text(&self.first_page)
    }

    pub fn last_page_text(&self) -> String {
        scalar_text(&self.last_page)
    }

    /// `<title slug>-<sequence number>`, used in article URLs.
    pub fn article_slug(&self) -> String {
        format!("{}-{}", generate_slug(&self.title), self.sequence_text())
    }

    /// Title in `locale`, falling back to the other language.
    pub fn title_for(&self, locale: Locale) -> &str {
        let es = Some(self.title.as_str()).filter(|t| !t.trim().is_empty());
        let en = self.title_en.as_deref().filter(|t| !t.trim().is_empty());
        let preferred = match locale {
            Locale::Es => es.or(en),
            Locale::En => en.or(es),
        };
        preferred.unwrap_or("")
    }
}

/// Loads the article catalog from a JSON array or JSONL file.
pub fn load_catalog(path: &Path) -> Result<Vec<Article>, CatalogError> {
    let content = fs::read_to_string(path)?;
    parse_catalog(&content)
}

/// Parses catalog content (JSON array or JSONL).
pub fn parse_catalog(content: &str) -> Result<Vec<Article>, CatalogError> {
    let trimmed = content.trim();

    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    if trimmed.starts_with('[') {
        return Ok(serde_json::from_str(trimmed)?);
    }
    // a single object spread over several lines is not JSONL
    if trimmed.lines().count() > 1 && serde_json::from_str::<Value>(trimmed).is_ok() {
        return Err(CatalogError::NotAnArray);
    }

    let mut articles = Vec::new();
    for (line_num, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let article = serde_json::from_str::<Article>(line).map_err(|e| CatalogError::JsonlError {
            line: line_num + 1,
            message: e.to_string(),
        })?;
        articles.push(article);
    }

    Ok(articles)
}
