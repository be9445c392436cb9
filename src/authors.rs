//! Author byline input adapter.
//!
//! Article records carry their authors in one of three shapes: a single
//! string (possibly `;`-delimited), a list of strings, or a list of
//! partial author objects. Everything downstream works on the uniform
//! [`RawAuthorInput`] sequence produced here.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An author as written on an article, before any roster resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RawAuthorInput {
    /// A bare name string.
    StringName(String),
    /// A partial author record.
    Structured(StructuredAuthor),
}

/// Partial author record as found in the article catalog.
///
/// Every field is optional; an empty string counts as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredAuthor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orcid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_email: Option<String>,
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.trim().is_empty())
}

impl RawAuthorInput {
    /// The name to show for this author, or an empty string when no field
    /// carries one.
    pub fn display_name(&self) -> String {
        match self {
            RawAuthorInput::StringName(text) => text.clone(),
            RawAuthorInput::Structured(author) => {
                if let Some(name) = non_empty(&author.name) {
                    return name.to_string();
                }
                format!(
                    "{} {}",
                    author.first_name.as_deref().unwrap_or(""),
                    author.last_name.as_deref().unwrap_or("")
                )
                .trim()
                .to_string()
            }
        }
    }

    pub fn slug(&self) -> Option<&str> {
        match self {
            RawAuthorInput::StringName(_) => None,
            RawAuthorInput::Structured(author) => non_empty(&author.slug),
        }
    }

    pub fn first_name(&self) -> Option<&str> {
        match self {
            RawAuthorInput::StringName(_) => None,
            RawAuthorInput::Structured(author) => non_empty(&author.first_name),
        }
    }

    pub fn last_name(&self) -> Option<&str> {
        match self {
            RawAuthorInput::StringName(_) => None,
            RawAuthorInput::Structured(author) => non_empty(&author.last_name),
        }
    }

    pub fn orcid(&self) -> Option<&str> {
        match self {
            RawAuthorInput::StringName(_) => None,
            RawAuthorInput::Structured(author) => non_empty(&author.orcid),
        }
    }

    /// `email`, falling back to `publicEmail`.
    pub fn email(&self) -> Option<&str> {
        match self {
            RawAuthorInput::StringName(_) => None,
            RawAuthorInput::Structured(author) => {
                non_empty(&author.email).or_else(|| non_empty(&author.public_email))
            }
        }
    }
}

/// Returns the display name of an author (see [`RawAuthorInput::display_name`]).
pub fn display_name_of(author: &RawAuthorInput) -> String {
    author.display_name()
}

/// Converts an article's author field into an ordered list of raw authors.
///
/// - A string is split on `;`; segments are trimmed and empty ones dropped.
/// - In a list, strings become [`RawAuthorInput::StringName`] and objects
///   become [`RawAuthorInput::Structured`]. Any other element becomes an
///   empty structured author so that byline positions stay aligned with
///   the article's `authorIds`.
/// - A missing field, or any other JSON type, yields an empty list.
pub fn to_raw_authors(field: Option<&Value>) -> Vec<RawAuthorInput> {
    match field {
        Some(Value::String(text)) => split_author_string(text),
        Some(Value::Array(items)) => items.iter().map(raw_author_from_value).collect(),
        _ => Vec::new(),
    }
}

fn split_author_string(text: &str) -> Vec<RawAuthorInput> {
    text.split(';')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| RawAuthorInput::StringName(segment.to_string()))
        .collect()
}

fn raw_author_from_value(value: &Value) -> RawAuthorInput {
    match value {
        Value::String(text) => RawAuthorInput::StringName(text.clone()),
        Value::Object(_) => match StructuredAuthor::deserialize(value) {
            Ok(author) => RawAuthorInput::Structured(author),
            Err(e) => {
                tracing::debug!("ignoring malformed author entry {}: {}", value, e);
                RawAuthorInput::Structured(StructuredAuthor::default())
            }
        },
        _ => RawAuthorInput::Structured(StructuredAuthor::default()),
    }
}
