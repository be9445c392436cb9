//! Journal configuration.
//!
//! Read from an optional TOML file. Every key has a default, so an empty
//! file (or no file at all) describes the journal the tool was written for.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading the configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Journal metadata used in citations, plus where to find the roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalConfig {
    /// Journal title as printed in citations
    #[serde(default = "default_journal_name")]
    pub journal_name: String,

    #[serde(default = "default_issn")]
    pub issn: String,

    /// Site root, without trailing slash
    #[serde(default = "default_domain")]
    pub domain: String,

    /// Roster location (URL or file); defaults to `<domain>/team/Team.json`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roster_url: Option<String>,

    #[serde(default = "default_roster_timeout_secs")]
    pub roster_timeout_secs: u64,
}

fn default_journal_name() -> String {
    "Revista Nacional de las Ciencias para Estudiantes".to_string()
}

fn default_issn() -> String {
    "3087-2839".to_string()
}

fn default_domain() -> String {
    "https://www.revistacienciasestudiantes.com".to_string()
}

fn default_roster_timeout_secs() -> u64 {
    30
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            journal_name: default_journal_name(),
            issn: default_issn(),
            domain: default_domain(),
            roster_url: None,
            roster_timeout_secs: default_roster_timeout_secs(),
        }
    }
}

impl JournalConfig {
    /// Loads the configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Loads `path` if given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn roster_location(&self) -> String {
        self.roster_url
            .clone()
            .unwrap_or_else(|| format!("{}/team/Team.json", self.domain.trim_end_matches('/')))
    }

    pub fn roster_timeout(&self) -> Duration {
        Duration::from_secs(self.roster_timeout_secs)
    }

    /// Public URL of the Spanish article page for `article_slug`.
    pub fn article_url(&self, article_slug: &str) -> String {
        format!(
            "{}/articles/article-{}.html",
            self.domain.trim_end_matches('/'),
            article_slug
        )
    }
}
