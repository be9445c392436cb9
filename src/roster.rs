//! Contributor roster loading and lookup index.
//!
//! The roster is fetched once per run, either over HTTP or from a local
//! file (JSON array or JSONL), and indexed into read-only lookup tables.
//! If it cannot be loaded, the run carries on with an empty index and every
//! author renders unresolved.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::catalog::null_as_default;
use crate::normalize::normalize;

/// Errors that can occur when loading the roster.
#[derive(Error, Debug)]
pub enum RosterError {
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid JSONL at line {line}: {message}")]
    JsonlError { line: usize, message: String },

    #[error("Roster must be a JSON array")]
    NotAnArray,

    #[error("HTTP {status} fetching {url}")]
    Status { status: u16, url: String },

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// A known contributor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterMember {
    #[serde(default, deserialize_with = "null_as_default")]
    pub uid: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub display_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orcid: Option<String>,
    #[serde(default, rename = "publicEmail", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl RosterMember {
    /// `firstName lastName`, trimmed. Empty when neither is set.
    pub fn full_name(&self) -> String {
        format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or(""),
            self.last_name.as_deref().unwrap_or("")
        )
        .trim()
        .to_string()
    }
}

/// One key in the name table, with its normalized form precomputed.
#[derive(Debug, Clone)]
pub struct NameEntry {
    pub key: String,
    pub normalized: String,
    member: usize,
    verbatim: bool,
}

/// Read-only lookup tables over the roster.
///
/// Every table is first-wins: when two members produce the same key, the
/// one that comes first in the roster keeps it. The name table holds each
/// member's verbatim display name, its normalized form and its
/// `firstName lastName` join, and remembers insertion order so that the
/// heuristic scans in the resolver are deterministic. A verbatim display
/// name always beats a normalized or derived key, even one claimed by an
/// earlier member; the entry keeps its original position in the scan order.
#[derive(Debug, Clone, Default)]
pub struct RosterIndex {
    members: Vec<RosterMember>,
    by_id: HashMap<String, usize>,
    id_order: Vec<usize>,
    by_slug: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
    names: Vec<NameEntry>,
}

impl RosterIndex {
    /// Builds the index from the roster in collection order.
    pub fn build(members: Vec<RosterMember>) -> Self {
        let mut index = RosterIndex {
            members,
            ..Default::default()
        };

        for idx in 0..index.members.len() {
            let member = &index.members[idx];
            let uid = member.uid.clone();
            let slug = member.slug.clone();
            let display_name = member.display_name.clone();
            let full_name = member.full_name();

            if !uid.is_empty() && !index.by_id.contains_key(&uid) {
                index.by_id.insert(uid, idx);
                index.id_order.push(idx);
            }
            if !slug.is_empty() {
                index.by_slug.entry(slug).or_insert(idx);
            }

            let normalized = normalize(&display_name);
            index.insert_name(display_name, idx, true);
            index.insert_name(normalized, idx, false);
            index.insert_name(full_name, idx, false);
        }

        index
    }

    /// An index with no members. Every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    fn insert_name(&mut self, key: String, member: usize, verbatim: bool) {
        if key.is_empty() {
            return;
        }
        if let Some(&existing) = self.by_name.get(&key) {
            let entry = &mut self.names[existing];
            if verbatim && !entry.verbatim {
                entry.member = member;
                entry.verbatim = true;
            }
            return;
        }
        self.by_name.insert(key.clone(), self.names.len());
        self.names.push(NameEntry {
            normalized: normalize(&key),
            key,
            member,
            verbatim,
        });
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> &[RosterMember] {
        &self.members
    }

    pub fn by_id(&self, uid: &str) -> Option<&RosterMember> {
        self.by_id.get(uid).map(|&idx| &self.members[idx])
    }

    pub fn by_slug(&self, slug: &str) -> Option<&RosterMember> {
        self.by_slug.get(slug).map(|&idx| &self.members[idx])
    }

    /// Looks up a key in the name table verbatim.
    pub fn by_exact_name(&self, name: &str) -> Option<&RosterMember> {
        self.by_name
            .get(name)
            .map(|&entry| &self.members[self.names[entry].member])
    }

    /// Name table entries in insertion order.
    pub fn name_entries(&self) -> impl Iterator<Item = (&NameEntry, &RosterMember)> {
        self.names
            .iter()
            .map(move |entry| (entry, &self.members[entry.member]))
    }

    /// Members reachable by uid, in insertion order.
    pub fn members_by_id(&self) -> impl Iterator<Item = &RosterMember> {
        self.id_order.iter().map(move |&idx| &self.members[idx])
    }

    /// Number of distinct name keys.
    pub fn name_variants(&self) -> usize {
        self.names.len()
    }

    /// Loads the roster from `source` and indexes it.
    ///
    /// Never fails: a roster that cannot be loaded is logged as a warning
    /// and replaced by an empty index.
    pub async fn load_or_empty(source: &RosterSource, timeout: Duration) -> Self {
        let members = match source {
            RosterSource::Disabled => {
                info!("roster disabled, authors will not be linked");
                return Self::empty();
            }
            RosterSource::Url(url) => {
                info!("loading roster from {}", url);
                fetch_roster(url, timeout).await
            }
            RosterSource::File(path) => {
                info!("loading roster from {}", path.display());
                load_roster_file(path)
            }
        };

        match members {
            Ok(members) => {
                let index = Self::build(members);
                info!(
                    "{} roster members indexed by uid, {} name variants",
                    index.id_order.len(),
                    index.name_variants()
                );
                index
            }
            Err(e) => {
                warn!(
                    "roster unavailable ({}), authors will not be linked: {}",
                    source, e
                );
                Self::empty()
            }
        }
    }
}

/// Where the roster comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterSource {
    Url(String),
    File(PathBuf),
    Disabled,
}

impl RosterSource {
    /// Treats `http://` and `https://` locations as URLs and anything else
    /// as a file path.
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            RosterSource::Url(location.to_string())
        } else {
            RosterSource::File(PathBuf::from(location))
        }
    }
}

impl std::fmt::Display for RosterSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterSource::Url(url) => write!(f, "{}", url),
            RosterSource::File(path) => write!(f, "{}", path.display()),
            RosterSource::Disabled => write!(f, "disabled"),
        }
    }
}

/// Fetches the roster over HTTP. The body must be a JSON array.
pub async fn fetch_roster(url: &str, timeout: Duration) -> Result<Vec<RosterMember>, RosterError> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("byline/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(RosterError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let value: Value = response.json().await?;
    match value {
        Value::Array(items) => Ok(members_from_values(items)),
        _ => Err(RosterError::NotAnArray),
    }
}

/// Loads the roster from a JSON array or JSONL file.
pub fn load_roster_file(path: &Path) -> Result<Vec<RosterMember>, RosterError> {
    let content = fs::read_to_string(path)?;
    parse_roster(&content)
}

/// Parses roster content.
///
/// Supports two input formats:
/// - JSON array: `[{"uid": "a", ...}, {"uid": "b", ...}]`
/// - JSONL: one member object per line
fn parse_roster(content: &str) -> Result<Vec<RosterMember>, RosterError> {
    let trimmed = content.trim();

    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    if trimmed.starts_with('[') {
        let value: Value = serde_json::from_str(trimmed)?;
        return match value {
            Value::Array(items) => Ok(members_from_values(items)),
            _ => Err(RosterError::NotAnArray),
        };
    }

    let mut items = Vec::new();
    for (line_num, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let value = serde_json::from_str::<Value>(line).map_err(|e| RosterError::JsonlError {
            line: line_num + 1,
            message: e.to_string(),
        })?;
        items.push(value);
    }

    Ok(members_from_values(items))
}

/// Keeps the well-formed member objects, skipping the rest with a warning.
fn members_from_values(items: Vec<Value>) -> Vec<RosterMember> {
    items
        .into_iter()
        .enumerate()
        .filter_map(|(position, item)| {
            if !item.is_object() {
                warn!("skipping roster entry {}: not an object", position);
                return None;
            }
            match serde_json::from_value::<RosterMember>(item) {
                Ok(member) => Some(member),
                Err(e) => {
                    warn!("skipping roster entry {}: {}", position, e);
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn member(uid: &str, display_name: &str, slug: &str) -> RosterMember {
        RosterMember {
            uid: uid.to_string(),
            display_name: display_name.to_string(),
            slug: slug.to_string(),
            ..Default::default()
        }
    }

    fn create_temp_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    // --- Tests for RosterIndex::build ---

    #[test]
    fn test_build_indexes_by_id_slug_and_name() {
        // Given: a roster with one fully populated member
        let mut ana = member("u1", "Ana García", "ana-garcia");
        ana.first_name = Some("Ana María".to_string());
        ana.last_name = Some("García".to_string());

        // When: we build the index
        let index = RosterIndex::build(vec![ana]);

        // Then: every table points at her
        assert_eq!(index.by_id("u1").unwrap().slug, "ana-garcia");
        assert_eq!(index.by_slug("ana-garcia").unwrap().uid, "u1");
        assert_eq!(index.by_exact_name("Ana García").unwrap().uid, "u1");
        assert_eq!(index.by_exact_name("anagarcia").unwrap().uid, "u1");
        assert_eq!(index.by_exact_name("Ana María García").unwrap().uid, "u1");
        assert_eq!(index.name_variants(), 3);
    }

    #[test]
    fn test_build_first_wins_on_duplicate_keys() {
        // Given: two members sharing uid, slug and display name
        let first = member("dup", "Juan Pérez", "juan-perez");
        let mut second = member("dup", "Juan Pérez", "juan-perez");
        second.orcid = Some("0000-0002".to_string());

        // When: we build the index
        let index = RosterIndex::build(vec![first, second]);

        // Then: the first member in collection order wins every lookup
        assert_eq!(index.by_id("dup").unwrap().orcid, None);
        assert_eq!(index.by_slug("juan-perez").unwrap().orcid, None);
        assert_eq!(index.by_exact_name("Juan Pérez").unwrap().orcid, None);
        assert_eq!(index.members_by_id().count(), 1);
    }

    #[test]
    fn test_build_display_name_not_overwritten_by_later_full_name() {
        // Given: a later member whose first+last equals an earlier display name
        let early = member("u1", "Luis Soto", "luis-soto-1");
        let mut later = member("u2", "L. Soto", "luis-soto-2");
        later.first_name = Some("Luis".to_string());
        later.last_name = Some("Soto".to_string());

        // When: we build the index
        let index = RosterIndex::build(vec![early, later]);

        // Then: the verbatim entry keeps pointing at the earlier member
        assert_eq!(index.by_exact_name("Luis Soto").unwrap().uid, "u1");
        assert_eq!(index.by_exact_name("L. Soto").unwrap().uid, "u2");
    }

    #[test]
    fn test_build_later_display_name_beats_earlier_derived_key() {
        // Given: an earlier member whose first+last equals a later display name
        let mut early = member("u1", "Dr. Luis Soto", "luis-soto-1");
        early.first_name = Some("Luis".to_string());
        early.last_name = Some("Soto".to_string());
        let later = member("u2", "Luis Soto", "luis-soto-2");

        // When: we build the index
        let index = RosterIndex::build(vec![early, later]);

        // Then: the verbatim display name belongs to u2
        assert_eq!(index.by_exact_name("Luis Soto").unwrap().uid, "u2");
        assert_eq!(index.by_exact_name("Dr. Luis Soto").unwrap().uid, "u1");
        assert_eq!(index.by_exact_name("luissoto").unwrap().uid, "u2");

        // And: the taken-over entry keeps its place in the scan order
        let keys: Vec<(&str, &str)> = index
            .name_entries()
            .map(|(e, m)| (e.key.as_str(), m.uid.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("Dr. Luis Soto", "u1"),
                ("drluissoto", "u1"),
                ("Luis Soto", "u2"),
                ("luissoto", "u2"),
            ]
        );
    }

    #[test]
    fn test_build_derived_key_never_takes_over_display_name() {
        // Given: a later member whose normalized name equals an earlier display name
        let early = member("u1", "anagarcia", "a1");
        let later = member("u2", "Ana García", "a2");

        // When: we build the index
        let index = RosterIndex::build(vec![early, later]);

        // Then: the earlier verbatim entry stands
        assert_eq!(index.by_exact_name("anagarcia").unwrap().uid, "u1");
        assert_eq!(index.by_exact_name("Ana García").unwrap().uid, "u2");
    }

    #[test]
    fn test_build_skips_empty_keys() {
        let index = RosterIndex::build(vec![member("", "", "")]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.members_by_id().count(), 0);
        assert_eq!(index.name_variants(), 0);
        assert!(index.by_slug("").is_none());
    }

    #[test]
    fn test_name_entries_preserve_insertion_order() {
        let index = RosterIndex::build(vec![
            member("u1", "Bea Ruiz", "bea"),
            member("u2", "Ana Lee", "ana"),
        ]);
        let keys: Vec<&str> = index.name_entries().map(|(e, _)| e.key.as_str()).collect();
        assert_eq!(keys, vec!["Bea Ruiz", "bearuiz", "Ana Lee", "analee"]);
    }

    #[test]
    fn test_empty_index_misses_everything() {
        let index = RosterIndex::empty();
        assert!(index.is_empty());
        assert!(index.by_id("u1").is_none());
        assert!(index.by_exact_name("Ana").is_none());
        assert_eq!(index.name_entries().count(), 0);
    }

    // --- Tests for roster parsing ---

    #[test]
    fn test_load_roster_file_json_array() {
        // Given: a roster file using the published field names
        let file = create_temp_file(
            r#"[{"uid": "u1", "displayName": "Ana García", "slug": "ana-garcia",
                 "publicEmail": "ana@example.org", "orcid": "0000-0001"}]"#,
        );

        // When: we load it
        let members = load_roster_file(file.path()).unwrap();

        // Then: publicEmail maps to email
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].email.as_deref(), Some("ana@example.org"));
        assert_eq!(members[0].orcid.as_deref(), Some("0000-0001"));
    }

    #[test]
    fn test_load_roster_file_jsonl() {
        let file = create_temp_file(
            "{\"uid\": \"u1\", \"displayName\": \"Ana\"}\n\n{\"uid\": \"u2\", \"displayName\": \"Luis\"}\n",
        );
        let members = load_roster_file(file.path()).unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members[1].uid, "u2");
    }

    #[test]
    fn test_load_roster_file_jsonl_error_with_line_number() {
        let file = create_temp_file("{\"uid\": \"u1\"}\nnot json\n");
        match load_roster_file(file.path()).unwrap_err() {
            RosterError::JsonlError { line, .. } => assert_eq!(line, 2),
            other => panic!("Expected JsonlError, got {:?}", other),
        }
    }

    #[test]
    fn test_load_roster_file_missing() {
        let err = load_roster_file(Path::new("/nonexistent/Team.json")).unwrap_err();
        assert!(matches!(err, RosterError::IoError(_)));
    }

    #[test]
    fn test_parse_roster_skips_bad_entries() {
        // Given: an array with a string, a malformed object and one good member
        let content = r#"["nope", {"uid": 5}, {"uid": "u1", "displayName": "Ana"}]"#;

        // When: we parse it
        let members = parse_roster(content).unwrap();

        // Then: only the well-formed member survives
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].uid, "u1");
    }

    #[test]
    fn test_parse_roster_null_fields_keep_member() {
        // Given: members with null slug, display name and name parts
        let content = r#"[
            {"uid": "u1", "displayName": "Ana García", "slug": null, "orcid": null},
            {"uid": "u2", "displayName": null, "firstName": "Luis", "lastName": "Soto", "slug": "luis-soto"}
        ]"#;

        // When: we parse and index the roster
        let index = RosterIndex::build(parse_roster(content).unwrap());

        // Then: both members stay reachable by uid and name
        assert_eq!(index.len(), 2);
        assert_eq!(index.by_id("u1").unwrap().slug, "");
        assert_eq!(index.by_exact_name("Ana García").unwrap().uid, "u1");
        assert_eq!(index.by_exact_name("Luis Soto").unwrap().uid, "u2");
        assert_eq!(index.by_slug("luis-soto").unwrap().uid, "u2");
    }

    #[test]
    fn test_parse_roster_empty() {
        assert!(parse_roster("   ").unwrap().is_empty());
    }

    // --- Tests for RosterSource ---

    #[test]
    fn test_roster_source_parse() {
        assert_eq!(
            RosterSource::parse("https://example.org/team/Team.json"),
            RosterSource::Url("https://example.org/team/Team.json".to_string())
        );
        assert_eq!(
            RosterSource::parse("team.json"),
            RosterSource::File(PathBuf::from("team.json"))
        );
    }

    // --- Tests for load_or_empty ---

    #[tokio::test]
    async fn test_load_or_empty_unreadable_file_degrades() {
        let source = RosterSource::File(PathBuf::from("/nonexistent/Team.json"));
        let index = RosterIndex::load_or_empty(&source, Duration::from_secs(1)).await;
        assert!(index.is_empty());
    }

    #[tokio::test]
    async fn test_load_or_empty_unreachable_url_degrades() {
        // Given: a URL nothing listens on
        let source = RosterSource::Url("http://127.0.0.1:9/team/Team.json".to_string());

        // When: we load the roster
        let index = RosterIndex::load_or_empty(&source, Duration::from_secs(2)).await;

        // Then: we get an empty index instead of an error
        assert!(index.is_empty());
    }

    #[tokio::test]
    async fn test_load_or_empty_file() {
        let file = create_temp_file(r#"[{"uid": "u1", "displayName": "Ana"}]"#);
        let source = RosterSource::File(file.path().to_path_buf());
        let index = RosterIndex::load_or_empty(&source, Duration::from_secs(1)).await;
        assert_eq!(index.by_id("u1").unwrap().display_name, "Ana");
    }

    // --- Tests for fetch_roster ---

    /// Serves one HTTP response on a local port and returns its URL.
    fn serve_once(status_line: &'static str, body: &'static str) -> String {
        use std::io::{BufRead, BufReader};
        use std::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/team/Team.json", listener.local_addr().unwrap());
        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap() > 0 && line != "\r\n" {
                line.clear();
            }
            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
        });
        url
    }

    #[tokio::test]
    async fn test_fetch_roster_reads_json_array() {
        // Given: a server returning a two-member roster
        let url = serve_once(
            "HTTP/1.1 200 OK",
            r#"[{"uid": "u1", "displayName": "Ana García", "slug": null}, "junk"]"#,
        );

        // When: we fetch it
        let members = fetch_roster(&url, Duration::from_secs(5)).await.unwrap();

        // Then: the object entry is kept and the junk entry skipped
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].uid, "u1");
    }

    #[tokio::test]
    async fn test_fetch_roster_object_body_is_not_an_array() {
        let url = serve_once("HTTP/1.1 200 OK", r#"{"uid": "u1"}"#);
        let err = fetch_roster(&url, Duration::from_secs(5)).await.unwrap_err();
        assert!(matches!(err, RosterError::NotAnArray));
    }

    #[tokio::test]
    async fn test_fetch_roster_error_status() {
        let url = serve_once("HTTP/1.1 404 Not Found", "");
        match fetch_roster(&url, Duration::from_secs(5)).await.unwrap_err() {
            RosterError::Status { status, .. } => assert_eq!(status, 404),
            other => panic!("Expected Status, got {:?}", other),
        }
    }
}
