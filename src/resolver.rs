//! Author identity resolution.
//!
//! Matches a byline author against the roster by trying a fixed sequence
//! of strategies, most authoritative first. The first strategy that finds
//! a member wins, and the outcome records which one it was.
//!
//! The last three strategies are heuristics. The prefix and substring
//! checks can match unrelated short names (a key "ana" is contained in
//! "anabel"); they only run after every exact strategy has missed.

use serde::Serialize;
use tracing::{debug, trace};

use crate::authors::RawAuthorInput;
use crate::normalize::{normalize, strip_trailing_digits};
use crate::roster::{RosterIndex, RosterMember};

/// Which strategy produced a match, in cascade order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchStrategy {
    /// The article's author id is a roster uid.
    ExternalId,
    /// The display name is a key in the name table.
    ExactName,
    /// The author's slug is a roster slug.
    Slug,
    /// The display name minus its numeric suffix is a prefix of a name key,
    /// or the other way round.
    DisambiguationPrefix,
    /// Normalized keys are equal, equal without numeric suffix, or one
    /// contains the other.
    NormalizedName,
    /// Same last name and same first initial.
    SurnameInitial,
}

impl MatchStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStrategy::ExternalId => "external-id",
            MatchStrategy::ExactName => "exact-name",
            MatchStrategy::Slug => "slug",
            MatchStrategy::DisambiguationPrefix => "disambiguation-prefix",
            MatchStrategy::NormalizedName => "normalized-name",
            MatchStrategy::SurnameInitial => "surname-initial",
        }
    }
}

impl std::fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a matched roster member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedAuthor {
    pub display_name: String,
    pub uid: Option<String>,
    pub slug: Option<String>,
    pub orcid: Option<String>,
    pub email: Option<String>,
}

fn present(value: &str) -> Option<String> {
    (!value.trim().is_empty()).then(|| value.to_string())
}

impl From<&RosterMember> for ResolvedAuthor {
    fn from(member: &RosterMember) -> Self {
        ResolvedAuthor {
            display_name: member.display_name.clone(),
            uid: present(&member.uid),
            slug: present(&member.slug),
            orcid: member.orcid.as_deref().and_then(present),
            email: member.email.as_deref().and_then(present),
        }
    }
}

/// Result of running the cascade for one author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    Resolved {
        author: ResolvedAuthor,
        strategy: MatchStrategy,
    },
    Unresolved,
}

impl MatchOutcome {
    pub fn is_resolved(&self) -> bool {
        matches!(self, MatchOutcome::Resolved { .. })
    }

    pub fn author(&self) -> Option<&ResolvedAuthor> {
        match self {
            MatchOutcome::Resolved { author, .. } => Some(author),
            MatchOutcome::Unresolved => None,
        }
    }

    pub fn strategy(&self) -> Option<MatchStrategy> {
        match self {
            MatchOutcome::Resolved { strategy, .. } => Some(*strategy),
            MatchOutcome::Unresolved => None,
        }
    }
}

/// Runs the matching cascade against a roster index.
#[derive(Debug, Clone, Copy)]
pub struct MatchResolver<'a> {
    index: &'a RosterIndex,
}

impl<'a> MatchResolver<'a> {
    pub fn new(index: &'a RosterIndex) -> Self {
        Self { index }
    }

    /// Resolves `author`, using `external_id` first when it names a roster uid.
    ///
    /// An author with no display name is never matched.
    pub fn resolve(&self, author: &RawAuthorInput, external_id: Option<&str>) -> MatchOutcome {
        let display_name = author.display_name();
        if display_name.trim().is_empty() {
            return MatchOutcome::Unresolved;
        }

        let found = self
            .by_external_id(external_id)
            .map(|m| (m, MatchStrategy::ExternalId))
            .or_else(|| {
                self.index
                    .by_exact_name(&display_name)
                    .map(|m| (m, MatchStrategy::ExactName))
            })
            .or_else(|| self.by_slug(author).map(|m| (m, MatchStrategy::Slug)))
            .or_else(|| {
                self.by_disambiguation_prefix(&display_name)
                    .map(|m| (m, MatchStrategy::DisambiguationPrefix))
            })
            .or_else(|| {
                self.by_normalized_name(&display_name)
                    .map(|m| (m, MatchStrategy::NormalizedName))
            })
            .or_else(|| {
                self.by_surname_initial(author)
                    .map(|m| (m, MatchStrategy::SurnameInitial))
            });

        match found {
            Some((member, strategy)) => {
                debug!(
                    "matched '{}' -> '{}' ({})",
                    display_name, member.display_name, strategy
                );
                MatchOutcome::Resolved {
                    author: ResolvedAuthor::from(member),
                    strategy,
                }
            }
            None => {
                debug!("no roster match for '{}'", display_name);
                MatchOutcome::Unresolved
            }
        }
    }

    fn by_external_id(&self, external_id: Option<&str>) -> Option<&'a RosterMember> {
        let uid = external_id.filter(|id| !id.is_empty())?;
        let member = self.index.by_id(uid);
        if member.is_none() {
            trace!("author id '{}' is not a roster uid", uid);
        }
        member
    }

    fn by_slug(&self, author: &RawAuthorInput) -> Option<&'a RosterMember> {
        self.index.by_slug(author.slug()?)
    }

    fn by_disambiguation_prefix(&self, display_name: &str) -> Option<&'a RosterMember> {
        if !display_name.ends_with(|c: char| c.is_ascii_digit()) {
            return None;
        }
        let base = strip_trailing_digits(display_name).trim();
        if base.is_empty() {
            return None;
        }

        self.index
            .name_entries()
            .find(|(entry, _)| entry.key.starts_with(base) || base.starts_with(entry.key.as_str()))
            .map(|(_, member)| member)
    }

    fn by_normalized_name(&self, display_name: &str) -> Option<&'a RosterMember> {
        let candidate = normalize(display_name);
        if candidate.is_empty() {
            return None;
        }
        let candidate_base = strip_trailing_digits(&candidate);

        self.index
            .name_entries()
            .find(|(entry, _)| {
                let key = entry.normalized.as_str();
                if key.is_empty() {
                    return false;
                }
                let key_base = strip_trailing_digits(key);
                key == candidate
                    || (!candidate_base.is_empty() && key_base == candidate_base)
                    || key.contains(candidate.as_str())
                    || candidate.contains(key)
            })
            .map(|(_, member)| member)
    }

    fn by_surname_initial(&self, author: &RawAuthorInput) -> Option<&'a RosterMember> {
        if author.first_name().is_none() && author.last_name().is_none() {
            return None;
        }
        let last_name = author.last_name().unwrap_or("").to_lowercase();
        let initial: String = author
            .first_name()
            .unwrap_or("")
            .to_lowercase()
            .chars()
            .take(1)
            .collect();

        self.index.members_by_id().find(|member| {
            let same_surname = member
                .last_name
                .as_deref()
                .is_some_and(|l| !l.is_empty() && l.to_lowercase() == last_name);
            let same_initial = member
                .first_name
                .as_deref()
                .is_some_and(|f| !f.is_empty() && f.to_lowercase().starts_with(&initial));
            same_surname && same_initial
        })
    }
}

/// Resolves one author against `index`. See [`MatchResolver::resolve`].
pub fn resolve(
    index: &RosterIndex,
    author: &RawAuthorInput,
    external_id: Option<&str>,
) -> MatchOutcome {
    MatchResolver::new(index).resolve(author, external_id)
}
