//! Per-article processing.
//!
//! Turns each catalog article into an [`ArticleReport`]: resolved author
//! descriptors for the byline, citation strings in every locale and the
//! BibTeX export. Articles are independent of each other and the roster
//! index is only read, so nothing here can fail or abort the run.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info};

use crate::authors::RawAuthorInput;
use crate::bibtex::{bibtex_key, bibtex_record};
use crate::catalog::Article;
use crate::citation::{display_names, format_authors, join_authors_display, surname_first_form};
use crate::config::JournalConfig;
use crate::resolver::{MatchOutcome, MatchResolver, MatchStrategy};
use crate::roster::RosterIndex;
use crate::style::{CitationStyle, Locale, ReferenceParts};

/// How one byline author should be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorDescriptor {
    /// Name as written on the article
    pub display_name: String,
    pub resolved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_by: Option<MatchStrategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orcid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl AuthorDescriptor {
    /// Combines the byline entry with its match outcome. Roster values win;
    /// ORCID and email fall back to what the article itself carries.
    pub fn new(author: &RawAuthorInput, outcome: &MatchOutcome) -> Self {
        let resolved = outcome.author();
        AuthorDescriptor {
            display_name: author.display_name(),
            resolved: outcome.is_resolved(),
            matched_by: outcome.strategy(),
            profile_slug: resolved.and_then(|r| r.slug.clone()),
            uid: resolved.and_then(|r| r.uid.clone()),
            orcid: resolved
                .and_then(|r| r.orcid.clone())
                .or_else(|| author.orcid().map(str::to_string)),
            email: resolved
                .and_then(|r| r.email.clone())
                .or_else(|| author.email().map(str::to_string)),
        }
    }
}

/// Citation strings for one locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalizedCitations {
    /// On-page byline
    pub byline: String,
    pub apa: String,
    pub mla: String,
    pub chicago: String,
}

/// Everything the page renderer needs about one article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleReport {
    pub slug: String,
    pub title: String,
    pub year: Option<i32>,
    pub authors: Vec<AuthorDescriptor>,
    /// Surname-first names, one per author
    pub citation_authors: Vec<String>,
    pub citations: BTreeMap<Locale, LocalizedCitations>,
    pub bibtex_key: String,
    pub bibtex: String,
}

impl ArticleReport {
    pub fn resolved_count(&self) -> usize {
        self.authors.iter().filter(|a| a.resolved).count()
    }
}

/// Resolves every byline author, pairing position `i` with `authorIds[i]`.
///
/// Authors without a display name are left out.
pub fn describe_authors(resolver: &MatchResolver<'_>, article: &Article) -> Vec<AuthorDescriptor> {
    article
        .raw_authors()
        .iter()
        .enumerate()
        .filter(|(_, author)| !author.display_name().trim().is_empty())
        .map(|(position, author)| {
            let external_id = article.author_id(position);
            let outcome = resolver.resolve(author, external_id.as_deref());
            AuthorDescriptor::new(author, &outcome)
        })
        .collect()
}

/// Formats the three citation styles and the byline for `locale`.
pub fn format_citations(article: &Article, config: &JournalConfig, locale: Locale) -> LocalizedCitations {
    let authors = article.raw_authors();
    let year = article.year_text();
    let volume = article.volume_text();
    let number = article.issue_text();
    let first_page = article.first_page_text();
    let last_page = article.last_page_text();

    let render = |style: CitationStyle| {
        let author_list = format_authors(&authors, style, locale);
        style.render(&ReferenceParts {
            authors: &author_list,
            title: article.title_for(locale),
            journal: &config.journal_name,
            year: &year,
            volume: &volume,
            number: &number,
            first_page: &first_page,
            last_page: &last_page,
        })
    };

    LocalizedCitations {
        byline: join_authors_display(&display_names(&authors), locale),
        apa: render(CitationStyle::Apa),
        mla: render(CitationStyle::Mla),
        chicago: render(CitationStyle::Chicago),
    }
}

/// Builds the report for one article.
pub fn process_article(article: &Article, index: &RosterIndex, config: &JournalConfig) -> ArticleReport {
    let resolver = MatchResolver::new(index);
    let authors = describe_authors(&resolver, article);
    let citation_authors = display_names(&article.raw_authors())
        .iter()
        .map(|name| surname_first_form(name))
        .collect();
    let citations = Locale::ALL
        .iter()
        .map(|&locale| (locale, format_citations(article, config, locale)))
        .collect();

    let report = ArticleReport {
        slug: article.article_slug(),
        title: article.title.clone(),
        year: article.publication_year(),
        authors,
        citation_authors,
        citations,
        bibtex_key: bibtex_key(article),
        bibtex: bibtex_record(article, config),
    };
    debug!(
        "processed article '{}': {}/{} authors resolved",
        report.slug,
        report.resolved_count(),
        report.authors.len()
    );
    report
}

/// Builds reports for the whole catalog, in catalog order.
pub fn process_catalog(articles: &[Article], index: &RosterIndex, config: &JournalConfig) -> Vec<ArticleReport> {
    let reports: Vec<ArticleReport> = articles
        .iter()
        .map(|article| process_article(article, index, config))
        .collect();

    let total: usize = reports.iter().map(|r| r.authors.len()).sum();
    let resolved: usize = reports.iter().map(ArticleReport::resolved_count).sum();
    info!(
        "processed {} article(s), {}/{} author(s) linked to the roster",
        reports.len(),
        resolved,
        total
    );
    reports
}
