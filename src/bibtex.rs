//! BibTeX export for articles.

use crate::authors::RawAuthorInput;
use crate::catalog::Article;
use crate::citation::display_names;
use crate::config::JournalConfig;
use crate::normalize::normalize;

/// Surname token used in citation keys.
///
/// The last whitespace token of the name, or `lastName` when the author
/// only has structured name parts.
fn key_surname(author: &RawAuthorInput) -> String {
    let token = match author {
        RawAuthorInput::StringName(name) => name.split_whitespace().last(),
        RawAuthorInput::Structured(parts) => match parts.name.as_deref().filter(|n| !n.trim().is_empty()) {
            Some(name) => name.split_whitespace().last(),
            None => author.last_name(),
        },
    };
    token.map(normalize).unwrap_or_default()
}

/// `<first author surname><year><sequence number>`, e.g. `perez20247`.
///
/// Keys are not deduplicated across articles.
pub fn bibtex_key(article: &Article) -> String {
    let surname = article
        .raw_authors()
        .iter()
        .find(|a| !a.display_name().trim().is_empty())
        .map(key_surname)
        .unwrap_or_default();

    format!("{}{}{}", surname, article.year_text(), article.sequence_text())
}

/// Full `@article` record with a fixed field order.
pub fn bibtex_record(article: &Article, config: &JournalConfig) -> String {
    let fields = [
        ("author", display_names(&article.raw_authors()).join(" and ")),
        ("title", article.title.clone()),
        ("journal", config.journal_name.clone()),
        ("year", article.year_text()),
        ("volume", article.volume_text()),
        ("number", article.issue_text()),
        (
            "pages",
            format!("{}-{}", article.first_page_text(), article.last_page_text()),
        ),
        ("issn", config.issn.clone()),
        ("url", config.article_url(&article.article_slug())),
    ];

    let body: Vec<String> = fields
        .iter()
        .map(|(name, value)| format!("  {} = {{{}}}", name, value))
        .collect();

    format!("@article{{{},\n{}\n}}", bibtex_key(article), body.join(",\n"))
}
