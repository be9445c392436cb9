//! byline: resolve article bylines against a contributor roster and format
//! them as citations.
//!
//! This library provides functionality to:
//! - Load the article catalog and the contributor roster
//! - Normalize author names and match them to roster members
//! - Format author lists in APA, MLA and Chicago style, in Spanish and English
//! - Export articles as BibTeX records

pub mod authors;
pub mod bibtex;
pub mod catalog;
pub mod citation;
pub mod config;
pub mod normalize;
pub mod output;
pub mod processor;
pub mod resolver;
pub mod roster;
pub mod style;

pub use authors::{display_name_of, to_raw_authors, RawAuthorInput, StructuredAuthor};
pub use bibtex::{bibtex_key, bibtex_record};
pub use catalog::{load_catalog, parse_catalog, Article, CatalogError};
pub use citation::{
    apa_initials_form, join_authors_apa, join_authors_chicago_or_mla, join_authors_display,
    surname_first_form,
};
pub use config::{ConfigError, JournalConfig};
pub use normalize::{generate_slug, normalize, strip_trailing_digits};
pub use output::{generate_bibliography, generate_output, summary_line};
pub use processor::{process_article, process_catalog, ArticleReport, AuthorDescriptor};
pub use resolver::{resolve, MatchOutcome, MatchResolver, MatchStrategy, ResolvedAuthor};
pub use roster::{RosterError, RosterIndex, RosterMember, RosterSource};
pub use style::{builtin_style, CitationStyle, Locale};
