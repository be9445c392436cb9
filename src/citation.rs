//! Author list formatting for citations.
//!
//! Works on display names only; a name does not need to resolve against
//! the roster to be cited. The surname is always the last whitespace token,
//! so multi-word surnames ("de la Cruz") come out as "Cruz, ... de la".

use crate::authors::RawAuthorInput;
use crate::style::{CitationStyle, Locale};

/// `"Given Names Surname"` → `"Surname, Given Names"`.
///
/// Single-token names pass through unchanged.
pub fn surname_first_form(name: &str) -> String {
    let mut tokens: Vec<&str> = name.split_whitespace().collect();
    match tokens.pop() {
        Some(surname) if !tokens.is_empty() => format!("{}, {}", surname, tokens.join(" ")),
        _ => name.trim().to_string(),
    }
}

/// `"Ana María García"` → `"García, A. M."`.
///
/// Single-token names pass through unchanged.
pub fn apa_initials_form(name: &str) -> String {
    let mut tokens: Vec<&str> = name.split_whitespace().collect();
    match tokens.pop() {
        Some(surname) if !tokens.is_empty() => {
            let initials: Vec<String> = tokens
                .iter()
                .filter_map(|token| token.chars().next())
                .map(|initial| format!("{}.", initial.to_uppercase()))
                .collect();
            format!("{}, {}", surname, initials.join(" "))
        }
        _ => name.trim().to_string(),
    }
}

fn non_empty<S: AsRef<str>>(names: &[S]) -> Vec<&str> {
    names
        .iter()
        .map(|n| n.as_ref().trim())
        .filter(|n| !n.is_empty())
        .collect()
}

/// APA author list: `A`, `A, & B`, `A, B, & C`.
pub fn join_authors_apa<S: AsRef<str>>(names: &[S]) -> String {
    let formatted: Vec<String> = non_empty(names).into_iter().map(apa_initials_form).collect();
    match formatted.as_slice() {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{}, & {}", init.join(", "), last),
    }
}

/// MLA/Chicago author list: `A`, `A, y B`, and `A, et al.` from three
/// authors on.
pub fn join_authors_chicago_or_mla<S: AsRef<str>>(names: &[S], locale: Locale) -> String {
    let formatted: Vec<String> = non_empty(names).into_iter().map(surname_first_form).collect();
    match formatted.as_slice() {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{}, {} {}", first, locale.connector(), second),
        [first, ..] => format!("{}, et al.", first),
    }
}

/// On-page byline in natural name order, never truncated:
/// `A`, `A y B`, `A, B, y C`.
pub fn join_authors_display<S: AsRef<str>>(names: &[S], locale: Locale) -> String {
    let names = non_empty(names);
    match names.as_slice() {
        [] => locale.unknown_author().to_string(),
        [only] => only.to_string(),
        [first, second] => format!("{} {} {}", first, locale.connector(), second),
        [init @ .., last] => format!("{}, {} {}", init.join(", "), locale.connector(), last),
    }
}

/// Display names of the authors that have one, in byline order.
pub fn display_names(authors: &[RawAuthorInput]) -> Vec<String> {
    authors
        .iter()
        .map(RawAuthorInput::display_name)
        .filter(|name| !name.is_empty())
        .collect()
}

/// Author list for `style` in `locale`.
///
/// APA lists are the same in every locale.
pub fn format_authors(authors: &[RawAuthorInput], style: CitationStyle, locale: Locale) -> String {
    let names = display_names(authors);
    match style {
        CitationStyle::Apa => join_authors_apa(&names),
        CitationStyle::Mla | CitationStyle::Chicago => join_authors_chicago_or_mla(&names, locale),
    }
}
