//! Output generation for processed articles.
//!
//! The report is handed to the page renderer as JSON; the BibTeX records
//! can also be collected into a single `.bib` document.

use crate::processor::ArticleReport;

/// Serializes the reports as a pretty-printed JSON array.
pub fn generate_output(reports: &[ArticleReport]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(reports)
}

/// Joins every article's BibTeX record, one blank line apart.
pub fn generate_bibliography(reports: &[ArticleReport]) -> String {
    let records: Vec<&str> = reports.iter().map(|r| r.bibtex.as_str()).collect();
    let mut output = records.join("\n\n");
    if !output.is_empty() {
        output.push('\n');
    }
    output
}

/// One-line run summary, e.g. `processed 3 article(s), 5/7 author(s) linked`.
pub fn summary_line(reports: &[ArticleReport]) -> String {
    let total: usize = reports.iter().map(|r| r.authors.len()).sum();
    let resolved: usize = reports.iter().map(ArticleReport::resolved_count).sum();
    format!(
        "processed {} article(s), {}/{} author(s) linked",
        reports.len(),
        resolved,
        total
    )
}
