//! BibTeX keys and entries.
//!
//! ## Key derivation
//!
//! ```text
//! "Jane A. Doe", 2024-03-05, "alpha-1"
//!   surname  → "doe"        last space-separated token of the first author, lowercased
//!   year     → "2024"
//!   id       → "alpha1"     dashes removed
//!   key      → "doe2024alpha1", cut to 40 characters
//! ```
//!
//! Keys are deterministic per record but not guaranteed unique across the
//! catalogue: two papers by authors sharing a surname, in the same year, with
//! ids that agree after dash removal and truncation get the same key. Nothing
//! detects this; a clash only affects reference managers that import both.

use crate::catalogue::Paper;
use crate::config::SiteIdentity;
use std::fmt;

/// Upper bound on citation key length, in characters.
pub const MAX_KEY_LEN: usize = 40;

/// Derive the citation key for `paper`.
pub fn citation_key(paper: &Paper) -> String {
    let surname = paper
        .authors
        .first()
        .and_then(|name| name.split(' ').next_back())
        .unwrap_or_default()
        .to_lowercase();
    let id = paper.id.replace('-', "");
    let key = format!("{surname}{}{id}", paper.year());
    key.chars().take(MAX_KEY_LEN).collect()
}

/// `"Jane A. Doe"` → `"Doe, Jane A."`. Single-token names pass through.
pub fn bibtex_name(full_name: &str) -> String {
    match full_name.rsplit_once(' ') {
        Some((given, family)) => format!("{family}, {given}"),
        None => full_name.to_string(),
    }
}

/// Where the paper appeared: `"{site} {Discussion|Working} Paper[ {number}]"`.
pub fn howpublished(paper: &Paper, site: &SiteIdentity) -> String {
    let mut out = format!("{} {} Paper", site.name, paper.series());
    if let Some(number) = &paper.wp_number {
        out.push(' ');
        out.push_str(number);
    }
    out
}

/// Venue line for the human-readable citation: the site name, followed by
/// the series and number only when the paper has a number.
pub fn citation_venue(paper: &Paper, site: &SiteIdentity) -> String {
    match &paper.wp_number {
        Some(number) => format!("{} {} Paper {}", site.name, paper.series(), number),
        None => site.name.clone(),
    }
}

/// A `@misc` BibTeX entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibEntry {
    pub key: String,
    /// Authors in `Last, First` form, citation order.
    pub authors: Vec<String>,
    pub title: String,
    pub year: i32,
    pub howpublished: String,
    pub doi: Option<String>,
    pub url: String,
}

impl BibEntry {
    pub fn from_paper(paper: &Paper, site: &SiteIdentity) -> Self {
        Self {
            key: citation_key(paper),
            authors: paper.authors.iter().map(|a| bibtex_name(a)).collect(),
            title: paper.title.clone(),
            year: paper.year(),
            howpublished: howpublished(paper, site),
            doi: paper.identifier().map(str::to_string),
            url: site.paper_url(&paper.id),
        }
    }
}

impl fmt::Display for BibEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "@misc{{{},", self.key)?;
        writeln!(f, "  author = {{{}}},", self.authors.join(" and "))?;
        writeln!(f, "  title = {{{}}},", self.title)?;
        writeln!(f, "  year = {{{}}},", self.year)?;
        writeln!(f, "  howpublished = {{{}}},", self.howpublished)?;
        if let Some(doi) = &self.doi {
            writeln!(f, "  doi = {{{doi}}},")?;
        }
        writeln!(f, "  url = {{{}}}", self.url)?;
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    #[test]
    fn key_from_surname_year_and_id() {
        let p = scenario_paper();
        assert_eq!(citation_key(&p), "doe2024alpha1");
    }

    #[test]
    fn key_is_deterministic() {
        let p = scenario_paper();
        assert_eq!(citation_key(&p), citation_key(&p.clone()));
    }

    #[test]
    fn key_is_bounded() {
        let mut p = scenario_paper();
        p.authors = vec!["Maximiliana Wolfeschlegelsteinhausenbergerdorff".into()];
        p.id = "a-very-long-identifier-for-a-paper-with-many-words".into();
        let key = citation_key(&p);
        assert_eq!(key.chars().count(), MAX_KEY_LEN);
        assert!(key.starts_with("wolfeschlegelsteinhausenbergerdorff2024"));
    }

    #[test]
    fn key_truncates_by_chars() {
        let mut p = scenario_paper();
        p.authors = vec!["Ödön Ääääääääääääääääääääääääääääääääääääääää".into()];
        let key = citation_key(&p);
        assert_eq!(key.chars().count(), MAX_KEY_LEN);
    }

    #[test]
    fn key_uses_first_author_only() {
        let mut p = scenario_paper();
        p.authors = vec!["Ada Lovelace".into(), "Charles Babbage".into()];
        assert!(citation_key(&p).starts_with("lovelace2024"));
    }

    #[test]
    fn bibtex_name_last_first() {
        assert_eq!(bibtex_name("Jane A. Doe"), "Doe, Jane A.");
        assert_eq!(bibtex_name("Ada Lovelace"), "Lovelace, Ada");
        assert_eq!(bibtex_name("Plato"), "Plato");
    }

    #[test]
    fn howpublished_working_paper() {
        let p = scenario_paper();
        assert_eq!(
            howpublished(&p, &site()),
            "Dissensus AI Working Paper WP1"
        );
    }

    #[test]
    fn howpublished_discussion_paper() {
        let mut p = scenario_paper();
        p.wp_number = Some("DP2".into());
        assert_eq!(
            howpublished(&p, &site()),
            "Dissensus AI Discussion Paper DP2"
        );
    }

    #[test]
    fn howpublished_without_number() {
        let mut p = scenario_paper();
        p.wp_number = None;
        assert_eq!(howpublished(&p, &site()), "Dissensus AI Working Paper");
        assert_eq!(citation_venue(&p, &site()), "Dissensus AI");
    }

    #[test]
    fn entry_text_layout() {
        let mut p = scenario_paper();
        p.authors = vec!["Jane A. Doe".into(), "Ada Lovelace".into()];
        let entry = BibEntry::from_paper(&p, &site()).to_string();
        assert_eq!(
            entry,
            "@misc{doe2024alpha1,\n\
             \x20 author = {Doe, Jane A. and Lovelace, Ada},\n\
             \x20 title = {Alpha Results},\n\
             \x20 year = {2024},\n\
             \x20 howpublished = {Dissensus AI Working Paper WP1},\n\
             \x20 url = {https://dissensus.ai/papers/alpha-1.html}\n\
             }"
        );
    }

    #[test]
    fn entry_includes_doi_only_when_present() {
        let mut p = scenario_paper();
        let without = BibEntry::from_paper(&p, &site()).to_string();
        assert!(!without.contains("doi ="));

        p.zenodo = Some("10.5281/zenodo.42".into());
        let with = BibEntry::from_paper(&p, &site()).to_string();
        assert!(with.contains("  doi = {10.5281/zenodo.42},\n"));
        assert!(with.ends_with("url = {https://dissensus.ai/papers/alpha-1.html}\n}"));
    }
}
