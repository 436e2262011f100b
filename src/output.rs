//! CLI output formatting for the `build` and `check` commands.
//!
//! Output lists papers by id first, with the file each one became as
//! secondary context, so a run reads as an inventory of the catalogue.
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! Paper pages
//! 001 alpha-1 → papers/alpha-1.html
//! 002 beta → papers/beta.html
//!
//! Sitemap
//!     sitemap.xml (13 URLs)
//!
//! Generated 2 paper pages + sitemap
//! ```
//!
//! ## Check
//!
//! ```text
//! Papers
//! 001 alpha-1 Alpha Results
//!     2024-03-05, Published, WP1
//! 002 beta Beta
//!     2023-11-20, draft
//!
//! Unresolved labels
//!     status 'draft'
//!
//! Catalogue OK: 2 papers, 1 unresolved label
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure.

use crate::catalogue::Catalogue;
use crate::pipeline::BuildSummary;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Display a relative output path with `/` separators on every platform.
fn display_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

// ============================================================================
// Build
// ============================================================================

pub fn format_build_output(summary: &BuildSummary) -> Vec<String> {
    let mut lines = Vec::new();

    if !summary.pages.is_empty() {
        lines.push("Paper pages".to_string());
        for (i, page) in summary.pages.iter().enumerate() {
            lines.push(format!(
                "{} {} \u{2192} {}",
                format_index(i + 1),
                page.id,
                display_path(&page.path)
            ));
        }
        lines.push(String::new());
    }

    lines.push("Sitemap".to_string());
    lines.push(format!(
        "{}{} ({})",
        indent(1),
        display_path(&summary.sitemap_path),
        plural(summary.sitemap_urls, "URL", "URLs")
    ));
    lines.push(String::new());

    lines.push(format!(
        "Generated {} + sitemap",
        plural(summary.pages.len(), "paper page", "paper pages")
    ));
    lines
}

/// Print build output to stdout.
pub fn print_build_output(summary: &BuildSummary) {
    for line in format_build_output(summary) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

pub fn format_check_output(catalogue: &Catalogue) -> Vec<String> {
    let mut lines = Vec::new();
    let lookups = &catalogue.lookups;

    lines.push("Papers".to_string());
    for (i, paper) in catalogue.papers.iter().enumerate() {
        lines.push(format!("{} {} {}", format_index(i + 1), paper.id, paper.title));
        let mut detail = vec![
            paper.date.format("%Y-%m-%d").to_string(),
            lookups.status_label(&paper.status).to_string(),
        ];
        if let Some(number) = &paper.wp_number {
            detail.push(number.clone());
        }
        lines.push(format!("{}{}", indent(1), detail.join(", ")));
    }

    let unresolved = catalogue.unresolved_keys();
    if !unresolved.is_empty() {
        lines.push(String::new());
        lines.push("Unresolved labels".to_string());
        for missing in &unresolved {
            lines.push(format!("{}{} '{}'", indent(1), missing.table, missing.key));
        }
    }

    lines.push(String::new());
    let mut verdict = format!(
        "Catalogue OK: {}",
        plural(catalogue.papers.len(), "paper", "papers")
    );
    if !unresolved.is_empty() {
        verdict.push_str(&format!(
            ", {}",
            plural(unresolved.len(), "unresolved label", "unresolved labels")
        ));
    }
    lines.push(verdict);
    lines
}

/// Print check output to stdout.
pub fn print_check_output(catalogue: &Catalogue) {
    for line in format_check_output(catalogue) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
