//! Sitemap generation.
//!
//! The sitemap lists the configured static pages first, in configuration
//! order, then one entry per paper, newest first. Papers sharing a date keep
//! their catalogue order.
//!
//! Every entry carries the same `lastmod`: the date of the run, not the
//! paper's publication date. Two runs on different days therefore produce
//! different bytes from an unchanged catalogue.

use crate::catalogue::Paper;
use crate::config::{ChangeFreq, SiteConfig};
use chrono::NaiveDate;
use maud::{Markup, PreEscaped, html};

pub const SITEMAP_FILE: &str = "sitemap.xml";

const XML_PROLOGUE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// One `<url>` element.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    pub loc: String,
    pub lastmod: NaiveDate,
    pub changefreq: ChangeFreq,
    pub priority: f32,
}

/// Priority for a paper with `status`.
pub fn paper_priority(status: &str, config: &SiteConfig) -> f32 {
    let policy = &config.sitemap;
    if policy.featured_statuses.iter().any(|s| s == status) {
        policy.featured_priority
    } else {
        policy.default_priority
    }
}

/// Collect every sitemap entry for the run dated `today`.
pub fn build_sitemap(papers: &[Paper], config: &SiteConfig, today: NaiveDate) -> Vec<SitemapEntry> {
    let site = &config.site;

    let mut sorted: Vec<&Paper> = papers.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));

    let static_entries = config.sitemap.static_pages.iter().map(|page| SitemapEntry {
        loc: site.url_for(&page.path),
        lastmod: today,
        changefreq: page.changefreq,
        priority: page.priority,
    });
    let paper_entries = sorted.into_iter().map(|paper| SitemapEntry {
        loc: site.paper_url(&paper.id),
        lastmod: today,
        changefreq: config.sitemap.paper_changefreq,
        priority: paper_priority(&paper.status, config),
    });

    static_entries.chain(paper_entries).collect()
}

/// Shortest decimal that reads back as `priority`, with at least one
/// fractional digit: `1.0`, `0.9`, `0.84`. Distinct priorities never print
/// the same.
pub fn format_priority(priority: f32) -> String {
    let s = priority.to_string();
    if s.contains('.') { s } else { format!("{s}.0") }
}

/// Serialize entries as a sitemaps.org `urlset` document.
pub fn render_sitemap(entries: &[SitemapEntry]) -> Markup {
    html! {
        (PreEscaped(XML_PROLOGUE)) "\n"
        urlset xmlns=(SITEMAP_NS) {
            @for entry in entries {
                "\n  "
                url {
                    "\n    " loc { (entry.loc) }
                    "\n    " lastmod { (entry.lastmod.format("%Y-%m-%d").to_string()) }
                    "\n    " changefreq { (entry.changefreq.to_string()) }
                    "\n    " priority { (format_priority(entry.priority)) }
                    "\n  "
                }
            }
            "\n"
        }
        "\n"
    }
}
