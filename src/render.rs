//! Paper detail page rendering.
//!
//! One record in, one complete HTML document out. Rendering is pure: it
//! reads the record, the label tables, the site config, and the chrome
//! fragments, and writes nothing.
//!
//! ## Page Structure
//!
//! ```text
//! head
//!   page meta, Highwire, Dublin Core, Schema.org JSON-LD, Open Graph, Twitter
//!   canonical link, title, stylesheet, icons
//! body.has-nav
//!   navigation chrome (Research active)
//!   main.paper-detail
//!     back link
//!     header       date, status, program?, title, subtitle?, authors
//!     actions?     PDF?, DOI?, GitHub?, Dashboard?
//!     abstract
//!     citation     suggested citation + Copy BibTeX button
//!     topics?
//!   footer chrome
//!   copy-to-clipboard script with the BibTeX entry as a string literal
//! ```
//!
//! Sections marked `?` exist only when their field does. A missing field
//! leaves no wrapper, placeholder, or empty attribute behind.
//!
//! ## Escaping
//!
//! Record text reaches the document in one of three contexts, each with its
//! own encoder from [`crate::format`]: [`Text`] for HTML, [`script_json`] for
//! the JSON-LD block and for the BibTeX literal inside the script. Chrome
//! fragments are inserted verbatim.

use crate::catalogue::{Lookups, Paper};
use crate::chrome::{Chrome, Section};
use crate::citation::{BibEntry, citation_venue};
use crate::config::SiteConfig;
use crate::format::{Text, format_display_date, script_json};
use crate::metadata::{MetaAttr, MetaTag, synthesize};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Shared, read-only inputs for rendering any page of a run.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    pub config: &'a SiteConfig,
    pub lookups: &'a Lookups,
    pub chrome: &'a dyn Chrome,
}

/// Link target for a persistent identifier: bare DOIs (`10.xxxx/...`) resolve
/// through doi.org, anything else is already a URL.
pub fn identifier_url(identifier: &str) -> String {
    if identifier.starts_with("10.") {
        format!("https://doi.org/{identifier}")
    } else {
        identifier.to_string()
    }
}

/// Render the detail page for `paper`.
pub fn render_paper_page(paper: &Paper, ctx: &RenderContext) -> Result<Markup, RenderError> {
    let site = &ctx.config.site;
    let meta = synthesize(paper, ctx.config, ctx.lookups);
    let article_json = script_json(&meta.article)?;
    let bibtex = BibEntry::from_paper(paper, site).to_string();
    let bibtex_literal = script_json(bibtex.as_str())?;
    let canonical = site.paper_url(&paper.id);
    let page_title = format!("{} — {}", paper.title, site.name);

    Ok(html! {
        (DOCTYPE)
        html lang=(Text(&site.language)) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                (meta_tags(&meta.page))
                meta name="theme-color" content="#050505";
                meta name="robots" content="index, follow";
                (meta_tags(&meta.highwire))
                (meta_tags(&meta.dublin_core))
                script type="application/ld+json" { (PreEscaped(article_json)) }
                (meta_tags(&meta.open_graph))
                (meta_tags(&meta.twitter))
                link rel="canonical" href=(Text(&canonical));
                title { (Text(&page_title)) }
                link rel="stylesheet" href="../css/dissensus.css";
                link rel="icon" type="image/png" sizes="32x32" href="../assets/favicon-32.png";
                link rel="icon" type="image/png" sizes="64x64" href="../assets/favicon-64.png";
                link rel="apple-touch-icon" sizes="180x180" href="../assets/apple-touch-icon.png";
            }
            body.has-nav {
                (PreEscaped(ctx.chrome.navigation(Section::Research)))
                main.paper-detail {
                    div.container {
                        a class="paper-detail__back" href="../index.html#publications" {
                            (PreEscaped("&larr;")) " Back to publications"
                        }
                        (paper_header(paper, ctx.lookups))
                        (action_links(paper))
                        section class="paper-detail__abstract" {
                            h2 { "Abstract" }
                            p { (Text(&paper.summary)) }
                        }
                        (citation_section(paper, ctx.config))
                        (topics(paper, ctx.lookups))
                    }
                }
                (PreEscaped(ctx.chrome.footer()))
                script { (PreEscaped(copy_script(&bibtex_literal))) }
            }
        }
    })
}

/// Renders a run of `<meta>` tags, escaping every content value.
fn meta_tags(tags: &[MetaTag]) -> Markup {
    html! {
        @for tag in tags {
            @match tag.attr {
                MetaAttr::Name => {
                    meta name=(tag.key) content=(Text(&tag.content));
                }
                MetaAttr::Property => {
                    meta property=(tag.key) content=(Text(&tag.content));
                }
            }
        }
    }
}

fn paper_header(paper: &Paper, lookups: &Lookups) -> Markup {
    html! {
        header class="paper-detail__header" {
            div class="paper-detail__meta" {
                span class="paper-detail__date" { (format_display_date(paper.date)) }
                span class={ "paper-detail__status paper-detail__status--" (Text(&paper.status)) } {
                    (Text(lookups.status_label(&paper.status)))
                }
                @if let Some(program) = &paper.program {
                    span class="paper-detail__program" { (Text(lookups.program_label(program))) }
                }
            }
            h1 class="paper-detail__title" { (Text(&paper.title)) }
            @if let Some(subtitle) = &paper.subtitle {
                p class="paper-detail__subtitle" { (Text(subtitle)) }
            }
            p class="paper-detail__authors" { (Text(&paper.authors.join(", "))) }
        }
    }
}

/// PDF, DOI, GitHub, and Dashboard links. Renders nothing, not even the
/// container, when the paper has none of them.
fn action_links(paper: &Paper) -> Markup {
    let doi_url = paper.identifier().map(identifier_url);
    let has_any = paper.pdf.is_some()
        || doi_url.is_some()
        || paper.github.is_some()
        || paper.dashboard.is_some();

    html! {
        @if has_any {
            div class="paper-detail__actions" {
                @if let Some(pdf) = &paper.pdf {
                    a href=(Text(pdf)) class="paper-detail__action" download { "Download PDF" }
                }
                @if let Some(url) = &doi_url {
                    a href=(Text(url)) class="paper-detail__action" target="_blank" rel="noopener" { "DOI" }
                }
                @if let Some(github) = &paper.github {
                    a href=(Text(github)) class="paper-detail__action--secondary paper-detail__action" target="_blank" rel="noopener" { "GitHub" }
                }
                @if let Some(dashboard) = &paper.dashboard {
                    a href=(Text(dashboard)) class="paper-detail__action--secondary paper-detail__action" target="_blank" rel="noopener" { "Dashboard" }
                }
            }
        }
    }
}

/// Human-readable citation plus the Copy BibTeX button.
fn citation_section(paper: &Paper, config: &SiteConfig) -> Markup {
    let authors = paper.authors.join(", ");
    let venue = citation_venue(paper, &config.site);

    html! {
        section class="paper-detail__citation" {
            h2 { "Suggested Citation" }
            div class="paper-detail__citation-block" {
                (Text(&authors)) " (" (paper.year()) "). "
                em { (Text(&paper.title)) }
                ". " (Text(&venue)) "."
                @if let Some(doi) = paper.identifier() {
                    " DOI: " (Text(doi))
                }
            }
            button class="paper-detail__bibtex-btn" onclick="copyBibTeX(this)" {
                span { (PreEscaped("&#x27E8;/&#x27E9;")) }
                " Copy BibTeX"
            }
        }
    }
}

fn topics(paper: &Paper, lookups: &Lookups) -> Markup {
    html! {
        @if !paper.tags.is_empty() {
            section class="paper-detail__tags" {
                h2 { "Topics" }
                div class="paper-detail__tag-list" {
                    @for label in lookups.tag_labels(paper) {
                        span class="paper-detail__tag" { (Text(label)) }
                    }
                }
            }
        }
    }
}

/// Clipboard script. `bibtex_literal` must already be a JSON string literal.
fn copy_script(bibtex_literal: &str) -> String {
    format!(
        r#"
    function copyBibTeX(btn) {{
      var bibtex = {bibtex_literal};
      navigator.clipboard.writeText(bibtex).then(function() {{
        var original = btn.innerHTML;
        btn.innerHTML = '<span>✓</span> Copied!';
        btn.classList.add('paper-detail__bibtex-btn--copied');
        setTimeout(function() {{
          btn.innerHTML = original;
          btn.classList.remove('paper-detail__bibtex-btn--copied');
        }}, 2000);
      }});
    }}
  "#
    )
}

// ============================================================================
// Tests
// ============================================================================
