//! Discovery metadata for a paper page.
//!
//! One record maps to six independent blocks, each consumed by a different
//! crawler:
//!
//! | Block | Consumer | Description excerpt |
//! |-------|----------|---------------------|
//! | page (`description`, `author`, `keywords`) | search engines | 160 chars |
//! | Highwire `citation_*` | Google Scholar and other citation indexers | none |
//! | Dublin Core `DC.*` | library harvesters | 300 chars |
//! | Schema.org `ScholarlyArticle` | structured-data parsers | full abstract |
//! | Open Graph `og:*` | link previews | 200 chars |
//! | Twitter `twitter:*` | link previews | 200 chars |
//!
//! No block reads another block's output. Tag contents are stored as plain
//! text; the renderer escapes them for HTML. The structured-data block is a
//! typed value the renderer serializes with [`script_json`](crate::format::script_json),
//! so HTML entities never leak into the JSON.

use crate::catalogue::{Lookups, Paper};
use crate::config::{PinnedAuthor, SiteConfig, SiteIdentity};
use crate::format::{format_citation_date, truncate};
use chrono::NaiveDate;
use serde::Serialize;

/// Excerpt length for the general `description` meta tag.
pub const DESCRIPTION_LEN: usize = 160;
/// Excerpt length for Open Graph and Twitter descriptions.
pub const SOCIAL_DESCRIPTION_LEN: usize = 200;
/// Excerpt length for `DC.description`.
pub const DUBLIN_CORE_DESCRIPTION_LEN: usize = 300;

/// Which attribute names a `<meta>` tag's key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaAttr {
    /// `<meta name="..." content="...">`
    Name,
    /// `<meta property="..." content="...">` (Open Graph)
    Property,
}

/// One `<meta>` tag, unescaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaTag {
    pub attr: MetaAttr,
    pub key: &'static str,
    pub content: String,
}

impl MetaTag {
    pub fn name(key: &'static str, content: impl Into<String>) -> Self {
        Self {
            attr: MetaAttr::Name,
            key,
            content: content.into(),
        }
    }

    pub fn property(key: &'static str, content: impl Into<String>) -> Self {
        Self {
            attr: MetaAttr::Property,
            key,
            content: content.into(),
        }
    }
}

/// Every metadata block for one paper.
#[derive(Debug, Clone)]
pub struct MetadataBlocks {
    pub page: Vec<MetaTag>,
    pub highwire: Vec<MetaTag>,
    pub dublin_core: Vec<MetaTag>,
    pub article: ScholarlyArticle,
    pub open_graph: Vec<MetaTag>,
    pub twitter: Vec<MetaTag>,
}

/// Build all blocks for `paper`.
pub fn synthesize(paper: &Paper, config: &SiteConfig, lookups: &Lookups) -> MetadataBlocks {
    MetadataBlocks {
        page: page_meta(paper, lookups),
        highwire: highwire(paper, &config.site, lookups),
        dublin_core: dublin_core(paper, &config.site),
        article: scholarly_article(paper, &config.site, &config.pinned_author),
        open_graph: open_graph(paper, &config.site),
        twitter: twitter(paper, &config.site),
    }
}

/// General `description`, `author`, and `keywords` tags. Keyword tags are
/// left out for untagged papers rather than emitted empty.
pub fn page_meta(paper: &Paper, lookups: &Lookups) -> Vec<MetaTag> {
    let mut tags = vec![
        MetaTag::name("description", truncate(&paper.summary, DESCRIPTION_LEN)),
        MetaTag::name("author", paper.authors.join(", ")),
    ];
    if !paper.tags.is_empty() {
        tags.push(MetaTag::name("keywords", lookups.tag_labels(paper).join(", ")));
    }
    tags
}

/// Highwire Press tags, one `citation_author` per author in citation order.
pub fn highwire(paper: &Paper, site: &SiteIdentity, lookups: &Lookups) -> Vec<MetaTag> {
    let mut tags = vec![MetaTag::name("citation_title", &paper.title)];
    tags.extend(
        paper
            .authors
            .iter()
            .map(|a| MetaTag::name("citation_author", a)),
    );
    tags.push(MetaTag::name(
        "citation_publication_date",
        format_citation_date(paper.date),
    ));
    if let Some(pdf) = &paper.pdf {
        tags.push(MetaTag::name("citation_pdf_url", site.pdf_url(pdf)));
    }
    if let Some(doi) = paper.identifier() {
        tags.push(MetaTag::name("citation_doi", doi));
    }
    if let Some(journal) = &paper.journal {
        tags.push(MetaTag::name("citation_journal_title", journal));
    }
    if let Some(number) = &paper.wp_number {
        tags.push(MetaTag::name("citation_technical_report_number", number));
    }
    tags.push(MetaTag::name("citation_publisher", &site.name));
    tags.push(MetaTag::name(
        "citation_abstract_html_url",
        site.paper_url(&paper.id),
    ));
    if !paper.tags.is_empty() {
        tags.push(MetaTag::name(
            "citation_keywords",
            lookups.tag_labels(paper).join("; "),
        ));
    }
    tags.push(MetaTag::name("citation_language", &site.language));
    tags
}

/// Dublin Core `DC.*` tags.
pub fn dublin_core(paper: &Paper, site: &SiteIdentity) -> Vec<MetaTag> {
    let mut tags = vec![
        MetaTag::name("DC.title", &paper.title),
        MetaTag::name("DC.creator", paper.authors.join(", ")),
        MetaTag::name("DC.date", paper.date.to_string()),
        MetaTag::name("DC.publisher", &site.name),
        MetaTag::name(
            "DC.description",
            truncate(&paper.summary, DUBLIN_CORE_DESCRIPTION_LEN),
        ),
        MetaTag::name("DC.type", "Text"),
        MetaTag::name("DC.format", "text/html"),
        MetaTag::name("DC.language", &site.language),
    ];
    if let Some(doi) = paper.identifier() {
        tags.push(MetaTag::name("DC.identifier", format!("doi:{doi}")));
    }
    tags.push(MetaTag::name("DC.rights", &site.rights));
    tags
}

/// Open Graph tags. The image is the site-wide fallback, never per paper.
pub fn open_graph(paper: &Paper, site: &SiteIdentity) -> Vec<MetaTag> {
    vec![
        MetaTag::property("og:type", "article"),
        MetaTag::property("og:url", site.paper_url(&paper.id)),
        MetaTag::property("og:title", &paper.title),
        MetaTag::property(
            "og:description",
            truncate(&paper.summary, SOCIAL_DESCRIPTION_LEN),
        ),
        MetaTag::property("og:site_name", &site.name),
        MetaTag::property("og:image", &site.image),
    ]
}

/// Twitter card tags.
pub fn twitter(paper: &Paper, site: &SiteIdentity) -> Vec<MetaTag> {
    vec![
        MetaTag::name("twitter:card", "summary"),
        MetaTag::name("twitter:title", &paper.title),
        MetaTag::name(
            "twitter:description",
            truncate(&paper.summary, SOCIAL_DESCRIPTION_LEN),
        ),
        MetaTag::name("twitter:image", &site.image),
    ]
}

// ============================================================================
// Schema.org
// ============================================================================

/// Schema.org `ScholarlyArticle`. Field order is serialization order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScholarlyArticle {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub headline: String,
    pub author: Vec<Person>,
    pub date_published: NaiveDate,
    pub publisher: Organization,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<PropertyValue>,
    pub url: String,
    pub in_language: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Person {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<PropertyValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affiliation: Option<Organization>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Organization {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PropertyValue {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    #[serde(rename = "propertyID")]
    pub property_id: &'static str,
    pub value: String,
}

impl PropertyValue {
    fn new(property_id: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind: "PropertyValue",
            property_id,
            value: value.into(),
        }
    }
}

impl Organization {
    fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            kind: "Organization",
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Author entry. Only the pinned author gets ORCID and affiliation.
pub fn person(name: &str, pinned: &PinnedAuthor) -> Person {
    if name == pinned.name {
        Person {
            kind: "Person",
            name: name.to_string(),
            identifier: Some(PropertyValue::new("ORCID", &pinned.orcid)),
            url: Some(pinned.orcid_url()),
            affiliation: Some(Organization::new(
                &pinned.affiliation,
                &pinned.affiliation_url,
            )),
        }
    } else {
        Person {
            kind: "Person",
            name: name.to_string(),
            identifier: None,
            url: None,
            affiliation: None,
        }
    }
}

/// Structured-data description: the full abstract on one line.
pub fn single_line(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

pub fn scholarly_article(
    paper: &Paper,
    site: &SiteIdentity,
    pinned: &PinnedAuthor,
) -> ScholarlyArticle {
    ScholarlyArticle {
        context: "https://schema.org",
        kind: "ScholarlyArticle",
        headline: paper.title.clone(),
        author: paper.authors.iter().map(|a| person(a, pinned)).collect(),
        date_published: paper.date,
        publisher: Organization::new(&site.name, &site.origin),
        description: single_line(&paper.summary),
        identifier: paper.identifier().map(|doi| PropertyValue::new("DOI", doi)),
        url: site.paper_url(&paper.id),
        in_language: site.language.clone(),
    }
}
