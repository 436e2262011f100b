//! Full build: catalogue in, paper pages and sitemap out.
//!
//! ```text
//! Catalogue ──┬── render_paper_page (per record, parallel) ──┐
//!             └── build_sitemap + render_sitemap ────────────┴── OutputWriter
//! ```
//!
//! Every document is rendered into memory before the first write, so a
//! rendering failure leaves the output directory untouched. Writes happen in
//! a fixed order: pages in catalogue order, then the sitemap.
//!
//! Pages render on rayon's current pool. The binary sizes that pool from
//! `[processing] max_processes`; library callers get rayon's global pool.

use crate::catalogue::Catalogue;
use crate::chrome::Chrome;
use crate::config::SiteConfig;
use crate::render::{RenderContext, RenderError, render_paper_page};
use crate::sitemap::{SITEMAP_FILE, build_sitemap, render_sitemap};
use chrono::NaiveDate;
use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Catalogue error: {0}")]
    Catalogue(#[from] crate::catalogue::CatalogueError),
    #[error("Render error for '{id}': {source}")]
    Render {
        id: String,
        #[source]
        source: RenderError,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Destination for finished documents. Paths are relative to the output root.
pub trait OutputWriter: Sync {
    fn write(&self, relative: &Path, contents: &str) -> io::Result<()>;
}

/// Writes documents under a root directory, creating parents as needed.
#[derive(Debug, Clone)]
pub struct DirWriter {
    root: PathBuf,
}

impl DirWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl OutputWriter for DirWriter {
    fn write(&self, relative: &Path, contents: &str) -> io::Result<()> {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)
    }
}

/// A finished document and where it goes.
#[derive(Debug, Clone)]
pub struct Document {
    pub path: PathBuf,
    pub contents: String,
}

/// Everything one run produces, held in memory.
#[derive(Debug)]
pub struct RenderedSite {
    /// `(paper id, page)` in catalogue order.
    pub pages: Vec<(String, Document)>,
    pub sitemap: Document,
    pub sitemap_urls: usize,
}

impl RenderedSite {
    /// All documents in write order.
    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.pages
            .iter()
            .map(|(_, doc)| doc)
            .chain(std::iter::once(&self.sitemap))
    }
}

/// One generated paper page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPage {
    pub id: String,
    pub path: PathBuf,
}

/// What a successful run wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSummary {
    pub pages: Vec<GeneratedPage>,
    pub sitemap_path: PathBuf,
    pub sitemap_urls: usize,
}

/// Render every page and the sitemap without writing anything.
pub fn render_site(
    catalogue: &Catalogue,
    config: &SiteConfig,
    chrome: &dyn Chrome,
    today: NaiveDate,
) -> Result<RenderedSite, PipelineError> {
    let ctx = RenderContext {
        config,
        lookups: &catalogue.lookups,
        chrome,
    };
    let papers_dir = Path::new(config.site.papers_dir.trim_matches('/'));

    let pages = catalogue
        .papers
        .par_iter()
        .map(|paper| {
            let markup = render_paper_page(paper, &ctx).map_err(|source| PipelineError::Render {
                id: paper.id.clone(),
                source,
            })?;
            debug!(id = %paper.id, "rendered paper page");
            Ok((
                paper.id.clone(),
                Document {
                    path: papers_dir.join(paper.file_name()),
                    contents: markup.into_string(),
                },
            ))
        })
        .collect::<Result<Vec<_>, PipelineError>>()?;

    let entries = build_sitemap(&catalogue.papers, config, today);
    let sitemap = Document {
        path: PathBuf::from(SITEMAP_FILE),
        contents: render_sitemap(&entries).into_string(),
    };

    Ok(RenderedSite {
        pages,
        sitemap,
        sitemap_urls: entries.len(),
    })
}

/// Run the whole build: validate, warn about unresolved labels, render, write.
pub fn run(
    catalogue: &Catalogue,
    config: &SiteConfig,
    chrome: &dyn Chrome,
    writer: &dyn OutputWriter,
    today: NaiveDate,
) -> Result<BuildSummary, PipelineError> {
    info!(papers = catalogue.papers.len(), %today, "building paper pages");
    catalogue.validate()?;

    for missing in catalogue.unresolved_keys() {
        warn!(
            table = %missing.table,
            key = %missing.key,
            "no label for {} '{}', using the key as its label",
            missing.table,
            missing.key
        );
    }

    let site = render_site(catalogue, config, chrome, today)?;

    for doc in site.documents() {
        writer
            .write(&doc.path, &doc.contents)
            .map_err(|source| PipelineError::Write {
                path: doc.path.clone(),
                source,
            })?;
    }

    let summary = BuildSummary {
        pages: site
            .pages
            .into_iter()
            .map(|(id, doc)| GeneratedPage { id, path: doc.path })
            .collect(),
        sitemap_path: site.sitemap.path,
        sitemap_urls: site.sitemap_urls,
    };
    info!(
        pages = summary.pages.len(),
        sitemap_urls = summary.sitemap_urls,
        "build complete"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::Lookups;
    use crate::chrome::StockChrome;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn catalogue(ids: &[&str]) -> Catalogue {
        Catalogue {
            papers: ids.iter().map(|id| paper(id)).collect(),
            lookups: lookups(),
        }
    }

    #[test]
    fn writes_pages_then_sitemap() {
        let writer = MemoryWriter::default();
        let summary = run(
            &catalogue(&["a", "b", "c"]),
            &config(),
            &StockChrome,
            &writer,
            today(),
        )
        .unwrap();

        assert_eq!(
            writer.paths(),
            vec![
                "papers/a.html",
                "papers/b.html",
                "papers/c.html",
                "sitemap.xml"
            ]
        );
        assert_eq!(summary.pages.len(), 3);
        assert_eq!(summary.pages[1].id, "b");
        assert_eq!(summary.sitemap_path, PathBuf::from("sitemap.xml"));
        assert_eq!(summary.sitemap_urls, 11 + 3);
    }

    #[test]
    fn page_order_follows_catalogue_not_scheduling() {
        let ids: Vec<String> = (0..64).map(|i| format!("p-{i:02}")).collect();
        let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let site = render_site(&catalogue(&refs), &config(), &StockChrome, today()).unwrap();
        let rendered: Vec<&str> = site.pages.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(rendered, refs);
    }

    #[test]
    fn documents_match_renderer_output() {
        let cat = catalogue(&["a"]);
        let config = config();
        let site = render_site(&cat, &config, &StockChrome, today()).unwrap();
        let ctx = RenderContext {
            config: &config,
            lookups: &cat.lookups,
            chrome: &StockChrome,
        };
        let direct = render_paper_page(&cat.papers[0], &ctx).unwrap().into_string();
        assert_eq!(site.pages[0].1.contents, direct);
    }

    #[test]
    fn duplicate_ids_write_nothing() {
        let writer = MemoryWriter::default();
        let result = run(
            &catalogue(&["a", "a"]),
            &config(),
            &StockChrome,
            &writer,
            today(),
        );
        assert!(matches!(result, Err(PipelineError::Catalogue(_))));
        assert!(writer.paths().is_empty());
    }

    #[test]
    fn empty_catalogue_still_writes_sitemap() {
        let writer = MemoryWriter::default();
        let cat = Catalogue {
            papers: vec![],
            lookups: Lookups::default(),
        };
        let summary = run(&cat, &config(), &StockChrome, &writer, today()).unwrap();
        assert!(summary.pages.is_empty());
        assert_eq!(writer.paths(), vec!["sitemap.xml"]);
    }

    #[test]
    fn unresolved_labels_do_not_fail_the_run() {
        let mut cat = catalogue(&["a"]);
        cat.papers[0].status = "mystery".into();
        cat.papers[0].tags = vec!["unknown".into()];
        let writer = MemoryWriter::default();
        run(&cat, &config(), &StockChrome, &writer, today()).unwrap();
        let page = writer.contents("papers/a.html").unwrap();
        assert!(page.contains("paper-detail__status--mystery\">mystery</span>"));
    }

    #[test]
    fn custom_papers_dir_is_used() {
        let mut config = config();
        config.site.papers_dir = "research/".into();
        let writer = MemoryWriter::default();
        run(&catalogue(&["a"]), &config, &StockChrome, &writer, today()).unwrap();
        assert_eq!(writer.paths(), vec!["research/a.html", "sitemap.xml"]);
        let sitemap = writer.contents("sitemap.xml").unwrap();
        assert!(sitemap.contains("<loc>https://dissensus.ai/research/a.html</loc>"));
    }

    #[test]
    fn chrome_is_pluggable() {
        let writer = MemoryWriter::default();
        run(&catalogue(&["a"]), &config(), &StubChrome, &writer, today()).unwrap();
        let page = writer.contents("papers/a.html").unwrap();
        assert!(page.contains("<nav>research</nav>"));
        assert!(page.contains("<footer>stub</footer>"));
    }

    #[test]
    fn write_failure_names_the_path() {
        let result = run(
            &catalogue(&["a"]),
            &config(),
            &StockChrome,
            &FailingWriter,
            today(),
        );
        match result {
            Err(PipelineError::Write { path, .. }) => {
                assert_eq!(path, PathBuf::from("papers/a.html"))
            }
            other => panic!("expected write error, got {other:?}"),
        }
    }

    #[test]
    fn dir_writer_creates_parent_directories() {
        let tmp = TempDir::new().unwrap();
        let writer = DirWriter::new(tmp.path());
        run(&catalogue(&["a"]), &config(), &StockChrome, &writer, today()).unwrap();
        let page = fs::read_to_string(tmp.path().join("papers/a.html")).unwrap();
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(tmp.path().join("sitemap.xml").exists());
    }
}
