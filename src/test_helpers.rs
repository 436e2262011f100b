//! Shared test utilities for the paper-pages test suite.
//!
//! Record builders, label-table fixtures, and stand-ins for the two
//! collaborators a build talks to (chrome and the output writer).
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let mut p = scenario_paper();
//! p.wp_number = Some("DP2".into());
//!
//! let writer = MemoryWriter::default();
//! pipeline::run(&catalogue, &config(), &StubChrome, &writer, today)?;
//! assert_eq!(writer.paths(), vec!["papers/alpha-1.html", "sitemap.xml"]);
//! ```

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::NaiveDate;

use crate::catalogue::{Lookups, Paper, Program};
use crate::chrome::{Chrome, Section};
use crate::config::{SiteConfig, SiteIdentity};
use crate::pipeline::OutputWriter;

// =========================================================================
// Records
// =========================================================================

/// A bare record: one author, status `published`, no tags, no optional fields.
pub fn paper(id: &str) -> Paper {
    Paper {
        id: id.to_string(),
        title: format!("Paper {id}"),
        subtitle: None,
        summary: format!("Abstract of {id}."),
        authors: vec!["Jane A. Doe".to_string()],
        date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
        status: "published".to_string(),
        tags: vec![],
        program: None,
        doi: None,
        zenodo: None,
        pdf: None,
        github: None,
        dashboard: None,
        wp_number: None,
        journal: None,
    }
}

/// The working-paper record the end-to-end scenarios start from:
/// `alpha-1`, "Alpha Results" by Jane A. Doe, 2024-03-05, published,
/// tagged `ml`, number `WP1`, no identifier and no PDF.
pub fn scenario_paper() -> Paper {
    Paper {
        title: "Alpha Results".to_string(),
        summary: "We report alpha results.".to_string(),
        tags: vec!["ml".to_string()],
        wp_number: Some("WP1".to_string()),
        ..paper("alpha-1")
    }
}

/// Every optional field populated.
pub fn full_paper() -> Paper {
    Paper {
        subtitle: Some("A subtitle".to_string()),
        program: Some("gov".to_string()),
        doi: Some("10.1234/full".to_string()),
        pdf: Some("full.pdf".to_string()),
        github: Some("https://github.com/example/full".to_string()),
        dashboard: Some("https://dash.example.org/full".to_string()),
        journal: Some("Journal of Tests".to_string()),
        ..scenario_paper()
    }
}

// =========================================================================
// Label tables and config
// =========================================================================

/// `ml` → "Machine Learning", `published` → "Published", `gov` → "AI Governance".
pub fn lookups() -> Lookups {
    Lookups {
        tags: BTreeMap::from([("ml".to_string(), "Machine Learning".to_string())]),
        statuses: BTreeMap::from([
            ("published".to_string(), "Published".to_string()),
            ("draft".to_string(), "Draft".to_string()),
        ]),
        programs: BTreeMap::from([(
            "gov".to_string(),
            Program {
                title: "AI Governance".to_string(),
            },
        )]),
    }
}

pub fn config() -> SiteConfig {
    SiteConfig::default()
}

pub fn site() -> SiteIdentity {
    SiteIdentity::default()
}

// =========================================================================
// Collaborator doubles
// =========================================================================

/// Chrome with tiny, recognizable fragments.
pub struct StubChrome;

impl Chrome for StubChrome {
    fn navigation(&self, active: Section) -> String {
        format!("<nav>{active}</nav>")
    }

    fn footer(&self) -> String {
        "<footer>stub</footer>".to_string()
    }
}

/// Records writes in call order instead of touching the filesystem.
#[derive(Default)]
pub struct MemoryWriter {
    written: Mutex<Vec<(PathBuf, String)>>,
}

impl MemoryWriter {
    /// Written paths, in write order, with `/` separators.
    pub fn paths(&self) -> Vec<String> {
        self.written
            .lock()
            .unwrap()
            .iter()
            .map(|(p, _)| p.to_string_lossy().replace('\\', "/"))
            .collect()
    }

    pub fn contents(&self, path: &str) -> Option<String> {
        self.written
            .lock()
            .unwrap()
            .iter()
            .find(|(p, _)| p == Path::new(path))
            .map(|(_, c)| c.clone())
    }
}

impl OutputWriter for MemoryWriter {
    fn write(&self, relative: &Path, contents: &str) -> io::Result<()> {
        self.written
            .lock()
            .unwrap()
            .push((relative.to_path_buf(), contents.to_string()));
        Ok(())
    }
}

/// Rejects every write.
pub struct FailingWriter;

impl OutputWriter for FailingWriter {
    fn write(&self, _relative: &Path, _contents: &str) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
    }
}
