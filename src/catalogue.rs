//! Catalogue loading and validation.
//!
//! The catalogue is one JSON document holding every paper record plus the
//! three label tables the pages resolve keys through:
//!
//! ```text
//! {
//!   "papers":   [ { "id": "alpha-1", "title": "...", "authors": [...], ... } ],
//!   "tags":     { "ml": "Machine Learning" },
//!   "statuses": { "published": "Published" },
//!   "programs": { "gov": { "title": "AI Governance" } }
//! }
//! ```
//!
//! ## Validation
//!
//! [`Catalogue::parse`] rejects the whole catalogue before anything is
//! rendered when:
//! - the JSON is malformed, a required field is missing, or a `date` is not a
//!   calendar date (serde reports line and column)
//! - a record has no authors, or a blank author name
//! - an `id` is empty or not URL-safe
//! - two records share an `id` (their pages would overwrite each other)
//!
//! Unknown tag, status, and program keys are not errors. They render as the
//! raw key and are listed by [`Catalogue::unresolved_keys`] so the run can
//! warn about them.
//!
//! Optional string fields that are present but empty (`"doi": ""`) load as
//! `None`, so every conditional section downstream only has to check `Some`.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogueError {
    #[error("Failed to read catalogue {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed catalogue {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Paper '{0}' has no authors")]
    NoAuthors(String),
    #[error("Paper '{id}' has a blank author name at position {position}")]
    BlankAuthor { id: String, position: usize },
    #[error("Paper id '{0}' is not a URL-safe slug")]
    InvalidId(String),
    #[error("Duplicate paper id '{0}'")]
    DuplicateId(String),
}

/// The full input: every record plus the shared label tables.
#[derive(Debug, Clone, Deserialize)]
pub struct Catalogue {
    pub papers: Vec<Paper>,
    #[serde(flatten)]
    pub lookups: Lookups,
}

/// One paper's metadata entry.
///
/// Field names follow the catalogue's JSON (`wpNumber`, `abstract`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paper {
    /// URL-safe slug; names the output file and the canonical URL.
    pub id: String,
    pub title: String,
    #[serde(default, deserialize_with = "non_empty")]
    pub subtitle: Option<String>,
    #[serde(rename = "abstract")]
    pub summary: String,
    /// Full names in citation order.
    pub authors: Vec<String>,
    pub date: NaiveDate,
    /// Key into the status table.
    pub status: String,
    /// Keys into the tag table, in display order.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Key into the program table.
    #[serde(default, deserialize_with = "non_empty")]
    pub program: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub doi: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub zenodo: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub pdf: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub github: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub dashboard: Option<String>,
    /// Paper-series number, e.g. `WP3` or `DP1`.
    #[serde(default, deserialize_with = "non_empty")]
    pub wp_number: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub journal: Option<String>,
}

/// Which paper series a record belongs to, from its `wpNumber` prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Series {
    Discussion,
    Working,
}

/// Prefix that marks a discussion paper number.
pub const DISCUSSION_PREFIX: &str = "DP";

impl Series {
    pub fn label(self) -> &'static str {
        match self {
            Series::Discussion => "Discussion",
            Series::Working => "Working",
        }
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Paper {
    /// Persistent identifier: the DOI, else the Zenodo record.
    pub fn identifier(&self) -> Option<&str> {
        self.doi.as_deref().or(self.zenodo.as_deref())
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Series is "Discussion" only for numbers starting with `DP`; anything
    /// else, including no number at all, counts as a working paper.
    pub fn series(&self) -> Series {
        match &self.wp_number {
            Some(n) if n.starts_with(DISCUSSION_PREFIX) => Series::Discussion,
            _ => Series::Working,
        }
    }

    /// Output file name, `{id}.html`.
    pub fn file_name(&self) -> String {
        format!("{}.html", self.id)
    }
}

/// A research program entry in the program table.
#[derive(Debug, Clone, Deserialize)]
pub struct Program {
    pub title: String,
}

/// Read-only label tables. Lookups never fail: a key missing from its table
/// resolves to itself.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Lookups {
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    #[serde(default)]
    pub statuses: BTreeMap<String, String>,
    #[serde(default)]
    pub programs: BTreeMap<String, Program>,
}

impl Lookups {
    pub fn tag_label<'a>(&'a self, key: &'a str) -> &'a str {
        self.tags.get(key).map(String::as_str).unwrap_or(key)
    }

    pub fn status_label<'a>(&'a self, key: &'a str) -> &'a str {
        self.statuses.get(key).map(String::as_str).unwrap_or(key)
    }

    pub fn program_label<'a>(&'a self, key: &'a str) -> &'a str {
        self.programs
            .get(key)
            .map(|p| p.title.as_str())
            .unwrap_or(key)
    }

    /// Resolved labels for every tag on `paper`, in record order.
    pub fn tag_labels<'a>(&'a self, paper: &'a Paper) -> Vec<&'a str> {
        paper.tags.iter().map(|t| self.tag_label(t)).collect()
    }
}

/// Which label table a key failed to resolve in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LookupTable {
    Tag,
    Status,
    Program,
}

impl fmt::Display for LookupTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LookupTable::Tag => "tag",
            LookupTable::Status => "status",
            LookupTable::Program => "program",
        })
    }
}

/// A key used by some record but absent from its table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct UnresolvedKey {
    pub table: LookupTable,
    pub key: String,
}

impl Catalogue {
    /// Read and validate a catalogue file. Read and parse errors name `path`.
    pub fn load(path: &Path) -> Result<Self, CatalogueError> {
        let content = fs::read_to_string(path).map_err(|source| CatalogueError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let catalogue: Catalogue =
            serde_json::from_str(&content).map_err(|source| CatalogueError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        catalogue.validate()?;
        Ok(catalogue)
    }

    /// Parse and validate catalogue JSON.
    pub fn parse(json: &str) -> Result<Self, CatalogueError> {
        let catalogue: Catalogue = serde_json::from_str(json)?;
        catalogue.validate()?;
        Ok(catalogue)
    }

    /// Check the record invariants serde cannot express.
    pub fn validate(&self) -> Result<(), CatalogueError> {
        let mut seen = HashSet::with_capacity(self.papers.len());
        for paper in &self.papers {
            if !is_url_safe_slug(&paper.id) {
                return Err(CatalogueError::InvalidId(paper.id.clone()));
            }
            if paper.authors.is_empty() {
                return Err(CatalogueError::NoAuthors(paper.id.clone()));
            }
            if let Some(position) = paper.authors.iter().position(|a| a.trim().is_empty()) {
                return Err(CatalogueError::BlankAuthor {
                    id: paper.id.clone(),
                    position,
                });
            }
            if !seen.insert(paper.id.as_str()) {
                return Err(CatalogueError::DuplicateId(paper.id.clone()));
            }
        }
        Ok(())
    }

    /// Keys referenced by records but missing from their tables, deduplicated
    /// and sorted by table then key.
    pub fn unresolved_keys(&self) -> Vec<UnresolvedKey> {
        let lookups = &self.lookups;
        let mut missing = BTreeSet::new();
        for paper in &self.papers {
            for tag in &paper.tags {
                if !lookups.tags.contains_key(tag) {
                    missing.insert((LookupTable::Tag, tag.as_str()));
                }
            }
            if !lookups.statuses.contains_key(&paper.status) {
                missing.insert((LookupTable::Status, paper.status.as_str()));
            }
            if let Some(program) = &paper.program {
                if !lookups.programs.contains_key(program) {
                    missing.insert((LookupTable::Program, program.as_str()));
                }
            }
        }
        missing
            .into_iter()
            .map(|(table, key)| UnresolvedKey {
                table,
                key: key.to_string(),
            })
            .collect()
    }
}

/// Ids become file names and URL path segments: ASCII letters, digits, `-`,
/// `_` and `.`, not starting with `.`.
pub fn is_url_safe_slug(id: &str) -> bool {
    !id.is_empty()
        && !id.starts_with('.')
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}
