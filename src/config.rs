//! Site configuration module.
//!
//! Handles loading, validating, and merging `paper-pages.toml`. Stock
//! defaults reproduce the published site exactly; a config file only needs
//! the values it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! origin = "https://dissensus.ai"           # No trailing slash
//! name = "Dissensus AI"                     # Publisher, site name, series prefix
//! language = "en"
//! rights = "CC BY 4.0"
//! image = "https://dissensus.ai/assets/logo.png"  # Social preview fallback
//! pdf_base = "https://farzulla.org/papers/" # Prefix for relative PDF paths
//! papers_dir = "papers"                     # Output subdirectory for pages
//!
//! [pinned_author]
//! name = "Murad Farzulla"
//! orcid = "0009-0002-7164-8704"
//! affiliation = "Dissensus AI"
//! affiliation_url = "https://dissensus.ai"
//!
//! [sitemap]
//! featured_statuses = ["peer-review", "published"]
//! featured_priority = 0.9
//! default_priority = 0.8
//! paper_changefreq = "monthly"
//!
//! [[sitemap.static_pages]]
//! path = "/"
//! priority = 1.0
//! changefreq = "weekly"
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Generator configuration loaded from `paper-pages.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Fixed identifiers embedded in every page.
    pub site: SiteIdentity,
    /// The one author whose structured-data entry carries ORCID and affiliation.
    pub pinned_author: PinnedAuthor,
    /// Sitemap priorities and static destinations.
    pub sitemap: SitemapConfig,
    /// Parallel rendering settings.
    pub processing: ProcessingConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let origin = &self.site.origin;
        if !origin.starts_with("http://") && !origin.starts_with("https://") {
            return Err(ConfigError::Validation(
                "site.origin must start with http:// or https://".into(),
            ));
        }
        if origin.ends_with('/') {
            return Err(ConfigError::Validation(
                "site.origin must not end with '/'".into(),
            ));
        }
        if self.site.papers_dir.trim_matches('/').is_empty() {
            return Err(ConfigError::Validation(
                "site.papers_dir must not be empty".into(),
            ));
        }
        let sitemap = &self.sitemap;
        for (key, value) in [
            ("featured_priority", sitemap.featured_priority),
            ("default_priority", sitemap.default_priority),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Validation(format!(
                    "sitemap.{key} must be between 0.0 and 1.0"
                )));
            }
        }
        if sitemap.featured_priority <= sitemap.default_priority {
            return Err(ConfigError::Validation(
                "sitemap.featured_priority must be greater than sitemap.default_priority".into(),
            ));
        }
        for page in &sitemap.static_pages {
            if !page.path.starts_with('/') {
                return Err(ConfigError::Validation(format!(
                    "sitemap.static_pages path '{}' must start with '/'",
                    page.path
                )));
            }
            if !(0.0..=1.0).contains(&page.priority) {
                return Err(ConfigError::Validation(format!(
                    "sitemap.static_pages priority for '{}' must be between 0.0 and 1.0",
                    page.path
                )));
            }
        }
        Ok(())
    }
}

/// Site-wide identifiers. These appear verbatim in citation metadata, so the
/// defaults must not drift.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteIdentity {
    /// Site origin without trailing slash.
    pub origin: String,
    /// Publisher name, Open Graph site name, and paper-series prefix.
    pub name: String,
    /// Content language tag.
    pub language: String,
    /// License statement for `DC.rights`.
    pub rights: String,
    /// Social preview image used on every page.
    pub image: String,
    /// Prefix joined to relative `pdf` paths for `citation_pdf_url`.
    pub pdf_base: String,
    /// Output subdirectory holding the paper pages.
    pub papers_dir: String,
}

impl Default for SiteIdentity {
    fn default() -> Self {
        Self {
            origin: "https://dissensus.ai".to_string(),
            name: "Dissensus AI".to_string(),
            language: "en".to_string(),
            rights: "CC BY 4.0".to_string(),
            image: "https://dissensus.ai/assets/logo.png".to_string(),
            pdf_base: "https://farzulla.org/papers/".to_string(),
            papers_dir: "papers".to_string(),
        }
    }
}

impl SiteIdentity {
    /// Canonical URL of a paper page: `{origin}/{papers_dir}/{id}.html`.
    pub fn paper_url(&self, id: &str) -> String {
        format!(
            "{}/{}/{}.html",
            self.origin,
            self.papers_dir.trim_matches('/'),
            id
        )
    }

    /// Absolute URL for a site path starting with `/`.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.origin, path)
    }

    /// Absolute PDF URL. Absolute `pdf` values pass through unchanged.
    pub fn pdf_url(&self, pdf: &str) -> String {
        if pdf.starts_with("http://") || pdf.starts_with("https://") {
            pdf.to_string()
        } else {
            format!("{}{}", self.pdf_base, pdf)
        }
    }
}

/// Identity metadata attached to one named author in structured data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PinnedAuthor {
    /// Exact author string as it appears in the catalogue.
    pub name: String,
    pub orcid: String,
    pub affiliation: String,
    pub affiliation_url: String,
}

impl Default for PinnedAuthor {
    fn default() -> Self {
        Self {
            name: "Murad Farzulla".to_string(),
            orcid: "0009-0002-7164-8704".to_string(),
            affiliation: "Dissensus AI".to_string(),
            affiliation_url: "https://dissensus.ai".to_string(),
        }
    }
}

impl PinnedAuthor {
    pub fn orcid_url(&self) -> String {
        format!("https://orcid.org/{}", self.orcid)
    }
}

/// How often a sitemap location is expected to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFreq {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl fmt::Display for ChangeFreq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChangeFreq::Always => "always",
            ChangeFreq::Hourly => "hourly",
            ChangeFreq::Daily => "daily",
            ChangeFreq::Weekly => "weekly",
            ChangeFreq::Monthly => "monthly",
            ChangeFreq::Yearly => "yearly",
            ChangeFreq::Never => "never",
        })
    }
}

/// A hand-maintained page listed ahead of the papers in the sitemap.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StaticPage {
    /// Site path starting with `/`.
    pub path: String,
    pub priority: f32,
    pub changefreq: ChangeFreq,
}

impl StaticPage {
    fn new(path: &str, priority: f32, changefreq: ChangeFreq) -> Self {
        Self {
            path: path.to_string(),
            priority,
            changefreq,
        }
    }
}

/// Sitemap priority policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SitemapConfig {
    /// Statuses whose papers get `featured_priority`.
    pub featured_statuses: Vec<String>,
    pub featured_priority: f32,
    /// Priority for papers with any other status.
    pub default_priority: f32,
    pub paper_changefreq: ChangeFreq,
    /// Static destinations, in sitemap order.
    pub static_pages: Vec<StaticPage>,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        use ChangeFreq::{Monthly, Weekly, Yearly};
        Self {
            featured_statuses: vec!["peer-review".to_string(), "published".to_string()],
            featured_priority: 0.9,
            default_priority: 0.8,
            paper_changefreq: Monthly,
            static_pages: vec![
                StaticPage::new("/", 1.0, Weekly),
                StaticPage::new("/about.html", 0.7, Monthly),
                StaticPage::new("/services.html", 0.7, Monthly),
                StaticPage::new("/collaborate.html", 0.7, Monthly),
                StaticPage::new("/manifesto.html", 0.6, Monthly),
                StaticPage::new("/charter.html", 0.5, Monthly),
                StaticPage::new("/reading.html", 0.5, Monthly),
                StaticPage::new("/press.html", 0.5, Monthly),
                StaticPage::new("/subscribe.html", 0.5, Monthly),
                StaticPage::new("/privacy.html", 0.3, Yearly),
                StaticPage::new("/terms.html", 0.3, Yearly),
            ],
        }
    }
}

/// Parallel rendering settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel rendering workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("stock defaults do not serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely, so an
///   overlay `static_pages` array replaces the whole stock list.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, falling back to stock defaults when absent.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `paper-pages.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Paper Pages Configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site identity (embedded verbatim in citation metadata)
# ---------------------------------------------------------------------------
[site]
# Site origin, without trailing slash. Canonical URLs are
# {origin}/{papers_dir}/{id}.html
origin = "https://dissensus.ai"

# Publisher name, Open Graph site name, and paper-series prefix
# ("Dissensus AI Working Paper WP1").
name = "Dissensus AI"

# Content language tag.
language = "en"

# License statement for DC.rights.
rights = "CC BY 4.0"

# Social preview image used on every page.
image = "https://dissensus.ai/assets/logo.png"

# Prefix for relative PDF paths in citation_pdf_url.
pdf_base = "https://farzulla.org/papers/"

# Output subdirectory for paper pages.
papers_dir = "papers"

# ---------------------------------------------------------------------------
# Pinned author (ORCID and affiliation in Schema.org data)
# ---------------------------------------------------------------------------
[pinned_author]
name = "Murad Farzulla"
orcid = "0009-0002-7164-8704"
affiliation = "Dissensus AI"
affiliation_url = "https://dissensus.ai"

# ---------------------------------------------------------------------------
# Sitemap
# ---------------------------------------------------------------------------
[sitemap]
# Papers with these statuses get featured_priority, all others default_priority.
featured_statuses = ["peer-review", "published"]
featured_priority = 0.9
default_priority = 0.8
paper_changefreq = "monthly"

# Static destinations, listed before the papers. Setting this array
# replaces the whole list.
[[sitemap.static_pages]]
path = "/"
priority = 1.0
changefreq = "weekly"

[[sitemap.static_pages]]
path = "/about.html"
priority = 0.7
changefreq = "monthly"

[[sitemap.static_pages]]
path = "/services.html"
priority = 0.7
changefreq = "monthly"

[[sitemap.static_pages]]
path = "/collaborate.html"
priority = 0.7
changefreq = "monthly"

[[sitemap.static_pages]]
path = "/manifesto.html"
priority = 0.6
changefreq = "monthly"

[[sitemap.static_pages]]
path = "/charter.html"
priority = 0.5
changefreq = "monthly"

[[sitemap.static_pages]]
path = "/reading.html"
priority = 0.5
changefreq = "monthly"

[[sitemap.static_pages]]
path = "/press.html"
priority = 0.5
changefreq = "monthly"

[[sitemap.static_pages]]
path = "/subscribe.html"
priority = 0.5
changefreq = "monthly"

[[sitemap.static_pages]]
path = "/privacy.html"
priority = 0.3
changefreq = "yearly"

[[sitemap.static_pages]]
path = "/terms.html"
priority = 0.3
changefreq = "yearly"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel rendering workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
