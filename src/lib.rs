//! # Paper Pages
//!
//! A static page generator for a research paper catalogue. One JSON catalogue
//! goes in; one self-contained HTML detail page per paper and a sitemap come
//! out. Each page carries the discovery metadata that citation indexers,
//! search engines, and social cards read.
//!
//! # Architecture: One-Way Fan-Out
//!
//! ```text
//! papers.json ─► Catalogue ─┬─► metadata + citation ─► render ─┐
//!                           │        (per paper)               ├─► OutputWriter
//!                           └─► sitemap ───────────────────────┘
//! ```
//!
//! Every stage after loading is a pure function of the catalogue, the site
//! config, and the run date. Pages are independent of each other and render
//! in parallel; nothing reads another page's output.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`catalogue`] | Record and label-table types, JSON loading, validation |
//! | [`format`] | Text primitives: HTML escaping, dates, excerpts, script-safe JSON |
//! | [`citation`] | BibTeX keys and entries, paper-series labels |
//! | [`metadata`] | Highwire, Dublin Core, Schema.org, Open Graph, and Twitter blocks |
//! | [`render`] | Paper detail page composition with Maud |
//! | [`chrome`] | Site navigation and footer fragments |
//! | [`sitemap`] | Prioritized sitemap entries and XML |
//! | [`pipeline`] | Full run: validate, render everything, write |
//! | [`config`] | `paper-pages.toml` loading, merging, and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Render Everything, Then Write
//!
//! A run either produces every document or none. All pages and the sitemap
//! are rendered into memory first; the [`pipeline::OutputWriter`] sees its
//! first call only after the last document is complete. A malformed record
//! aborts the run with the output directory untouched.
//!
//! ## One Escaper Per Context
//!
//! Record text lands in three places with different rules: HTML text and
//! attributes, the Schema.org JSON-LD block, and a JavaScript string literal.
//! Each has its own encoder in [`format`], and the type used at the call site
//! ([`format::Text`] vs [`format::script_json`]) decides which applies. Maud's
//! built-in escaping is not used for record text because it leaves `'` alone.
//!
//! ## Typed Structured Data
//!
//! The JSON-LD block is a serde struct, not a `json!` literal, so key order is
//! fixed by field order and optional keys vanish instead of rendering empty.
//!
//! ## Fixed Identity in Config
//!
//! The site name, origin, rights statement, PDF host, pinned author, and the
//! static sitemap pages live in `paper-pages.toml` with stock defaults that
//! match the live site. A missing config file is not an error.

pub mod catalogue;
pub mod chrome;
pub mod citation;
pub mod config;
pub mod format;
pub mod metadata;
pub mod output;
pub mod pipeline;
pub mod render;
pub mod sitemap;

#[cfg(test)]
pub(crate) mod test_helpers;
