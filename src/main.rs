use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use paper_pages::catalogue::Catalogue;
use paper_pages::chrome::StockChrome;
use paper_pages::pipeline::{self, DirWriter};
use paper_pages::{config, output};
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "paper-pages")]
#[command(about = "Static detail pages and sitemap for a research paper catalogue")]
#[command(long_about = "\
Static detail pages and sitemap for a research paper catalogue

Reads one JSON catalogue of paper records and writes a self-contained HTML page
per paper, carrying citation metadata for indexers (Highwire Press, Dublin Core,
Schema.org, Open Graph, Twitter), plus a sitemap of the whole site.

Input:

  papers.json
  ├── papers      # records: id, title, abstract, authors, date, status, ...
  ├── tags        # tag key → label
  ├── statuses    # status key → label
  └── programs    # program key → { title }

Output:

  public/
  ├── papers/
  │   └── {id}.html
  └── sitemap.xml

Site identity, the pinned author, and sitemap policy come from
paper-pages.toml. Run 'paper-pages gen-config' to generate a documented one.

Set RUST_LOG to control diagnostics (default: paper_pages=info).")]
#[command(version = version_string())]
struct Cli {
    /// Catalogue JSON file
    #[arg(long, default_value = "papers.json", global = true)]
    catalogue: PathBuf,

    /// Output directory
    #[arg(long, default_value = "public", global = true)]
    output: PathBuf,

    /// Site config file (stock defaults when missing)
    #[arg(long, default_value = "paper-pages.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render every paper page and the sitemap
    Build {
        /// Sitemap lastmod date, YYYY-MM-DD (default: today, UTC)
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// Validate the catalogue and report unresolved labels, writing nothing
    Check,
    /// Print a stock paper-pages.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Command::Build { date } => {
            let site_config = config::load_config(&cli.config)?;
            init_thread_pool(&site_config.processing);
            let catalogue = Catalogue::load(&cli.catalogue)?;
            let today = date.unwrap_or_else(|| Utc::now().date_naive());

            println!(
                "==> Building {} → {}",
                cli.catalogue.display(),
                cli.output.display()
            );
            let writer = DirWriter::new(&cli.output);
            let summary = pipeline::run(&catalogue, &site_config, &StockChrome, &writer, today)?;
            output::print_build_output(&summary);
        }
        Command::Check => {
            config::load_config(&cli.config)?;
            println!("==> Checking {}", cli.catalogue.display());
            let catalogue = Catalogue::load(&cli.catalogue)?;
            output::print_check_output(&catalogue);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Diagnostics go to stderr so stdout stays the run summary.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("paper_pages=info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Capped at the number of available CPU cores.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}
