use std::str::FromStr;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use postings_engine::{RunOptions, SourceAdapter, UnknownSource, UpsertMode};

#[derive(Debug, Parser)]
#[command(name = "postings", about = "Scrape job boards into the postings table")]
pub struct Cli {
    /// Log at debug level.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch one source (or `all`) and upsert what it lists.
    Scrape(ScrapeArgs),
    /// Apply pending schema migrations.
    Migrate,
}

#[derive(Debug, Args)]
pub struct ScrapeArgs {
    /// Source name (cutshort, topstartups) or `all`.
    pub source: SourceSelection,

    /// Number of pages for paginated sources.
    #[arg(long)]
    pub pages: Option<u32>,

    /// Listing URL override. Only valid with a single source.
    #[arg(long)]
    pub base_url: Option<String>,

    /// Write mode: per-record or batch.
    #[arg(long)]
    pub mode: Option<UpsertMode>,

    /// Pause between page fetches, in milliseconds.
    #[arg(long)]
    pub delay_ms: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceSelection {
    All,
    One(SourceAdapter),
}

impl FromStr for SourceSelection {
    type Err = UnknownSource;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw.trim().eq_ignore_ascii_case("all") {
            return Ok(SourceSelection::All);
        }
        raw.parse().map(SourceSelection::One)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("--base-url needs a single source, not `all`")]
pub struct BaseUrlWithAll;

impl ScrapeArgs {
    pub fn sources(&self) -> Vec<SourceAdapter> {
        match self.source {
            SourceSelection::All => SourceAdapter::ALL.to_vec(),
            SourceSelection::One(source) => vec![source],
        }
    }

    pub fn run_options(&self) -> Result<RunOptions, BaseUrlWithAll> {
        if self.base_url.is_some() && self.source == SourceSelection::All {
            return Err(BaseUrlWithAll);
        }
        Ok(RunOptions {
            base_url: self.base_url.clone(),
            pages: self.pages,
            mode: self.mode,
        })
    }

    pub fn page_delay(&self) -> Option<Duration> {
        self.delay_ms.map(Duration::from_millis)
    }
}
