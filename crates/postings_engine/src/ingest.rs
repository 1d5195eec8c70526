use std::time::Duration;

use ingest_logging::{ingest_info, ingest_warn};

use crate::adapters::SourceAdapter;
use crate::paginate::{Paginator, DEFAULT_PAGE_DELAY};
use crate::store::JobStore;
use crate::upsert::{UpsertMode, UpsertResult, Upserter};
use crate::{FetchError, Fetcher};

/// Per-run overrides of a source's registry defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub base_url: Option<String>,
    pub pages: Option<u32>,
    pub mode: Option<UpsertMode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub source: SourceAdapter,
    pub pages_fetched: u32,
    pub containers: usize,
    pub records_extracted: usize,
    pub records_discarded: usize,
    pub halted: Option<FetchError>,
    pub upsert: UpsertResult,
}

/// Fetch, extract, normalize and store one source, strictly in sequence.
pub struct Ingestor<'a> {
    fetcher: &'a dyn Fetcher,
    store: &'a dyn JobStore,
    page_delay: Duration,
}

impl<'a> Ingestor<'a> {
    pub fn new(fetcher: &'a dyn Fetcher, store: &'a dyn JobStore) -> Self {
        Self {
            fetcher,
            store,
            page_delay: DEFAULT_PAGE_DELAY,
        }
    }

    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    pub async fn run(&self, source: SourceAdapter, options: &RunOptions) -> RunSummary {
        let base_url = options
            .base_url
            .as_deref()
            .unwrap_or_else(|| source.default_url());
        let mode = options.mode.unwrap_or_else(|| source.default_upsert_mode());

        let paginator = Paginator::with_delay(self.fetcher, self.page_delay);
        let pages = paginator.run(source, base_url, options.pages).await;

        if pages.records.is_empty() {
            ingest_warn!("[{}] no jobs found, nothing to store", source);
        } else {
            ingest_info!(
                "[{}] found {} jobs, storing ({} mode)",
                source,
                pages.records.len(),
                mode
            );
        }
        let upsert = Upserter::new(self.store).upsert(&pages.records, mode).await;

        let summary = RunSummary {
            source,
            pages_fetched: pages.pages_fetched,
            containers: pages.containers,
            records_extracted: pages.records.len(),
            records_discarded: pages.discarded,
            halted: pages.halted,
            upsert,
        };
        ingest_info!(
            "[{}] done: {} pages, {} containers, {} discarded, {}/{} stored",
            source,
            summary.pages_fetched,
            summary.containers,
            summary.records_discarded,
            summary.upsert.written,
            summary.upsert.attempted
        );
        summary
    }
}
