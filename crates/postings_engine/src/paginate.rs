use std::time::Duration;

use chrono::Utc;
use ingest_logging::{ingest_error, ingest_info};
use postings_core::{normalize, trim_page_boundaries, JobRecord};
use url::Url;

use crate::adapters::{Pagination, SourceAdapter};
use crate::{FailureKind, FetchError, Fetcher};

/// Pause between page requests.
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_secs(2);

/// What one pass over a source produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRun {
    pub records: Vec<JobRecord>,
    pub pages_fetched: u32,
    pub containers: usize,
    pub discarded: usize,
    /// The fetch error that stopped pagination, if any.
    pub halted: Option<FetchError>,
}

/// Drives fetcher and adapter across result pages, one request at a time.
pub struct Paginator<'a> {
    fetcher: &'a dyn Fetcher,
    delay: Duration,
}

impl<'a> Paginator<'a> {
    pub fn new(fetcher: &'a dyn Fetcher) -> Self {
        Self::with_delay(fetcher, DEFAULT_PAGE_DELAY)
    }

    pub fn with_delay(fetcher: &'a dyn Fetcher, delay: Duration) -> Self {
        Self { fetcher, delay }
    }

    /// Single pass for unpaginated sources, `page_count` pages otherwise
    /// (the source default when `None`).
    pub async fn run(
        &self,
        adapter: SourceAdapter,
        base_url: &str,
        page_count: Option<u32>,
    ) -> PageRun {
        match adapter.pagination() {
            Pagination::Single => self.single_pass(adapter, base_url).await,
            Pagination::Paged {
                default_pages,
                trim_boundaries,
            } => {
                let pages = page_count.unwrap_or(default_pages);
                self.paginate(adapter, base_url, pages, trim_boundaries)
                    .await
            }
        }
    }

    pub async fn single_pass(&self, adapter: SourceAdapter, url: &str) -> PageRun {
        let mut run = PageRun::default();
        match self.fetcher.fetch(url).await {
            Ok(doc) => {
                run.pages_fetched = 1;
                let output = adapter.extract(&doc);
                run.containers = output.container_count();
                run.discarded = output.discarded.len();
                run.records = normalize_all(output.records);
            }
            Err(err) => {
                ingest_error!("[{}] {}", adapter, err);
                run.halted = Some(err);
            }
        }
        run
    }

    /// Fetches pages `1..=page_count`, stopping at the first page that fails
    /// to fetch. Pages without containers are skipped.
    pub async fn paginate(
        &self,
        adapter: SourceAdapter,
        base_url: &str,
        page_count: u32,
        trim_boundaries: bool,
    ) -> PageRun {
        let mut run = PageRun::default();
        for page in 1..=page_count {
            let url = match page_url(base_url, page) {
                Ok(url) => url,
                Err(err) => {
                    ingest_error!("[{}] {}", adapter, err);
                    run.halted = Some(err);
                    break;
                }
            };

            ingest_info!("[{}] scraping page {}", adapter, page);
            let doc = match self.fetcher.fetch(&url).await {
                Ok(doc) => doc,
                Err(err) => {
                    ingest_error!(
                        "[{}] stopping at page {} with {} jobs collected: {}",
                        adapter,
                        page,
                        run.records.len(),
                        err
                    );
                    run.halted = Some(err);
                    break;
                }
            };
            run.pages_fetched += 1;

            let output = adapter.extract(&doc);
            run.containers += output.container_count();
            run.discarded += output.discarded.len();
            if output.container_count() == 0 {
                ingest_info!("[{}] no job listings on page {}, skipping", adapter, page);
            } else {
                let kept = if trim_boundaries {
                    trim_page_boundaries(output.records)
                } else {
                    output.records
                };
                ingest_info!("[{}] page {}: {} jobs kept", adapter, page, kept.len());
                run.records.extend(normalize_all(kept));
            }

            if page < page_count && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }
        run
    }
}

fn normalize_all(records: Vec<postings_core::ProvisionalRecord>) -> Vec<JobRecord> {
    records
        .into_iter()
        .map(|record| normalize(record, Utc::now()))
        .collect()
}

/// `base_url` with its `page` query parameter set to `page`.
pub fn page_url(base_url: &str, page: u32) -> Result<String, FetchError> {
    let mut url = Url::parse(base_url)
        .map_err(|err| FetchError::new(base_url, FailureKind::InvalidUrl, err.to_string()))?;
    let retained: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != "page")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(retained)
        .append_pair("page", &page.to_string());
    Ok(url.to_string())
}
