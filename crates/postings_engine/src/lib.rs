//! Postings engine: fetch, extract, paginate and store job postings.
mod adapters;
mod decode;
mod fetch;
mod ingest;
mod paginate;
mod store;
mod types;
mod upsert;

pub use adapters::{AdapterOutput, Pagination, SourceAdapter, UnknownSource};
pub use decode::{decode_html, DecodedHtml};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use ingest::{Ingestor, RunOptions, RunSummary};
pub use paginate::{page_url, PageRun, Paginator, DEFAULT_PAGE_DELAY};
pub use store::{
    upsert_statement, validate_table_name, JobStore, MemoryJobStore, PersistenceError,
    PgJobStore, COLUMNS, COLUMN_LIMITS, DEFAULT_TABLE, KEY_COLUMN, MIGRATOR,
};
pub use types::{FailureKind, FetchError, RawDocument};
pub use upsert::{UnknownUpsertMode, UpsertFailure, UpsertMode, UpsertResult, Upserter};
