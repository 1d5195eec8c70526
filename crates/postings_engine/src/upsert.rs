use std::fmt;
use std::str::FromStr;

use ingest_logging::{ingest_error, ingest_info};
use postings_core::JobRecord;

use crate::store::JobStore;

/// Transaction granularity of a write.
///
/// `PerRecord` commits each record on its own, so one bad row costs only
/// itself. `Batch` commits all rows together and a single bad row rolls back
/// the whole call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertMode {
    PerRecord,
    Batch,
}

impl UpsertMode {
    pub fn as_str(self) -> &'static str {
        match self {
            UpsertMode::PerRecord => "per-record",
            UpsertMode::Batch => "batch",
        }
    }
}

impl fmt::Display for UpsertMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown upsert mode {0:?} (expected per-record or batch)")]
pub struct UnknownUpsertMode(pub String);

impl FromStr for UpsertMode {
    type Err = UnknownUpsertMode;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "per-record" | "per_record" | "record" => Ok(UpsertMode::PerRecord),
            "batch" => Ok(UpsertMode::Batch),
            _ => Err(UnknownUpsertMode(raw.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertFailure {
    pub apply_link: String,
    pub title: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertResult {
    pub mode: UpsertMode,
    pub attempted: usize,
    pub written: usize,
    /// Rejected records (per-record mode).
    pub failures: Vec<UpsertFailure>,
    /// Reason the whole batch was rolled back (batch mode).
    pub batch_error: Option<String>,
}

impl UpsertResult {
    fn empty(mode: UpsertMode) -> Self {
        Self {
            mode,
            attempted: 0,
            written: 0,
            failures: Vec::new(),
            batch_error: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.written == self.attempted
    }
}

/// Writes normalized records to a [`JobStore`]; never retries.
pub struct Upserter<'a> {
    store: &'a dyn JobStore,
}

impl<'a> Upserter<'a> {
    pub fn new(store: &'a dyn JobStore) -> Self {
        Self { store }
    }

    pub async fn upsert(&self, records: &[JobRecord], mode: UpsertMode) -> UpsertResult {
        match mode {
            UpsertMode::PerRecord => self.upsert_each(records).await,
            UpsertMode::Batch => self.upsert_batch(records).await,
        }
    }

    async fn upsert_each(&self, records: &[JobRecord]) -> UpsertResult {
        let mut result = UpsertResult::empty(UpsertMode::PerRecord);
        result.attempted = records.len();
        for record in records {
            match self.store.upsert_one(record).await {
                Ok(()) => {
                    result.written += 1;
                    ingest_info!("stored job: {}", record.title);
                }
                Err(err) => {
                    ingest_error!(
                        "failed to store job: {} at {} ({}): {}",
                        record.title,
                        record.company,
                        record.apply_link,
                        err
                    );
                    result.failures.push(UpsertFailure {
                        apply_link: record.apply_link.clone(),
                        title: record.title.clone(),
                        error: err.to_string(),
                    });
                }
            }
        }
        result
    }

    async fn upsert_batch(&self, records: &[JobRecord]) -> UpsertResult {
        let mut result = UpsertResult::empty(UpsertMode::Batch);
        if records.is_empty() {
            return result;
        }
        result.attempted = records.len();
        match self.store.upsert_all(records).await {
            Ok(()) => {
                result.written = records.len();
                ingest_info!("stored {} jobs", records.len());
            }
            Err(err) => {
                ingest_error!(
                    "batch of {} jobs rolled back, nothing stored: {}",
                    records.len(),
                    err
                );
                result.batch_error = Some(err.to_string());
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::UpsertMode;

    #[test]
    fn modes_parse_from_cli_spellings() {
        assert_eq!("per-record".parse::<UpsertMode>().ok(), Some(UpsertMode::PerRecord));
        assert_eq!("Batch".parse::<UpsertMode>().ok(), Some(UpsertMode::Batch));
        assert!("bulk".parse::<UpsertMode>().is_err());
    }
}
