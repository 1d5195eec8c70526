use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use postings_core::JobRecord;

use super::{check_constraints, JobStore, PersistenceError};

/// In-process store with the same key, column limits and transaction
/// boundaries as the SQL relation.
#[derive(Debug, Default)]
pub struct MemoryJobStore {
    rows: Mutex<BTreeMap<String, JobRecord>>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows().is_empty()
    }

    pub fn get(&self, apply_link: &str) -> Option<JobRecord> {
        self.rows().get(apply_link).cloned()
    }

    /// Every stored row, ordered by apply link.
    pub fn all(&self) -> Vec<JobRecord> {
        self.rows().values().cloned().collect()
    }

    fn rows(&self) -> MutexGuard<'_, BTreeMap<String, JobRecord>> {
        // A panic while holding the lock cannot leave a half-applied write.
        self.rows.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait::async_trait]
impl JobStore for MemoryJobStore {
    async fn upsert_one(&self, record: &JobRecord) -> Result<(), PersistenceError> {
        check_constraints(record)?;
        self.rows()
            .insert(record.apply_link.clone(), record.clone());
        Ok(())
    }

    async fn upsert_all(&self, records: &[JobRecord]) -> Result<(), PersistenceError> {
        let mut rows = self.rows();
        let mut staged = rows.clone();
        for record in records {
            check_constraints(record)?;
            staged.insert(record.apply_link.clone(), record.clone());
        }
        *rows = staged;
        Ok(())
    }
}
