//! Persistence of normalized postings keyed by apply link.
mod memory;
mod postgres;

pub use memory::MemoryJobStore;
pub use postgres::{PgJobStore, MIGRATOR};

use postings_core::JobRecord;

pub const DEFAULT_TABLE: &str = "jobs_job";
pub const KEY_COLUMN: &str = "apply_link";

/// Write order of the bound parameters.
pub const COLUMNS: [&str; 9] = [
    "title",
    "company",
    "location",
    "description",
    "apply_link",
    "tags",
    "pay",
    "experience",
    "created_at",
];

/// `varchar(n)` limits of the target relation, in characters.
pub const COLUMN_LIMITS: [(&str, usize); 6] = [
    ("title", 255),
    ("company", 255),
    ("location", 255),
    ("apply_link", 200),
    ("pay", 100),
    ("experience", 100),
];

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("{column} violates a column constraint: {message}")]
    Constraint {
        column: &'static str,
        message: String,
    },
    #[error("invalid table name {0:?}")]
    InvalidTable(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// A store that inserts or overwrites postings by apply link.
#[async_trait::async_trait]
pub trait JobStore: Send + Sync {
    /// Writes one record in its own transaction.
    async fn upsert_one(&self, record: &JobRecord) -> Result<(), PersistenceError>;

    /// Writes every record in one transaction; any failure leaves the store untouched.
    async fn upsert_all(&self, records: &[JobRecord]) -> Result<(), PersistenceError>;
}

/// `INSERT ... ON CONFLICT (apply_link) DO UPDATE` over every non-key column.
pub fn upsert_statement(table: &str) -> String {
    let columns = COLUMNS.join(", ");
    let params = (1..=COLUMNS.len())
        .map(|idx| format!("${idx}"))
        .collect::<Vec<_>>()
        .join(", ");
    let assignments = COLUMNS
        .iter()
        .filter(|column| **column != KEY_COLUMN)
        .map(|column| format!("{column} = EXCLUDED.{column}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {table} ({columns}) VALUES ({params}) \
         ON CONFLICT ({KEY_COLUMN}) DO UPDATE SET {assignments}"
    )
}

/// Accepts `name` or `schema.name` made of ASCII identifier characters.
pub fn validate_table_name(table: &str) -> Result<(), PersistenceError> {
    let valid_part = |part: &str| {
        part.chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && part.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    };
    let parts: Vec<&str> = table.split('.').collect();
    if parts.len() <= 2 && parts.iter().all(|part| valid_part(part)) {
        Ok(())
    } else {
        Err(PersistenceError::InvalidTable(table.to_string()))
    }
}

/// Checks the relation's column constraints the way the database would.
pub(crate) fn check_constraints(record: &JobRecord) -> Result<(), PersistenceError> {
    if record.apply_link.is_empty() {
        return Err(PersistenceError::Constraint {
            column: KEY_COLUMN,
            message: "must not be empty".to_string(),
        });
    }
    for (column, limit) in COLUMN_LIMITS {
        let len = column_value(record, column).chars().count();
        if len > limit {
            return Err(PersistenceError::Constraint {
                column,
                message: format!("value too long for varchar({limit}): {len} characters"),
            });
        }
    }
    Ok(())
}

fn column_value<'a>(record: &'a JobRecord, column: &str) -> &'a str {
    match column {
        "title" => &record.title,
        "company" => &record.company,
        "location" => &record.location,
        "description" => &record.description,
        "apply_link" => &record.apply_link,
        "pay" => &record.pay,
        "experience" => &record.experience,
        _ => "",
    }
}
