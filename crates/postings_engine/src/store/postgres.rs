use ingest_logging::ingest_info;
use postings_core::JobRecord;
use sqlx::migrate::Migrator;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};

use super::{upsert_statement, validate_table_name, JobStore, PersistenceError};

/// Creates the default `jobs_job` relation.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Postgres-backed store. Each call runs inside its own transaction.
#[derive(Debug, Clone)]
pub struct PgJobStore {
    pool: PgPool,
    table: String,
    statement: String,
}

impl PgJobStore {
    /// Opens a single-connection pool; ingestion never writes concurrently.
    pub async fn connect(
        options: PgConnectOptions,
        table: impl Into<String>,
    ) -> Result<Self, PersistenceError> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        Self::from_pool(pool, table)
    }

    pub fn from_pool(pool: PgPool, table: impl Into<String>) -> Result<Self, PersistenceError> {
        let table = table.into();
        validate_table_name(&table)?;
        let statement = upsert_statement(&table);
        Ok(Self {
            pool,
            table,
            statement,
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub async fn migrate(&self) -> Result<(), PersistenceError> {
        MIGRATOR.run(&self.pool).await?;
        ingest_info!("migrations applied");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn write(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        record: &JobRecord,
    ) -> Result<(), PersistenceError> {
        sqlx::query(&self.statement)
            .bind(&record.title)
            .bind(&record.company)
            .bind(&record.location)
            .bind(&record.description)
            .bind(&record.apply_link)
            .bind(Json(&record.tags))
            .bind(&record.pay)
            .bind(&record.experience)
            .bind(record.created_at)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl JobStore for PgJobStore {
    async fn upsert_one(&self, record: &JobRecord) -> Result<(), PersistenceError> {
        let mut tx = self.pool.begin().await?;
        // Dropping an uncommitted transaction rolls it back.
        self.write(&mut tx, record).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn upsert_all(&self, records: &[JobRecord]) -> Result<(), PersistenceError> {
        let mut tx = self.pool.begin().await?;
        for record in records {
            self.write(&mut tx, record).await?;
        }
        tx.commit().await?;
        Ok(())
    }
}
