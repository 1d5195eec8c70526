mod cli;
mod config;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use ingest_logging::{ingest_error, ingest_info, ingest_warn, LogDestination};
use log::LevelFilter;
use postings_engine::{FetchSettings, Ingestor, PgJobStore, ReqwestFetcher};

use crate::cli::{Cli, Command, ScrapeArgs};
use crate::config::Settings;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = Settings::from_env();
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    ingest_logging::initialize(log_destination(settings.as_ref().ok()), level);

    let settings = match settings {
        Ok(settings) => settings,
        Err(err) => {
            ingest_error!("configuration error: {err}");
            return ExitCode::from(2);
        }
    };

    let result = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start the runtime")
        .and_then(|runtime| runtime.block_on(run(cli.command, &settings)));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            ingest_error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Log lines always reach stdout; a configured log file gets a copy.
fn log_destination(settings: Option<&Settings>) -> LogDestination {
    match settings.and_then(|settings| settings.log_file.clone()) {
        Some(path) => LogDestination::Both(path),
        None => LogDestination::Terminal,
    }
}

async fn run(command: Command, settings: &Settings) -> anyhow::Result<()> {
    let store = PgJobStore::connect(settings.db.connect_options(), &settings.table)
        .await
        .with_context(|| {
            format!(
                "could not connect to {}:{}/{}",
                settings.db.host, settings.db.port, settings.db.name
            )
        })?;

    let outcome = match command {
        Command::Migrate => store.migrate().await.context("migration failed"),
        Command::Scrape(args) => scrape(&store, &args).await,
    };
    store.close().await;
    outcome
}

async fn scrape(store: &PgJobStore, args: &ScrapeArgs) -> anyhow::Result<()> {
    let options = args.run_options()?;
    let fetcher = ReqwestFetcher::new(FetchSettings::default())?;
    let mut ingestor = Ingestor::new(&fetcher, store);
    if let Some(delay) = args.page_delay() {
        ingestor = ingestor.with_page_delay(delay);
    }

    for source in args.sources() {
        let summary = ingestor.run(source, &options).await;
        if let Some(halt) = &summary.halted {
            ingest_warn!("[{source}] pagination stopped early: {halt}");
        }
        if !summary.upsert.is_complete() {
            ingest_warn!(
                "[{source}] {} of {} records were not stored",
                summary.upsert.attempted - summary.upsert.written,
                summary.upsert.attempted
            );
        }
    }
    ingest_info!("table {} is up to date", store.table());
    Ok(())
}
