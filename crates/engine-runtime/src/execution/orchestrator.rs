use crate::{config::MigratorConfig, error::MigrationError, execution::summary::RunSummary};
use chrono::Utc;
use connectors::{
    adapter::Adapter,
    sql::base::{destination::DbDataDestination, source::DbDataSource},
};
use engine_processing::{
    fetcher::RowFetcher,
    migrator::{TableMigrator, dotnet_ticks, replay_file_path},
    sink::{destination::DestinationSink, dual::DualSink},
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Builds the adapters from `config` and runs every table.
pub async fn run(
    config: MigratorConfig,
    single_pass: bool,
    cancel: CancellationToken,
) -> Result<RunSummary, MigrationError> {
    let orchestrator = Orchestrator::from_config(config)?;
    Ok(orchestrator.run(single_pass, cancel).await)
}

/// Runs the configured tables one after another in name order.
pub struct Orchestrator {
    config: MigratorConfig,
    source: Arc<dyn DbDataSource>,
    destination: Arc<dyn DbDataDestination>,
}

impl Orchestrator {
    pub fn new(
        config: MigratorConfig,
        source: Arc<dyn DbDataSource>,
        destination: Arc<dyn DbDataDestination>,
    ) -> Self {
        Orchestrator {
            config,
            source,
            destination,
        }
    }

    /// Validates `config` and parses both connection strings. No connection
    /// is opened until the first fetch.
    pub fn from_config(config: MigratorConfig) -> Result<Self, MigrationError> {
        config.validate()?;

        let source = Adapter::sql(config.source.format, &config.source.connection)?.source();
        let destination =
            Adapter::sql(config.destination.format, &config.destination.connection)?
                .destination()?;

        Ok(Self::new(config, source, destination))
    }

    pub async fn run(&self, single_pass: bool, cancel: CancellationToken) -> RunSummary {
        info!("Starting data migration..");

        let started_at = Utc::now();
        let ticks = dotnet_ticks(started_at);
        let mut summary = RunSummary::new(started_at, ticks, single_pass);

        let output_dir = self.config.output_dir();
        if let Err(err) = tokio::fs::create_dir_all(&output_dir).await {
            error!(dir = %output_dir.display(), %err, "Failed to create output directory");
        }

        let migrator = TableMigrator::new(
            RowFetcher::new(self.source.clone()),
            DualSink::new(DestinationSink::new(
                self.destination.clone(),
                self.config.write_mode,
            )),
            self.config.batch_size,
            single_pass,
        );

        let tables = self.config.ordered_tables();
        let total = tables.len();

        for (idx, table) in tables.into_iter().enumerate() {
            // Only checked between tables; the table loop checks before each fetch
            if cancel.is_cancelled() {
                warn!(
                    "Shutdown requested before starting table {}/{}: {}",
                    idx + 1,
                    total,
                    table
                );
                summary.skipped.push(table);
                continue;
            }

            let file = replay_file_path(&output_dir, &table, ticks);
            let report = migrator.migrate(&table, file, &cancel).await;
            summary.tables.push(report);
        }

        info!(
            tables = summary.tables.len(),
            skipped = summary.skipped.len(),
            fetched = summary.rows_fetched(),
            written = summary.destination_rows(),
            "Migration finished"
        );
        summary
    }
}
