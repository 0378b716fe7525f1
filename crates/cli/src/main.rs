use crate::{
    env::EnvManager,
    error::CliError,
    shutdown::{ExitCode, ShutdownCoordinator},
};
use clap::Parser;
use commands::Commands;
use engine_processing::statement::StatementGenerator;
use engine_runtime::{config::MigratorConfig, execution::orchestrator};
use model::{
    core::value::Value,
    records::row::{FieldValue, RowData},
};
use planner::query::dialect::MsSql;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod commands;
mod conn;
mod env;
mod error;
mod output;
mod shutdown;

#[derive(Parser)]
#[command(
    name = "dbmigrator",
    version = "0.1.0",
    about = "Batch table copy between relational stores"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    let shutdown = ShutdownCoordinator::new(CancellationToken::new());
    shutdown.register_handlers();

    let code = match run(cli.command, &shutdown).await {
        Ok(()) if shutdown.is_shutdown_requested() => ExitCode::ShutdownRequested,
        Ok(()) => ExitCode::Success,
        Err(err) => {
            error!("{err}");
            ExitCode::GeneralError
        }
    };

    info!("Bye!");
    std::process::exit(code.as_i32());
}

async fn run(command: Commands, shutdown: &ShutdownCoordinator) -> Result<(), CliError> {
    match command {
        Commands::Migrate {
            config,
            once,
            env_file,
            output_dir,
            report,
        } => {
            let mut env = EnvManager::new();
            if let Some(path) = env_file {
                env.load_from_file(path)?;
            }

            let mut migrator_config = MigratorConfig::load(&config).await?;
            migrator_config.expand_env(env.all())?;
            if let Some(dir) = output_dir {
                migrator_config.output_dir = Some(dir.into());
            }

            info!(
                config = %config,
                tables = migrator_config.tables.len(),
                batch_size = migrator_config.batch_size,
                write_mode = %migrator_config.write_mode,
                single_pass = once,
                "Loaded migration config"
            );

            let summary = orchestrator::run(migrator_config, once, shutdown.cancel_token()).await?;

            output::print_summary(&summary);
            if let Some(path) = report {
                output::write_report(&summary, &path).await?;
            }
        }
        Commands::TestConn { format, conn_str } => {
            conn::test_connection(&format, &conn_str).await?;
        }
        Commands::Render { table, row } => {
            let row = parse_row(&table, &row)?;
            println!("{}", StatementGenerator::new(&MsSql).render(&table, &row));
        }
    }

    Ok(())
}

/// Parses a JSON object into a row, keeping the key order as column order.
fn parse_row(table: &str, json: &str) -> Result<RowData, CliError> {
    let parsed: serde_json::Value =
        serde_json::from_str(json).map_err(|e| CliError::InvalidRow(e.to_string()))?;

    let serde_json::Value::Object(map) = parsed else {
        return Err(CliError::InvalidRow("expected a JSON object".into()));
    };

    let fields = map
        .into_iter()
        .map(|(name, value)| FieldValue::new(name, Value::from(value)))
        .collect();
    Ok(RowData::new(table, fields))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_row_keeps_column_order() {
        let row = parse_row("Users", r#"{"Name":"O'Brien","Id":7,"Email":null}"#).unwrap();

        assert_eq!(row.columns().collect::<Vec<_>>(), vec!["Name", "Id", "Email"]);
        assert_eq!(
            StatementGenerator::new(&MsSql).render("Users", &row),
            "insert into Users ([Name],[Id],[Email]) values ('O''Brien','7',null);"
        );
    }

    #[test]
    fn test_parse_row_rejects_non_objects() {
        assert!(matches!(
            parse_row("Users", "[1,2]"),
            Err(CliError::InvalidRow(_))
        ));
        assert!(matches!(
            parse_row("Users", "{not json"),
            Err(CliError::InvalidRow(_))
        ));
    }

    #[test]
    fn test_cli_parses_migrate_flags() {
        let cli = Cli::try_parse_from([
            "dbmigrator",
            "migrate",
            "--config",
            "migrate.json",
            "--once",
            "--output-dir",
            "out",
        ])
        .unwrap();

        match cli.command {
            Commands::Migrate {
                config,
                once,
                output_dir,
                env_file,
                report,
            } => {
                assert_eq!(config, "migrate.json");
                assert!(once);
                assert_eq!(output_dir.as_deref(), Some("out"));
                assert!(env_file.is_none());
                assert!(report.is_none());
            }
            _ => panic!("expected migrate"),
        }
    }
}
