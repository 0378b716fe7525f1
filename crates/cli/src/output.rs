use crate::error::CliError;
use engine_runtime::execution::summary::RunSummary;

fn generate_report_json(summary: &RunSummary) -> Result<String, CliError> {
    serde_json::to_string_pretty(summary).map_err(CliError::JsonSerialize)
}

pub async fn write_report(summary: &RunSummary, path: &str) -> Result<(), CliError> {
    let report_json = generate_report_json(summary)?;
    tokio::fs::write(path, report_json).await?;
    Ok(())
}

pub fn print_summary(summary: &RunSummary) {
    println!("Migration run started {}:", summary.started_at.to_rfc3339());
    println!("{:-<78}", "");
    println!(
        "{:<24} {:>8} {:>10} {:>10} {:>10}  {}",
        "Table", "Batches", "Fetched", "File", "Written", "Outcome"
    );
    for table in &summary.tables {
        println!(
            "{:<24} {:>8} {:>10} {:>10} {:>10}  {:?}",
            table.table,
            table.batches,
            table.rows_fetched,
            table.file_lines,
            table.destination_rows,
            table.outcome
        );
    }
    for table in &summary.skipped {
        println!("{table:<24} {:>8} {:>10} {:>10} {:>10}  skipped", "-", "-", "-", "-");
    }
    println!("{:-<78}", "");
    println!(
        "{:<24} {:>8} {:>10} {:>10} {:>10}",
        "Total",
        summary.tables.iter().map(|t| t.batches).sum::<usize>(),
        summary.rows_fetched(),
        summary.tables.iter().map(|t| t.file_lines).sum::<usize>(),
        summary.destination_rows()
    );
}
