use anyhow::{Context, Result};
use sea_orm::Database;
use tracing::{debug, info, trace};

use crate::importer;

/// Run the bulk import against a workbook on disk and print the summary.
pub async fn import_file(database_url: &str, file: &str) -> Result<()> {
    trace!("Entering import_file function");
    info!("Starting workbook import");
    debug!("Database URL: {}", database_url);
    debug!("Workbook path: {}", file);

    dotenvy::dotenv().ok();
    let default_password = std::env::var("IMPORT_DEFAULT_PASSWORD")
        .context("IMPORT_DEFAULT_PASSWORD must be set to create imported accounts")?;

    let db = Database::connect(database_url)
        .await
        .context("Failed to connect to database")?;

    let bytes =
        std::fs::read(file).with_context(|| format!("Failed to read workbook '{}'", file))?;
    let rows = importer::parse_workbook(&bytes)
        .with_context(|| format!("Failed to parse workbook '{}'", file))?;
    info!("Parsed {} data rows", rows.len());

    let summary = importer::import_candidates(&db, rows, &default_password).await?;

    println!("{}", serde_json::to_string_pretty(&summary)?);
    info!(
        "Import finished: {} imported, {} skipped of {} rows",
        summary.success, summary.skipped, summary.total_rows
    );
    Ok(())
}
