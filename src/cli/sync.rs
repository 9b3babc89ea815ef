use crate::config::Config;
use crate::error::Result;
use crate::models::ToSheetValues;
use crate::plaid::PlaidClient;
use crate::sheets::SheetsClient;
use crate::sync::SyncEngine;
use tracing::info;

pub async fn execute(dry_run: bool) -> Result<()> {
    let config = Config::load()?;
    let plaid_client = PlaidClient::new(&config.plaid, config.sync.page_size)?;
    let sheets_client = SheetsClient::new(&config.google).await?;
    let url = sheets_client.spreadsheet_url();

    let engine = SyncEngine::new(config.sync, plaid_client, sheets_client);

    if dry_run {
        let (from, to) = engine.today_window()?;
        let plan = engine.plan(from, to).await?;
        plan.rows.as_slice().write_csv(std::io::stdout().lock())?;
        info!(rows = plan.rows.len(), last_id = ?plan.last_id, "Dry run, nothing appended");
        return Ok(());
    }

    let report = engine.sync().await?;

    info!(url = url, appended = report.appended, "Sync completed");

    Ok(())
}
