use crate::config::Config;
use crate::error::Result;
use crate::plaid::{PlaidClient, PlaidOperations};
use crate::sheets::{SheetOperations, SheetsClient};
use clap::Subcommand;
use tracing::info;

#[derive(Subcommand, Debug)]
pub enum ShowResource {
    /// Show configuration and cache paths
    Paths,
    /// Show the transaction ID the next sync starts after
    LastTransaction,
    /// Show the accounts linked to the Plaid access token
    Accounts,
}

impl ShowResource {
    pub async fn execute(&self) -> Result<()> {
        match self {
            ShowResource::Paths => show_paths(),
            ShowResource::LastTransaction => show_last_transaction().await,
            ShowResource::Accounts => show_accounts().await,
        }
    }
}

fn show_paths() -> Result<()> {
    let config_path = Config::config_file()?;
    let cache_dir = Config::cache_dir()?;

    info!(path = ?config_path, "Config path");
    info!(path = ?cache_dir, "Cache path");

    Ok(())
}

async fn show_last_transaction() -> Result<()> {
    let config = Config::load()?;
    let sheets_client = SheetsClient::new(&config.google).await?;

    match sheets_client.last_transaction_id().await? {
        Some(id) => info!(id = %id, "Last recorded transaction"),
        None => info!("Sheet has no recorded transactions"),
    }

    Ok(())
}

async fn show_accounts() -> Result<()> {
    let config = Config::load()?;
    let plaid_client = PlaidClient::new(&config.plaid, config.sync.page_size)?;

    for account in plaid_client.get_accounts().await? {
        info!(
            id = %account.id,
            official_name = ?account.official_name,
            mask = ?account.mask,
            subtype = ?account.subtype,
            "{}",
            account.name
        );
    }

    Ok(())
}
