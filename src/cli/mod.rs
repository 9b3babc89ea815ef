mod show;
mod sync;

use crate::error::Result;
use clap::{Parser, Subcommand};

pub use show::ShowResource;

#[derive(Parser, Debug)]
#[command(name = "plaid-sheets-sync")]
#[command(about = "Append new Plaid transactions to a Google Sheet", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub async fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Sync { dry_run } => sync::execute(*dry_run).await,
            Commands::Show { resource } => resource.execute().await,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Append transactions newer than the last row of the sheet
    Sync {
        /// Print the rows as CSV instead of appending them
        #[arg(long)]
        dry_run: bool,
    },
    Show {
        #[command(subcommand)]
        resource: ShowResource,
    },
}
