mod client;
pub mod types;
pub use client::PlaidClient;

use crate::error::Result;
use crate::models::{Account, Transaction};

use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
pub trait PlaidOperations {
    async fn get_accounts(&self) -> Result<Vec<Account>>;

    /// Transactions dated within `[from, to]`, in Plaid order (newest first).
    async fn get_transactions(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Transaction>>;
}
